//! # Hostel Storage 模块
//!
//! 提供文档集合的统一存储抽象，支持内存与 PostgreSQL 两种后端。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`DocumentStore` 异步 Trait
//! 2. **查询模型层** (`document.rs`)：文档、过滤条件、排序与数量限制
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：集合名、文档 ID、字段路径校验
//! 5. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 6. **实现层**：
//!    - `in_memory/`：内存存储实现与演示数据
//!    - `postgres/`：单表 JSONB 存储实现
//!
//! ## 存储原语
//!
//! | 原语 | 说明 |
//! |------|------|
//! | `query` | 过滤（`Eq`/`In`/`Gte`/`Lte`）+ 排序 + 数量限制 |
//! | `get` / `set` | 按 ID 读取、整体写入 |
//! | `update` | 覆盖顶层字段，数组字段整体替换 |
//! | `array_union` | 向数组字段追加尚不存在的元素 |
//! | `array_replace` | 按值比较并替换数组元素（并发修改时失败） |
//! | `count` | 服务端计数 |
//!
//! 存储层不理解角色与作用域，业务规则全部在上层服务中实现。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use hostel_storage::{DocumentStore, InMemoryDocumentStore, Query, seed_demo};
//!
//! let store = InMemoryDocumentStore::new();
//! seed_demo(&store);
//! let students = store
//!     .query("students", &Query::all().eq("hostelId", "H1"))
//!     .await?;
//! ```

pub mod connection;
pub mod document;
pub mod error;
pub mod in_memory;
pub mod postgres;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use document::*;
pub use error::*;
pub use traits::*;
pub use validation::*;

pub use in_memory::{InMemoryDocumentStore, seed_demo};
pub use postgres::PgDocumentStore;
