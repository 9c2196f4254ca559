//! # PostgreSQL 存储实现模块
//!
//! 以单表 JSONB 承载所有文档集合，用于生产环境。
//!
//! ## 数据库模式
//!
//! - `documents`：(collection, doc_id) 主键，`body jsonb` 保存文档内容
//! - `idx_documents_body`：`body` 上的 GIN 索引，支撑 `@>` 包含查询
//!
//! 模式由 [`PgDocumentStore::ensure_schema`] 在启动时幂等创建。
//!
//! ## 查询映射
//!
//! | 原语 | SQL |
//! |------|-----|
//! | `Eq` | `body #> path = $v::jsonb` |
//! | `In` | `$values::jsonb @> jsonb_build_array(body #> path)` |
//! | `Gte`/`Lte`（字符串） | `body #>> path collate "C" >= $v` |
//! | `Gte`/`Lte`（其他） | `body #> path >= $v::jsonb` |
//! | `update` | `body = body \|\| $patch`（顶层字段整体覆盖） |
//! | `array_union` | `jsonb_set` + 去重追加 |
//! | `array_replace` | 单条语句内定位相等元素并 `jsonb_set` 替换 |
//!
//! ## 安全考虑
//! - 所有值与字段路径均通过参数绑定，禁止字符串拼接
//! - 单文档写入为单条 SQL 语句，天然原子

pub mod document;

pub use document::PgDocumentStore;
