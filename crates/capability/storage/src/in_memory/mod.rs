//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - DocumentStore: InMemoryDocumentStore
//! - 演示数据：seed_demo

pub mod document;
pub mod seed;

pub use document::*;
pub use seed::*;
