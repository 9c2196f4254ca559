//! 存储接口 Trait 定义
//!
//! - DocumentStore：通用文档集合读写原语，不含业务逻辑
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 单文档写入（set/update/array_union/array_replace）对调用方是原子的
//! - 使用 async_trait 支持动态分发

use crate::document::{Document, Query};
use crate::error::StorageError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// 文档存储接口
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 按条件查询集合
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StorageError>;

    /// 读取单个文档
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError>;

    /// 创建或整体覆盖文档
    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StorageError>;

    /// 覆盖写入顶层字段（数组字段整体替换）；文档不存在时返回 false
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<bool, StorageError>;

    /// 向数组字段追加尚不存在的元素；文档不存在时返回 false
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<bool, StorageError>;

    /// 把数组字段中与 `expected` 完全相等的第一个元素替换为 `replacement`
    ///
    /// 文档不存在、字段不是数组或没有相等元素（已被并发修改）时返回 false。
    async fn array_replace(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        replacement: Value,
    ) -> Result<bool, StorageError>;

    /// 统计满足条件的文档数量（忽略 order_by/limit）
    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StorageError>;
}
