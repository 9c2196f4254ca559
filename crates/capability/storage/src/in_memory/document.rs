//! 文档内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 集合 -> (文档 ID -> JSON 对象)，文档按 ID 有序
//! - 过滤、排序、数量限制与计数
//! - 单文档写入在一次写锁内完成

use crate::document::{Document, Query, compare_documents};
use crate::error::StorageError;
use crate::traits::DocumentStore;
use crate::validation::{ensure_collection, ensure_document_id, ensure_field_path};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Collection = BTreeMap<String, Map<String, Value>>;

/// 文档内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// 同步写入文档（测试与种子数据使用）
    ///
    /// 非对象值会被忽略。
    pub fn insert(&self, collection: &str, id: &str, data: Value) {
        let Value::Object(data) = data else {
            return;
        };
        if let Ok(mut map) = self.collections.write() {
            map.entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), data);
        }
    }

    /// 同步读取文档（测试断言使用）
    pub fn snapshot(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .ok()
            .and_then(|map| map.get(collection)?.get(id).cloned())
            .map(Value::Object)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StorageError> {
        ensure_collection(collection)?;
        for filter in &query.filters {
            ensure_field_path(&filter.field)?;
        }
        let mut documents: Vec<Document> = self
            .collections
            .read()
            .map(|map| {
                map.get(collection)
                    .map(|items| {
                        items
                            .iter()
                            .filter(|(_, data)| query.matches(data))
                            .map(|(id, data)| Document::new(id.clone(), data.clone()))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(order) = &query.order_by {
            documents.sort_by(|left, right| compare_documents(left, right, order));
        }
        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }
        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        let item = self
            .collections
            .read()
            .map_err(|_| StorageError::new("lock failed"))?
            .get(collection)
            .and_then(|items| items.get(id).cloned())
            .map(|data| Document::new(id, data));
        Ok(item)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<bool, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(document) = map.get_mut(collection).and_then(|items| items.get_mut(id)) else {
            return Ok(false);
        };
        for (key, value) in patch {
            document.insert(key, value);
        }
        Ok(true)
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<bool, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        ensure_field_path(field)?;
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(document) = map.get_mut(collection).and_then(|items| items.get_mut(id)) else {
            return Ok(false);
        };
        let entry = document
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            return Err(StorageError::new(format!("field {field} is not an array")));
        }
        if let Value::Array(items) = entry {
            for value in values {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
        }
        Ok(true)
    }

    async fn array_replace(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        replacement: Value,
    ) -> Result<bool, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        ensure_field_path(field)?;
        let mut map = self
            .collections
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(Value::Array(items)) = map
            .get_mut(collection)
            .and_then(|items| items.get_mut(id))
            .and_then(|document| document.get_mut(field))
        else {
            return Ok(false);
        };
        match items.iter_mut().find(|item| *item == expected) {
            Some(item) => {
                *item = replacement;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StorageError> {
        ensure_collection(collection)?;
        let total = self
            .collections
            .read()
            .map_err(|_| StorageError::new("lock failed"))?
            .get(collection)
            .map(|items| items.values().filter(|data| query.matches(data)).count())
            .unwrap_or(0);
        Ok(total as u64)
    }
}
