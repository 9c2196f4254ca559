#![allow(dead_code)]

use async_trait::async_trait;
use domain::{Identity, Role};
use hostel_storage::{
    Document, DocumentStore, InMemoryDocumentStore, Query, StorageError, seed_demo,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// 对指定集合的读取返回错误，其余委托给内存存储。
pub struct FailingStore {
    pub inner: Arc<InMemoryDocumentStore>,
    pub failing: Vec<&'static str>,
}

impl FailingStore {
    fn check(&self, collection: &str) -> Result<(), StorageError> {
        if self.failing.contains(&collection) {
            return Err(StorageError::new(format!("{collection} offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StorageError> {
        self.check(collection)?;
        self.inner.query(collection, query).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        self.check(collection)?;
        self.inner.get(collection, id).await
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StorageError> {
        self.inner.set(collection, id, data).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<bool, StorageError> {
        self.inner.update(collection, id, patch).await
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<bool, StorageError> {
        self.inner.array_union(collection, id, field, values).await
    }

    async fn array_replace(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        replacement: Value,
    ) -> Result<bool, StorageError> {
        self.inner
            .array_replace(collection, id, field, expected, replacement)
            .await
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StorageError> {
        self.check(collection)?;
        self.inner.count(collection, query).await
    }
}

/// 演示数据 + 另一栋楼的学生 + 两条独立集合行（其中一条与内嵌工单重复）。
pub fn fixture() -> Arc<InMemoryDocumentStore> {
    let store = InMemoryDocumentStore::new();
    seed_demo(&store);
    store.insert(
        "students",
        "stu-3",
        json!({
            "name": "Chen Li",
            "email": "chen@hostel.test",
            "hostelId": "H2",
            "floorId": "H2-F1",
            "issues": [{
                "id": "iss-4",
                "type": "complaint",
                "message": "Wifi down",
                "timestampUtc": 1_600_000_000_000_i64
            }]
        }),
    );
    store.insert(
        "issues",
        "row-1",
        json!({ "id": "iss-1", "userId": "stu-1", "message": "stale copy", "solved": true }),
    );
    store.insert(
        "issues",
        "row-2",
        json!({
            "id": "iss-5",
            "userId": "stu-1",
            "type": "maintenance",
            "category": "plumbing",
            "message": "Drain blocked",
            "date": "2024-06-02T00:00:00Z"
        }),
    );
    Arc::new(store)
}

pub fn chief() -> Identity {
    Identity::new("chief-1", "chief@hostel.test", "Meera", Role::ChiefWarden)
}

pub fn hostel_warden() -> Identity {
    Identity::new("hw-1", "hw@hostel.test", "Vikram", Role::HostelWarden)
}

pub fn floor_warden() -> Identity {
    Identity::new("fw-1", "fw@hostel.test", "Anita", Role::FloorWarden)
}

pub fn floor_attendant() -> Identity {
    Identity::new("fa-1", "fa@hostel.test", "Ravi", Role::FloorAttendant)
}

pub fn student(id: &str, email: &str) -> Identity {
    Identity::new(id, email, "Student", Role::Student)
}
