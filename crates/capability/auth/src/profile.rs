use crate::AuthError;
use async_trait::async_trait;
use domain::{Role, Scope};
use hostel_normalize::normalize_person;
use hostel_scope::find_profile;
use hostel_storage::DocumentStore;
use std::sync::Arc;

/// 员工档案目录：claims 不带作用域时补全分配的楼宇/楼层。
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn staff_scope(
        &self,
        role: Role,
        subject_id: &str,
        email: Option<&str>,
    ) -> Result<Option<Scope>, AuthError>;
}

/// 基于文档存储的档案目录：先按 ID，再按邮箱查找。
pub struct DocumentProfileDirectory {
    store: Arc<dyn DocumentStore>,
}

impl DocumentProfileDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileDirectory for DocumentProfileDirectory {
    async fn staff_scope(
        &self,
        role: Role,
        subject_id: &str,
        email: Option<&str>,
    ) -> Result<Option<Scope>, AuthError> {
        let document = find_profile(self.store.as_ref(), role.profile_collection(), subject_id, email)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(document.map(|doc| {
            let person = normalize_person(&doc.id, role, &doc.data);
            Scope {
                assigned_hostel_id: person.assigned_hostel.or(person.hostel_id),
                assigned_floor_ids: person.assigned_floors.into_iter().collect(),
            }
        }))
    }
}
