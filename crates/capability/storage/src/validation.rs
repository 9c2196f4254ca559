//! 验证辅助函数
//!
//! - ensure_collection：集合名非空且只含安全字符
//! - ensure_document_id：文档 ID 非空
//! - ensure_field_path：字段路径每一段非空

use crate::error::StorageError;

/// 验证集合名
pub fn ensure_collection(collection: &str) -> Result<(), StorageError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !valid {
        return Err(StorageError::new(format!("invalid collection: {collection}")));
    }
    Ok(())
}

/// 验证文档 ID
pub fn ensure_document_id(id: &str) -> Result<(), StorageError> {
    if id.trim().is_empty() {
        return Err(StorageError::new("document id required"));
    }
    Ok(())
}

/// 验证字段路径
pub fn ensure_field_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(StorageError::new(format!("invalid field path: {path}")));
    }
    Ok(())
}
