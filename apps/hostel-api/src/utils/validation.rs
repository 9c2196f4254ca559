use crate::utils::bad_request_error;
use axum::response::Response;

/// 必填文本字段：去除首尾空白后不能为空。
pub fn normalize_required(value: Option<String>, field: &str) -> Result<String, Response> {
    match value.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(bad_request_error(&format!("{field} required"))),
    }
}

/// 可选文本字段：提供时不能为空白。
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(bad_request_error(&format!("{field} required")));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}
