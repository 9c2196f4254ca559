/// 服务层统一错误分类，HTTP 层据此映射状态码。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostelError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl HostelError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(field: impl Into<String>) -> Self {
        Self::InvalidInput(field.into())
    }
}
