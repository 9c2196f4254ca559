mod auth;

pub use auth::{bearer_token, request_context, require_identity, require_permission};
