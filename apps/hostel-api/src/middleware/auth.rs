use crate::AppState;
use crate::utils::{auth_error, forbidden_error, internal_error, no_role_error};
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use domain::{Action, Identity, Resource, can};
use hostel_auth::AuthError;
use hostel_telemetry::new_request_ids;
use tracing::Instrument;

/// 为每个请求生成 request_id/trace_id，写入 span 与响应头。
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %req.method(),
        path = %req.uri().path()
    );
    req.extensions_mut().insert(ids.clone());
    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&ids.request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    if let Ok(value) = HeaderValue::from_str(&ids.trace_id) {
        response.headers_mut().insert("x-trace-id", value);
    }
    response
}

/// 从请求头中提取 Bearer Token。
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 解析调用方身份；失败时直接返回错误响应。
pub async fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(auth_error(StatusCode::UNAUTHORIZED));
    };
    match state.auth.resolve(token).await {
        Ok(identity) => Ok(identity),
        Err(AuthError::Unauthenticated | AuthError::TokenExpired) => {
            Err(auth_error(StatusCode::UNAUTHORIZED))
        }
        Err(AuthError::NoRoleAssigned) => Err(no_role_error()),
        Err(AuthError::Internal(message)) => Err(internal_error(&message)),
    }
}

/// 角色能力检查。
pub fn require_permission(
    identity: &Identity,
    action: Action,
    resource: Resource,
) -> Result<(), Response> {
    if can(identity.role, action, resource) {
        Ok(())
    } else {
        Err(forbidden_error("insufficient role"))
    }
}
