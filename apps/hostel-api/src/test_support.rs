//! handler 测试共用的状态构造与请求工具。

use crate::{ApiSettings, AppState, routes};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::{Identity, Role, Scope};
use hostel_auth::{DocumentProfileDirectory, IdentityResolver, JwtManager, TokenClaims};
use hostel_blob::InMemoryBlobStore;
use hostel_storage::{InMemoryDocumentStore, seed_demo};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryDocumentStore>,
    pub blob: Arc<InMemoryBlobStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryDocumentStore::new());
    seed_demo(&store);
    let blob = Arc::new(InMemoryBlobStore::new());
    let resolver = IdentityResolver::new(JwtManager::new(SECRET.to_string(), None))
        .with_profiles(Arc::new(DocumentProfileDirectory::new(store.clone())));
    let state = AppState::new(
        store.clone(),
        Arc::new(resolver),
        blob.clone(),
        ApiSettings {
            blob_folder: "hostel".to_string(),
            max_image_bytes: 1024,
            issue_list_limit: 100,
        },
    );
    TestApp { state, store, blob }
}

pub fn chief() -> Identity {
    Identity::new("chief-1", "chief@hostel.test", "Meera Rao", Role::ChiefWarden)
}

pub fn floor_warden() -> Identity {
    Identity::new("fw-1", "fw@hostel.test", "Anita Das", Role::FloorWarden)
        .with_scope(Scope::floors(["H1-F1"]))
}

pub fn floor_attendant() -> Identity {
    Identity::new("fa-1", "fa@hostel.test", "Ravi Kumar", Role::FloorAttendant)
}

pub fn student() -> Identity {
    Identity::new("stu-1", "asha@hostel.test", "Asha Verma", Role::Student)
}

pub fn token_for(identity: &Identity) -> String {
    let claims = TokenClaims::for_identity(identity, 3600);
    sign(&claims)
}

pub fn sign(claims: &TokenClaims) -> String {
    JwtManager::new(SECRET.to_string(), None)
        .issue_token(claims)
        .expect("token")
}

/// 经完整路由（含中间件）发送请求，返回状态码与 JSON 响应体。
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    let response = routes::create_router(app.state.clone())
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let bytes: bytes::Bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
