use crate::AppState;
use crate::middleware::{require_identity, require_permission};
use crate::utils::metrics_to_dto;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{Action, Resource};
use hostel_telemetry::metrics;

/// 进程内计数器快照，仅总舍监可读。
pub async fn get_metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Metrics) {
        return response;
    }
    let dto = metrics_to_dto(metrics().snapshot());
    (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
}

#[cfg(test)]
mod tests {
    use crate::test_support::{chief, floor_warden, send, test_app, token_for};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn metrics_are_chief_only() {
        let app = test_app();
        let (status, _) =
            send(&app, "GET", "/metrics", Some(&token_for(&floor_warden())), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, "GET", "/metrics", Some(&token_for(&chief())), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["searches"].is_u64());
        assert!(body["data"]["imageUploads"].is_u64());
    }
}
