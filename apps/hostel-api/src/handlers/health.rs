use api_contract::{ApiResponse, HealthDto};
use axum::{Json, http::StatusCode, response::IntoResponse};

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthDto {
            status: "ok".to_string(),
        })),
    )
}
