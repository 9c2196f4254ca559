use crate::AppState;
use crate::handlers::{
    create_staff, get_dashboard, get_metrics, get_student, health, list_floors, list_hostels,
    list_issues, list_rooms, list_staff, list_students, notice_board, search, submit_issue,
    update_issue, upload_room_image,
};
use crate::middleware::request_context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// API 路由（不含状态）。
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(get_dashboard))
        .route(
            "/issues",
            get(list_issues).post(submit_issue).patch(update_issue),
        )
        .route("/notice-board", get(notice_board))
        .route("/search", get(search))
        .route("/students", get(list_students))
        .route("/students/:student_id", get(get_student))
        .route("/staff/:role", get(list_staff).post(create_staff))
        .route("/hostels", get(list_hostels))
        .route("/hostels/:hostel_id/floors", get(list_floors))
        .route("/rooms", get(list_rooms))
        .route("/rooms/:room_id/images", post(upload_room_image))
        .route("/metrics", get(get_metrics))
}

/// 完整应用路由：同时挂载在 `/` 与 `/api` 下。
pub fn create_router(state: AppState) -> Router {
    let api = create_api_router();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
