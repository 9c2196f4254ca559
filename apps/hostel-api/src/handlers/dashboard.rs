use crate::AppState;
use crate::middleware::{require_identity, require_permission};
use crate::utils::{notice_to_dto, service_error};
use api_contract::{ApiResponse, NoticeDto};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{Action, Resource};

/// 当前身份的角色仪表盘。
pub async fn get_dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Dashboard) {
        return response;
    }
    match state.dashboard.get_dashboard(&identity).await {
        Ok(payload) => (StatusCode::OK, Json(ApiResponse::success(payload))).into_response(),
        Err(err) => service_error(err),
    }
}

/// 公开公告板：最近的未处理工单，不含学生身份信息。
pub async fn notice_board(State(state): State<AppState>) -> Response {
    match state.dashboard.notice_board().await {
        Ok(issues) => {
            let items: Vec<NoticeDto> = issues.into_iter().map(notice_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
        }
        Err(err) => service_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{chief, floor_warden, send, sign, student, test_app, token_for};
    use axum::http::StatusCode;
    use hostel_auth::TokenClaims;

    #[tokio::test]
    async fn dashboard_requires_bearer_token() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/dashboard", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED");

        let (status, _) = send(&app, "GET", "/dashboard", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_without_role_is_forbidden() {
        let app = test_app();
        let mut claims = TokenClaims::for_identity(&student(), 3600);
        claims.role = None;
        let (status, body) = send(&app, "GET", "/dashboard", Some(&sign(&claims)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "AUTH.NO_ROLE");
    }

    #[tokio::test]
    async fn chief_dashboard_covers_every_student() {
        let app = test_app();
        let (status, body) =
            send(&app, "GET", "/api/dashboard", Some(&token_for(&chief())), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "chief_warden");
        assert_eq!(body["data"]["stats"]["totalIssues"], 3);
    }

    #[tokio::test]
    async fn floor_warden_only_sees_assigned_floor() {
        let app = test_app();
        let (status, body) =
            send(&app, "GET", "/dashboard", Some(&token_for(&floor_warden())), None).await;
        assert_eq!(status, StatusCode::OK);
        let issues = body["data"]["issues"].as_array().expect("issues");
        let ids: Vec<&str> = issues.iter().filter_map(|issue| issue["id"].as_str()).collect();
        assert_eq!(ids, vec!["iss-1"]);
    }

    #[tokio::test]
    async fn missing_staff_profile_is_not_found() {
        let app = test_app();
        let ghost = domain::Identity::new("hw-404", "", "", domain::Role::HostelWarden);
        let (status, body) = send(&app, "GET", "/dashboard", Some(&token_for(&ghost)), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "RESOURCE.NOT_FOUND");
    }

    #[tokio::test]
    async fn notice_board_is_public_and_hides_students() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/notice-board", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["data"].as_array().expect("items");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "iss-3");
        assert!(items[0].get("studentName").is_none());
        assert_eq!(items[0]["status"], "open");
    }
}
