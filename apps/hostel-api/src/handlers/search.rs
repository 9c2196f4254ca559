use crate::AppState;
use crate::middleware::require_identity;
use crate::utils::{hit_to_dto, normalize_required, service_error};
use api_contract::{ApiResponse, SearchQuery, SearchResponse};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

/// 跨集合检索；允许的集合由角色决定。
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let text = match normalize_required(query.query, "query") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .search
        .search(&identity, &text, query.filter.as_deref())
        .await
    {
        Ok(hits) => {
            let results = hits.into_iter().map(hit_to_dto).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(SearchResponse { results })),
            )
                .into_response()
        }
        Err(err) => service_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{chief, floor_attendant, floor_warden, send, student, test_app, token_for};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn chief_finds_students_with_type_label() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "GET",
            "/search?query=asha&filter=students",
            Some(&token_for(&chief())),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = body["data"]["results"].as_array().expect("results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["type"], "Student");
        assert_eq!(results[0]["id"], "stu-1");
    }

    #[tokio::test]
    async fn room_number_matches_case_insensitively() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "GET",
            "/search?query=h1-101&filter=students",
            Some(&token_for(&chief())),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = body["data"]["results"].as_array().expect("results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["type"], "Student");
        assert_eq!(results[0]["room"], "H1-101");
    }

    #[tokio::test]
    async fn floor_warden_search_stays_in_scope() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "GET",
            "/search?query=hostel.test&filter=students",
            Some(&token_for(&floor_warden())),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]["results"]
            .as_array()
            .expect("results")
            .iter()
            .filter_map(|hit| hit["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["stu-1"]);
    }

    #[tokio::test]
    async fn disallowed_targets_are_forbidden() {
        let app = test_app();
        let (status, _) = send(
            &app,
            "GET",
            "/search?query=asha&filter=students",
            Some(&token_for(&floor_attendant())),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, "GET", "/search?query=asha", Some(&token_for(&student())), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn blank_query_and_unknown_filter_are_rejected() {
        let app = test_app();
        let token = token_for(&chief());
        let (status, body) = send(&app, "GET", "/search?query=%20", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "query required");

        let (status, body) =
            send(&app, "GET", "/search?query=a&filter=rooms", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "invalid filter: rooms");
    }
}
