use crate::AppState;
use crate::middleware::{require_identity, require_permission};
use crate::utils::{bad_request_error, normalize_required, service_error};
use api_contract::{
    ApiResponse, IssueListQuery, IssueListResponse, SubmitIssueRequest, SubmitIssueResponse,
    UpdateIssueRequest, UpdateIssueResponse,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{Action, IssueType, Resource};
use hostel_dashboard::{IssueFilter, StatusFilter};
use hostel_issues::{HostelDetails, NewIssue};

/// 学生提交工单。
pub async fn submit_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitIssueRequest>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Create, Resource::Issue) {
        return response;
    }
    let issue_type = match normalize_required(payload.issue_type, "type") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let content = match normalize_required(payload.content, "content") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let new = NewIssue {
        issue_type,
        content,
        category: payload.category,
        hostel_details: payload.hostel_details.map(|details| HostelDetails {
            hostel_id: details.hostel_id,
            floor: details.floor,
            room: details.room,
        }),
    };
    match state.issues.submit_issue(&identity, new).await {
        Ok(issue) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(SubmitIssueResponse { issue_id: issue.id })),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}

/// 范围内工单列表，可按状态与类型筛选。
pub async fn list_issues(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IssueListQuery>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Issue) {
        return response;
    }
    let status = match query.status.as_deref() {
        Some(value) => match StatusFilter::parse(value) {
            Some(status) => Some(status),
            None => return bad_request_error("invalid status"),
        },
        None => None,
    };
    let issue_type = match query.issue_type.as_deref() {
        Some(value) => match IssueType::parse(value) {
            Some(kind) => Some(kind),
            None => return bad_request_error("invalid type"),
        },
        None => None,
    };
    let max = state.settings.issue_list_limit;
    let limit = match query.limit {
        Some(0) => return bad_request_error("invalid limit"),
        Some(limit) => limit.min(max),
        None => max,
    };
    let filter = IssueFilter {
        status,
        issue_type,
        limit,
    };
    match state.dashboard.list_issues(&identity, filter).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(IssueListResponse {
                issues: list.issues,
                count: list.count,
            })),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}

/// 标记工单解决或重新打开。
pub async fn update_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateIssueRequest>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let issue_id = match normalize_required(payload.issue_id, "issueId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let Some(solved) = payload.solved else {
        return bad_request_error("solved required");
    };
    if let Err(response) = require_permission(&identity, Action::Update, Resource::Issue) {
        return response;
    }
    match state.issues.set_solved(&identity, &issue_id, solved).await {
        Ok(ack) => (
            StatusCode::OK,
            Json(ApiResponse::success(UpdateIssueResponse {
                success: true,
                issue_id: ack.issue_id,
                solved: ack.solved,
                changed: ack.changed,
            })),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
