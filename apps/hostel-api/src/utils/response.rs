use api_contract::{ApiResponse, FloorDto, HostelDto, MetricsDto, NoticeDto, RoomDto, SearchResultDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{HostelError, Issue};
use hostel_dashboard::{FloorRecord, HostelRecord, RoomRecord};
use hostel_search::SearchHit;
use hostel_telemetry::MetricsSnapshot;

pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error("AUTH.UNAUTHORIZED", "unauthorized")),
    )
        .into_response()
}

pub fn no_role_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.NO_ROLE", "no role assigned")),
    )
        .into_response()
}

pub fn forbidden_error(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", message)),
    )
        .into_response()
}

pub fn bad_request_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message)),
    )
        .into_response()
}

pub fn not_found_error(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(
            "RESOURCE.NOT_FOUND",
            format!("{what} not found"),
        )),
    )
        .into_response()
}

/// 内部错误：原因只写日志，响应体统一为 `upstream failure`。
pub fn internal_error(cause: &str) -> Response {
    tracing::error!(target: "hostel.api", error = %cause, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", "upstream failure")),
    )
        .into_response()
}

/// 服务层错误到 HTTP 响应的映射。
pub fn service_error(err: HostelError) -> Response {
    match err {
        HostelError::Unauthenticated => auth_error(StatusCode::UNAUTHORIZED),
        HostelError::Forbidden(message) => forbidden_error(&message),
        HostelError::NotFound(what) => not_found_error(&what),
        HostelError::InvalidInput(field) => bad_request_error(&format!("invalid {field}")),
        HostelError::Upstream(cause) => internal_error(&cause),
    }
}

pub fn hostel_to_dto(record: HostelRecord) -> HostelDto {
    HostelDto {
        id: record.id,
        name: record.name,
        total_floors: record.total_floors,
        total_rooms: record.total_rooms,
    }
}

pub fn floor_to_dto(record: FloorRecord, hostel_id: &str) -> FloorDto {
    FloorDto {
        id: record.id,
        hostel_id: record.hostel_id.unwrap_or_else(|| hostel_id.to_string()),
        number: record.number,
        total_rooms: record.total_rooms,
    }
}

pub fn room_to_dto(record: RoomRecord) -> RoomDto {
    RoomDto {
        id: record.id,
        hostel_id: record.hostel_id,
        floor_id: record.floor_id,
        number: record.number,
        images: record.images,
    }
}

/// 公告板条目去掉学生身份信息。
pub fn notice_to_dto(issue: Issue) -> NoticeDto {
    NoticeDto {
        id: issue.id,
        category: issue.category,
        message: issue.message,
        hostel: issue.hostel,
        floor: issue.floor,
        room: issue.room,
        status: issue.status.as_str().to_string(),
        timestamp_utc: issue.timestamp_utc,
    }
}

/// `id` 与类型标签作为顶层字段输出，从文档内容中移除同名键。
pub fn hit_to_dto(hit: SearchHit) -> SearchResultDto {
    let label = hit.label().to_string();
    let mut data = hit.data;
    data.remove("id");
    data.remove("type");
    SearchResultDto {
        label,
        id: hit.id,
        data,
    }
}

pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsDto {
    MetricsDto {
        dashboards_served: snapshot.dashboards_served,
        degraded_queries: snapshot.degraded_queries,
        issues_submitted: snapshot.issues_submitted,
        issues_resolved: snapshot.issues_resolved,
        issues_reopened: snapshot.issues_reopened,
        searches: snapshot.searches,
        image_uploads: snapshot.image_uploads,
    }
}
