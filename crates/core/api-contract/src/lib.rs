//! 稳定的 DTO 与 API 响应契约。

use domain::{Issue, Person};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 提交工单时携带的住宿信息。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelDetailsDto {
    pub hostel_id: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
}

/// 工单提交请求体。
///
/// 字段均为可选，缺失时由 handler 返回带字段名的 400。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIssueRequest {
    #[serde(alias = "message")]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub category: Option<String>,
    pub hostel_details: Option<HostelDetailsDto>,
}

/// 工单提交响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIssueResponse {
    pub issue_id: String,
}

/// 工单状态变更请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueRequest {
    #[serde(alias = "issue_id", alias = "id")]
    pub issue_id: Option<String>,
    pub solved: Option<bool>,
}

/// 工单状态变更响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueResponse {
    pub success: bool,
    pub issue_id: String,
    pub solved: bool,
    /// 工单原本已处于目标状态时为 false。
    pub changed: bool,
}

/// 工单列表查询参数。
#[derive(Debug, Default, Deserialize)]
pub struct IssueListQuery {
    /// `pending` | `solved`
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub limit: Option<usize>,
}

/// 工单列表响应体；`count` 为截断前的匹配总数。
#[derive(Debug, Serialize)]
pub struct IssueListResponse {
    pub issues: Vec<Issue>,
    pub count: usize,
}

/// 检索查询参数。
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    /// 逗号分隔的集合列表，缺省为全部允许的集合。
    pub filter: Option<String>,
}

/// 单条检索结果：类型标签 + 文档内容。
#[derive(Debug, Serialize)]
pub struct SearchResultDto {
    #[serde(rename = "type")]
    pub label: String,
    pub id: String,
    #[serde(flatten)]
    pub data: serde_json::Map<String, Value>,
}

/// 检索响应体。
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultDto>,
}

/// 人员列表响应体（学生或员工）。
#[derive(Debug, Serialize)]
pub struct PeopleResponse {
    pub items: Vec<Person>,
    pub count: usize,
}

/// 员工创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub assigned_hostel: Option<String>,
    #[serde(default)]
    pub assigned_floors: Vec<String>,
    pub reports_to: Option<String>,
}

/// 楼宇返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelDto {
    pub id: String,
    pub name: String,
    pub total_floors: Option<u64>,
    pub total_rooms: Option<u64>,
}

/// 楼层返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDto {
    pub id: String,
    pub hostel_id: String,
    pub number: Option<i64>,
    pub total_rooms: Option<u64>,
}

/// 房间返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub hostel_id: Option<String>,
    pub floor_id: Option<String>,
    pub number: Option<String>,
    pub images: Vec<String>,
}

/// 房间图片上传请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    /// base64 或 data URI。
    pub image: Option<String>,
    pub public_id: Option<String>,
}

/// 房间图片上传响应体。
#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub url: String,
    pub images: Vec<String>,
}

/// 公告板条目（不含学生身份信息）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDto {
    pub id: String,
    pub category: Option<String>,
    pub message: String,
    pub hostel: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub status: String,
    pub timestamp_utc: i64,
}

/// 计数器返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub dashboards_served: u64,
    pub degraded_queries: u64,
    pub issues_submitted: u64,
    pub issues_resolved: u64,
    pub issues_reopened: u64,
    pub searches: u64,
    pub image_uploads: u64,
}

/// 健康检查响应体。
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
}
