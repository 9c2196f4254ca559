//! 规范化工单模型。
//!
//! 工单在存储中有两种表示：学生文档内嵌数组中的元素，以及独立集合中的行。
//! 两者在合并前都必须规整成同一个 [`Issue`]，并以 [`Provenance`] 标记来源。

use serde::{Deserialize, Serialize};

/// 工单类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Complaint,
    Maintenance,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Complaint => "complaint",
            IssueType::Maintenance => "maintenance",
        }
    }

    pub fn parse(value: &str) -> Option<IssueType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "complaint" => Some(IssueType::Complaint),
            "maintenance" => Some(IssueType::Maintenance),
            _ => None,
        }
    }
}

/// 工单状态；`Resolved` 与 `solved == true` 一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::Resolved => "resolved",
        }
    }

    /// 由 solved 标志推导状态。
    pub fn from_solved(solved: bool) -> Self {
        if solved {
            IssueStatus::Resolved
        } else {
            IssueStatus::Open
        }
    }
}

/// 规范化工单。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
    /// 创建时间（Unix 毫秒）。
    pub timestamp_utc: i64,
    pub author_id: String,
    pub student_id: String,
    pub student_name: String,
    pub hostel: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub solved: bool,
    pub status: IssueStatus,
    /// 解决时间（Unix 毫秒），仅在 solved 时存在。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<i64>,
}

impl Issue {
    /// 校验 solved/status 一致，以及 category 仅出现在 maintenance 工单上。
    pub fn is_consistent(&self) -> bool {
        let status_agrees = self.solved == (self.status == IssueStatus::Resolved);
        let category_agrees =
            self.category.is_some() == (self.issue_type == IssueType::Maintenance);
        status_agrees && category_agrees
    }
}

/// 工单来源。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// 学生文档内嵌数组元素。
    Embedded { parent_id: String, field: String },
    /// 独立集合行。
    Standalone { row_id: String },
}

impl Provenance {
    pub fn is_embedded(&self) -> bool {
        matches!(self, Provenance::Embedded { .. })
    }
}

/// 带来源标记的工单，用于跨来源合并去重。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedIssue {
    pub issue: Issue,
    pub provenance: Provenance,
}
