//! 工单标准化。
//!
//! 规则：
//! - `type` 缺失时由来源推导（complaints 数组 → complaint，maintenance 数组 → maintenance，其他 → complaint）
//! - `solved = solved || isSolved || status == "resolved"`
//! - 时间依次取原生 `timestamp`、`timestampUtc`、`date`、`createdAt`，最后取当前时间
//! - hostel/floor/room：工单字段 → 工单 `hostelDetails.*` → 学生字段 → 学生 `hostelDetails.*`
//! - `studentId`/`studentName` 总是取自父文档
//!
//! 对已规范的工单再次标准化得到相同结果。

use crate::fields::{first_text, flag, nested_text};
use crate::person::{floor_of, hostel_of, room_of};
use crate::timestamp::any_timestamp;
use domain::collections::{EMBEDDED_ISSUE_FIELDS, FIELD_COMPLAINTS, FIELD_MAINTENANCE};
use domain::{Issue, IssueStatus, IssueType, Provenance, SourcedIssue};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 维修工单缺失分类时的默认值。
pub const DEFAULT_CATEGORY: &str = "general";

/// 原始工单的来源形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    EmbeddedIssue,
    EmbeddedComplaint,
    EmbeddedMaintenance,
    Standalone,
}

impl SourceKind {
    /// 学生文档数组字段对应的来源。
    pub fn for_field(field: &str) -> SourceKind {
        match field {
            FIELD_COMPLAINTS => SourceKind::EmbeddedComplaint,
            FIELD_MAINTENANCE => SourceKind::EmbeddedMaintenance,
            _ => SourceKind::EmbeddedIssue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::EmbeddedIssue => "embedded_issue",
            SourceKind::EmbeddedComplaint => "embedded_complaint",
            SourceKind::EmbeddedMaintenance => "embedded_maintenance",
            SourceKind::Standalone => "standalone",
        }
    }

    fn default_type(&self) -> IssueType {
        match self {
            SourceKind::EmbeddedMaintenance => IssueType::Maintenance,
            _ => IssueType::Complaint,
        }
    }
}

/// 工单所属学生的上下文，位置字段已按学生文档回退链解析。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentContext {
    pub student_id: String,
    pub student_name: String,
    pub hostel: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
}

impl ParentContext {
    /// 从学生文档构造。
    pub fn from_student(student_id: &str, data: &Map<String, Value>) -> Self {
        Self {
            student_id: student_id.to_string(),
            student_name: first_text(data, &["name", "displayName", "fullName"]).unwrap_or_default(),
            hostel: hostel_of(data),
            floor: floor_of(data),
            room: room_of(data),
        }
    }

    /// 找不到学生文档时（独立集合行）仅保留 ID。
    pub fn detached(student_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            ..Self::default()
        }
    }
}

/// 标准化单条原始工单。
pub fn normalize_issue(
    raw: &Map<String, Value>,
    kind: SourceKind,
    parent: &ParentContext,
    now_ms: i64,
) -> Issue {
    let issue_type = raw
        .get("type")
        .and_then(Value::as_str)
        .and_then(IssueType::parse)
        .unwrap_or_else(|| kind.default_type());
    let message = first_text(raw, &["message", "content", "description"]).unwrap_or_default();
    let timestamp_utc = timestamp_of(raw).unwrap_or(now_ms);

    let raw_status = raw
        .get("status")
        .and_then(Value::as_str)
        .map(|status| status.trim().to_ascii_lowercase().replace(['-', ' '], "_"));
    let solved = flag(raw, "solved")
        || flag(raw, "isSolved")
        || raw_status.as_deref() == Some("resolved");
    let status = if solved {
        IssueStatus::Resolved
    } else if raw_status.as_deref() == Some("in_progress") {
        IssueStatus::InProgress
    } else {
        IssueStatus::Open
    };
    let complete_date = if solved {
        raw.get("completeDate").and_then(complete_date_of)
    } else {
        None
    };

    let category = match issue_type {
        IssueType::Maintenance => Some(
            first_text(raw, &["category"]).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        ),
        IssueType::Complaint => None,
    };

    let id = first_text(raw, &["id", "issueId"]).unwrap_or_else(|| {
        let seed = format!(
            "{}|{}|{}|{}",
            parent.student_id,
            kind.as_str(),
            message,
            timestamp_utc
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
    });

    Issue {
        id,
        issue_type,
        message,
        timestamp_utc,
        author_id: first_text(raw, &["authorId", "userId"])
            .unwrap_or_else(|| parent.student_id.clone()),
        student_id: parent.student_id.clone(),
        student_name: parent.student_name.clone(),
        hostel: first_text(raw, &["hostel", "hostelId"])
            .or_else(|| nested_text(raw, "hostelDetails", &["hostelId", "hostel"]))
            .or_else(|| parent.hostel.clone()),
        floor: first_text(raw, &["floor", "floorId"])
            .or_else(|| nested_text(raw, "hostelDetails", &["floor", "floorId"]))
            .or_else(|| parent.floor.clone()),
        room: first_text(raw, &["room", "roomNumber"])
            .or_else(|| nested_text(raw, "hostelDetails", &["room", "roomNumber"]))
            .or_else(|| parent.room.clone()),
        category,
        solved,
        status,
        complete_date,
    }
}

/// 数字形态的 `completeDate` 已是毫秒，不做秒/毫秒换算。
fn complete_date_of(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| any_timestamp(value))
}

fn timestamp_of(raw: &Map<String, Value>) -> Option<i64> {
    raw.get("timestamp")
        .and_then(any_timestamp)
        .or_else(|| raw.get("timestampUtc").and_then(Value::as_i64))
        .or_else(|| raw.get("date").and_then(any_timestamp))
        .or_else(|| raw.get("createdAt").and_then(any_timestamp))
}

/// 展开学生文档中 `issues`/`complaints`/`maintenance` 三个数组的全部工单。
///
/// 非对象元素被跳过；顺序为字段顺序 + 数组顺序。
pub fn embedded_issues(student_id: &str, data: &Map<String, Value>, now_ms: i64) -> Vec<SourcedIssue> {
    let parent = ParentContext::from_student(student_id, data);
    let mut issues = Vec::new();
    for field in EMBEDDED_ISSUE_FIELDS {
        let Some(items) = data.get(field).and_then(Value::as_array) else {
            continue;
        };
        let kind = SourceKind::for_field(field);
        for raw in items.iter().filter_map(Value::as_object) {
            issues.push(SourcedIssue {
                issue: normalize_issue(raw, kind, &parent, now_ms),
                provenance: Provenance::Embedded {
                    parent_id: student_id.to_string(),
                    field: field.to_string(),
                },
            });
        }
    }
    issues
}
