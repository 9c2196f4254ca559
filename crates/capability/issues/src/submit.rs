use crate::IssueService;
use domain::collections::{FIELD_ISSUES, ISSUE_INDEX, STUDENTS};
use domain::{HostelError, Identity, Issue, IssueType, Role};
use hostel_normalize::{ParentContext, SourceKind, normalize_issue, now_ms};
use hostel_scope::find_profile;
use hostel_storage::Document;
use hostel_telemetry::record_issue_submitted;
use serde_json::{Map, Value};

/// 提交时携带的住宿信息。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostelDetails {
    pub hostel_id: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
}

impl HostelDetails {
    fn to_value(&self) -> Option<Value> {
        let mut details = Map::new();
        for (key, value) in [
            ("hostelId", &self.hostel_id),
            ("floor", &self.floor),
            ("room", &self.room),
        ] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                details.insert(key.to_string(), Value::from(value));
            }
        }
        (!details.is_empty()).then_some(Value::Object(details))
    }
}

/// 工单提交参数（原始输入，由服务校验）。
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub issue_type: String,
    pub content: String,
    pub category: Option<String>,
    pub hostel_details: Option<HostelDetails>,
}

struct Validated {
    issue_type: IssueType,
    message: String,
    category: Option<String>,
}

/// 维修工单必须带分类；投诉工单的分类被丢弃。
fn validate(new: &NewIssue) -> Result<Validated, HostelError> {
    let issue_type = IssueType::parse(&new.issue_type).ok_or_else(|| HostelError::invalid("type"))?;
    let message = new.content.trim();
    if message.is_empty() {
        return Err(HostelError::invalid("content"));
    }
    let category = match issue_type {
        IssueType::Maintenance => Some(
            new.category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .ok_or_else(|| HostelError::invalid("category"))?
                .to_string(),
        ),
        IssueType::Complaint => None,
    };
    Ok(Validated {
        issue_type,
        message: message.to_string(),
        category,
    })
}

impl IssueService {
    /// 提交工单，返回规范化后的工单。
    ///
    /// 学生文档按 ID、再按邮箱查找；都不存在时以身份 ID 新建。
    pub async fn submit_issue(&self, identity: &Identity, new: NewIssue) -> Result<Issue, HostelError> {
        if identity.role != Role::Student {
            return Err(HostelError::forbidden("only students can submit issues"));
        }
        let valid = validate(&new)?;
        let details = new.hostel_details.as_ref().and_then(HostelDetails::to_value);
        let student = self.student_document(identity, details.as_ref()).await?;
        let now = now_ms();

        let mut raw = Map::new();
        raw.insert("id".to_string(), Value::from(uuid::Uuid::new_v4().to_string()));
        raw.insert("type".to_string(), Value::from(valid.issue_type.as_str()));
        raw.insert("message".to_string(), Value::from(valid.message));
        raw.insert("timestampUtc".to_string(), Value::from(now));
        raw.insert("authorId".to_string(), Value::from(identity.id.as_str()));
        if let Some(category) = valid.category {
            raw.insert("category".to_string(), Value::from(category));
        }
        if let Some(details) = details {
            raw.insert("hostelDetails".to_string(), details);
        }
        let parent = ParentContext::from_student(&student.id, &student.data);
        let issue = normalize_issue(&raw, SourceKind::EmbeddedIssue, &parent, now);
        let stored = serde_json::to_value(&issue)
            .map_err(|err| HostelError::Upstream(format!("issue encoding: {err}")))?;

        let appended = self
            .store
            .array_union(STUDENTS, &student.id, FIELD_ISSUES, vec![stored])
            .await?;
        if !appended {
            return Err(HostelError::not_found("student"));
        }
        self.write_index(&issue.id, &student.id, FIELD_ISSUES).await;

        record_issue_submitted();
        tracing::info!(
            target: "hostel.issues",
            issue_id = %issue.id,
            student_id = %student.id,
            issue_type = issue.issue_type.as_str(),
            "issue submitted"
        );
        Ok(issue)
    }

    async fn student_document(
        &self,
        identity: &Identity,
        details: Option<&Value>,
    ) -> Result<Document, HostelError> {
        let email = Some(identity.email.as_str()).filter(|email| !email.is_empty());
        if let Some(doc) = find_profile(self.store.as_ref(), STUDENTS, &identity.id, email).await? {
            return Ok(doc);
        }
        let mut data = Map::new();
        data.insert("name".to_string(), Value::from(identity.display_name.as_str()));
        data.insert("email".to_string(), Value::from(identity.email.as_str()));
        data.insert("createdAt".to_string(), Value::from(now_ms()));
        data.insert(FIELD_ISSUES.to_string(), Value::Array(Vec::new()));
        if let Some(details) = details {
            data.insert("hostelDetails".to_string(), details.clone());
        }
        self.store.set(STUDENTS, &identity.id, data.clone()).await?;
        tracing::info!(target: "hostel.issues", student_id = %identity.id, "student record created on first submission");
        Ok(Document::new(identity.id.clone(), data))
    }

    /// 写入二级索引；失败只告警，工单仍可通过扫描定位。
    pub(crate) async fn write_index(&self, issue_id: &str, student_id: &str, field: &str) {
        let mut entry = Map::new();
        entry.insert("studentId".to_string(), Value::from(student_id));
        entry.insert("collection".to_string(), Value::from(STUDENTS));
        entry.insert("field".to_string(), Value::from(field));
        if let Err(err) = self.store.set(ISSUE_INDEX, issue_id, entry).await {
            tracing::warn!(target: "hostel.issues", issue_id, error = %err, "issue index write failed");
        }
    }
}
