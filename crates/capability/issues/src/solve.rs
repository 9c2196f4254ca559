use crate::IssueService;
use crate::locate::Location;
use domain::collections::{ISSUES, STUDENTS};
use domain::{HostelError, Identity, IssueStatus, IssueType, Role};
use hostel_normalize::now_ms;
use hostel_telemetry::{record_issue_reopened, record_issue_resolved};
use serde_json::{Map, Value};

/// 内嵌工单在并发修改下的最大写入次数。
const WRITE_ATTEMPTS: u32 = 3;

/// 状态变更结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveAck {
    pub issue_id: String,
    pub solved: bool,
    /// 工单原本已处于目标状态时为 false。
    pub changed: bool,
}

/// 写入解决状态；目标上存在旧字段 `isSolved` 时同步改写。
fn apply_state(target: &mut Map<String, Value>, solved: bool, legacy_flag: bool, now: i64) {
    target.insert("solved".to_string(), Value::Bool(solved));
    if legacy_flag {
        target.insert("isSolved".to_string(), Value::Bool(solved));
    }
    target.insert(
        "status".to_string(),
        Value::from(IssueStatus::from_solved(solved).as_str()),
    );
    target.insert(
        "completeDate".to_string(),
        if solved { Value::from(now) } else { Value::Null },
    );
}

impl IssueService {
    /// 标记工单解决或重新打开。
    ///
    /// 楼层保洁员只能修改维修工单；范围外与不存在的工单都返回 NotFound。
    pub async fn set_solved(
        &self,
        identity: &Identity,
        issue_id: &str,
        solved: bool,
    ) -> Result<SolveAck, HostelError> {
        let issue_id = issue_id.trim();
        if issue_id.is_empty() {
            return Err(HostelError::invalid("issueId"));
        }
        for attempt in 1..=WRITE_ATTEMPTS {
            let located = self
                .locate(identity, issue_id)
                .await?
                .ok_or_else(|| HostelError::not_found("issue"))?;
            if identity.role == Role::FloorAttendant
                && located.issue.issue_type != IssueType::Maintenance
            {
                return Err(HostelError::forbidden(
                    "floor attendants can only update maintenance issues",
                ));
            }
            if located.issue.solved == solved {
                return Ok(SolveAck {
                    issue_id: issue_id.to_string(),
                    solved,
                    changed: false,
                });
            }
            if self.write_state(located.location, solved).await? {
                if solved {
                    record_issue_resolved();
                } else {
                    record_issue_reopened();
                }
                tracing::info!(
                    target: "hostel.issues",
                    issue_id,
                    solved,
                    updated_by = %identity.id,
                    role = %identity.role,
                    "issue state changed"
                );
                return Ok(SolveAck {
                    issue_id: issue_id.to_string(),
                    solved,
                    changed: true,
                });
            }
            tracing::warn!(
                target: "hostel.issues",
                issue_id,
                attempt,
                "issue changed during update, retrying"
            );
        }
        Err(HostelError::Upstream(format!(
            "issue {issue_id} changed concurrently"
        )))
    }

    /// 写入新状态。内嵌工单按原元素比较后替换，元素已被并发修改时返回 false。
    async fn write_state(&self, location: Location, solved: bool) -> Result<bool, HostelError> {
        let now = now_ms();
        match location {
            Location::Embedded {
                student,
                field,
                position,
            } => {
                let Some(original) = student
                    .data
                    .get(&field)
                    .and_then(Value::as_array)
                    .and_then(|items| items.get(position))
                else {
                    return Ok(false);
                };
                let Value::Object(element) = original else {
                    return Err(HostelError::not_found("issue"));
                };
                let mut patched = element.clone();
                apply_state(&mut patched, solved, element.contains_key("isSolved"), now);
                Ok(self
                    .store
                    .array_replace(STUDENTS, &student.id, &field, original, Value::Object(patched))
                    .await?)
            }
            Location::Standalone { row } => {
                let mut patch = Map::new();
                apply_state(&mut patch, solved, row.data.contains_key("isSolved"), now);
                if !self.store.update(ISSUES, &row.id, patch).await? {
                    return Err(HostelError::not_found("issue"));
                }
                Ok(true)
            }
        }
    }
}
