//! 工单定位：索引 → 作用域内学生文档扫描 → 独立集合。

use crate::IssueService;
use domain::collections::{EMBEDDED_ISSUE_FIELDS, ISSUE_INDEX, ISSUES, STUDENTS};
use domain::{HostelError, Identity, Issue, Role};
use hostel_normalize::fields::first_text;
use hostel_normalize::{ParentContext, SourceKind, normalize_issue, now_ms};
use hostel_scope::{ScopePredicate, find_profile, scope_for, scoped_students};
use hostel_storage::{Document, Query};
use serde_json::Value;

/// 工单所在位置。
pub(crate) enum Location {
    /// 学生文档 `field` 数组的第 `position` 个元素。
    Embedded {
        student: Document,
        field: String,
        position: usize,
    },
    /// 独立集合行。
    Standalone { row: Document },
}

pub(crate) struct Located {
    pub location: Location,
    pub issue: Issue,
}

/// 在学生文档的内嵌数组中查找工单；`field` 为 None 时检查全部数组。
fn find_embedded(student: &Document, issue_id: &str, field: Option<&str>, now: i64) -> Option<Located> {
    let parent = ParentContext::from_student(&student.id, &student.data);
    let fields: Vec<&str> = match field {
        Some(field) => vec![field],
        None => EMBEDDED_ISSUE_FIELDS.to_vec(),
    };
    for field in fields {
        let Some(items) = student.data.get(field).and_then(Value::as_array) else {
            continue;
        };
        let kind = SourceKind::for_field(field);
        for (position, item) in items.iter().enumerate() {
            let Some(raw) = item.as_object() else {
                continue;
            };
            let issue = normalize_issue(raw, kind, &parent, now);
            if issue.id == issue_id {
                return Some(Located {
                    location: Location::Embedded {
                        student: student.clone(),
                        field: field.to_string(),
                        position,
                    },
                    issue,
                });
            }
        }
    }
    None
}

impl IssueService {
    /// 在身份范围内定位工单。范围外的工单与不存在的工单同样返回 None。
    pub(crate) async fn locate(
        &self,
        identity: &Identity,
        issue_id: &str,
    ) -> Result<Option<Located>, HostelError> {
        let store = self.store.as_ref();
        let now = now_ms();
        let (predicate, own_document) = if identity.role == Role::Student {
            let email = Some(identity.email.as_str()).filter(|email| !email.is_empty());
            let Some(doc) = find_profile(store, STUDENTS, &identity.id, email).await? else {
                return Ok(None);
            };
            (ScopePredicate::SelfOnly(doc.id.clone()), Some(doc))
        } else {
            (scope_for(identity)?, None)
        };

        if let Some(hit) = self.locate_indexed(issue_id, now).await {
            return Ok(predicate.admits_issue(&hit.issue).then_some(hit));
        }

        let candidates = match own_document {
            Some(doc) => vec![doc],
            None => scoped_students(store, &predicate).await?,
        };
        let scanned = candidates
            .iter()
            .find_map(|doc| find_embedded(doc, issue_id, None, now));
        if let Some(hit) = scanned {
            if !predicate.admits_issue(&hit.issue) {
                return Ok(None);
            }
            if let Location::Embedded { student, field, .. } = &hit.location {
                self.write_index(issue_id, &student.id, field).await;
            }
            return Ok(Some(hit));
        }

        let hit = self.locate_standalone(issue_id, now).await?;
        Ok(hit.filter(|hit| predicate.admits_issue(&hit.issue)))
    }

    /// 通过 `issue_index` 定位；索引缺失、过期或读取失败时返回 None。
    async fn locate_indexed(&self, issue_id: &str, now: i64) -> Option<Located> {
        let entry = match self.store.get(ISSUE_INDEX, issue_id).await {
            Ok(entry) => entry?,
            Err(err) => {
                tracing::warn!(target: "hostel.issues", issue_id, error = %err, "issue index read failed, scanning");
                return None;
            }
        };
        let student_id = entry.str_field("studentId")?;
        let field = entry.str_field("field");
        let student = match self.store.get(STUDENTS, student_id).await {
            Ok(student) => student?,
            Err(err) => {
                tracing::warn!(target: "hostel.issues", issue_id, error = %err, "indexed student read failed, scanning");
                return None;
            }
        };
        find_embedded(&student, issue_id, field, now)
    }

    /// 独立集合：先按 `id` 字段查找，再按行 ID 查找。
    async fn locate_standalone(&self, issue_id: &str, now: i64) -> Result<Option<Located>, HostelError> {
        let store = self.store.as_ref();
        let by_field = store
            .query(ISSUES, &Query::all().eq("id", issue_id).limit(1))
            .await?
            .into_iter()
            .next();
        let row = match by_field {
            Some(row) => row,
            None => match store.get(ISSUES, issue_id).await? {
                Some(row) => row,
                None => return Ok(None),
            },
        };
        let student_id =
            first_text(&row.data, &["studentId", "userId", "authorId"]).unwrap_or_default();
        let parent = match store.get(STUDENTS, &student_id).await {
            Ok(Some(doc)) => ParentContext::from_student(&doc.id, &doc.data),
            _ => ParentContext::detached(&student_id),
        };
        let mut issue = normalize_issue(&row.data, SourceKind::Standalone, &parent, now);
        if first_text(&row.data, &["id", "issueId"]).is_none() {
            issue.id = row.id.clone();
        }
        Ok(Some(Located {
            location: Location::Standalone { row },
            issue,
        }))
    }
}
