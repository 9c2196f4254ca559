//! 跨集合检索。
//!
//! 人员集合按姓名排序读取后，在内存中做不区分大小写的子串匹配
//! （姓名、邮箱、电话、学号、专业、楼宇、房间）；结果再经过调用方作用域过滤，
//! 员工按楼宇或所分配楼层判定。
//! 工单使用存储原生的 `message` 前缀范围查询，区分大小写。
//!
//! 可检索的集合由策略 [`domain::can`] 决定；请求的集合全部不被允许时返回 `Forbidden`。

mod matching;

pub use matching::{person_matches, prefix_upper_bound};

use domain::collections::ISSUES;
use domain::{Action, HostelError, Identity, IssueType, Resource, Role, SearchTarget, can};
use hostel_normalize::fields::first_text;
use hostel_normalize::{ParentContext, SourceKind, normalize_issue, normalize_person, now_ms};
use hostel_scope::{ScopePredicate, scope_floor_ids, scope_for, scoped_students};
use hostel_storage::{Direction, DocumentStore, FilterOp, Query, StorageError};
use hostel_telemetry::record_search;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// 单条检索结果。
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub target: SearchTarget,
    pub id: String,
    pub data: Map<String, Value>,
}

impl SearchHit {
    /// 面向用户的类型标签。
    pub fn label(&self) -> &'static str {
        label(self.target)
    }
}

pub fn label(target: SearchTarget) -> &'static str {
    match target.role() {
        Some(role) => role.label(),
        None => "Issue",
    }
}

/// 解析逗号分隔的集合列表；空值表示全部集合。
pub fn parse_targets(filter: Option<&str>) -> Result<Vec<SearchTarget>, HostelError> {
    let Some(filter) = filter.map(str::trim).filter(|filter| !filter.is_empty()) else {
        return Ok(SearchTarget::ALL.to_vec());
    };
    let mut targets = Vec::new();
    for part in filter.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let target = SearchTarget::parse(part)
            .ok_or_else(|| HostelError::invalid(format!("filter: {part}")))?;
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    Ok(targets)
}

/// 检索服务。
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 在允许的集合中检索，结果按集合顺序拼接。
    pub async fn search(
        &self,
        identity: &Identity,
        query: &str,
        filter: Option<&str>,
    ) -> Result<Vec<SearchHit>, HostelError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(HostelError::invalid("query"));
        }
        let predicate = scope_for(identity)?;
        let allowed: Vec<SearchTarget> = parse_targets(filter)?
            .into_iter()
            .filter(|target| can(identity.role, Action::Read, Resource::Search(*target)))
            .collect();
        if allowed.is_empty() {
            return Err(HostelError::forbidden(format!(
                "{} cannot search the requested collections",
                identity.role.label()
            )));
        }

        let needle = query.to_lowercase();
        let wants = |target: SearchTarget| allowed.contains(&target);
        let (students, supervisors, hostel_wardens, floor_wardens, floor_attendants, issues) = tokio::join!(
            self.people(SearchTarget::Students, &needle, &predicate, wants(SearchTarget::Students)),
            self.people(SearchTarget::Supervisors, &needle, &predicate, wants(SearchTarget::Supervisors)),
            self.people(SearchTarget::HostelWardens, &needle, &predicate, wants(SearchTarget::HostelWardens)),
            self.people(SearchTarget::FloorWardens, &needle, &predicate, wants(SearchTarget::FloorWardens)),
            self.people(SearchTarget::FloorAttendants, &needle, &predicate, wants(SearchTarget::FloorAttendants)),
            self.issues(query, identity.role, &predicate, wants(SearchTarget::Issues)),
        );

        let mut hits = Vec::new();
        for batch in [students, supervisors, hostel_wardens, floor_wardens, floor_attendants, issues] {
            hits.extend(batch?);
        }
        record_search();
        tracing::info!(
            target: "hostel.search",
            role = %identity.role,
            collections = allowed.len(),
            hits = hits.len(),
            "search served"
        );
        Ok(hits)
    }

    async fn people(
        &self,
        target: SearchTarget,
        needle: &str,
        predicate: &ScopePredicate,
        wanted: bool,
    ) -> Result<Vec<SearchHit>, StorageError> {
        let Some(role) = target.role().filter(|_| wanted) else {
            return Ok(Vec::new());
        };
        let by_name = Query::all().order_by("name", Direction::Asc);
        let (docs, hostel_floors) = tokio::join!(
            self.store.query(role.profile_collection(), &by_name),
            async {
                if role == Role::Student {
                    Ok(BTreeSet::new())
                } else {
                    scope_floor_ids(self.store.as_ref(), predicate).await
                }
            }
        );
        let hostel_floors = hostel_floors?;
        let mut hits = Vec::new();
        for doc in docs?.into_iter().filter(|doc| person_matches(&doc.data, needle)) {
            let person = normalize_person(&doc.id, role, &doc.data);
            let admitted = if role == Role::Student {
                predicate.admits(&person)
            } else {
                predicate.admits_staff(&person, &hostel_floors)
            };
            if !admitted {
                continue;
            }
            let Ok(Value::Object(data)) = serde_json::to_value(&person) else {
                continue;
            };
            hits.push(SearchHit {
                target,
                id: doc.id,
                data,
            });
        }
        Ok(hits)
    }

    /// `message` 前缀范围查询，结果按作用域过滤；楼层保洁员只看维修工单。
    async fn issues(
        &self,
        query: &str,
        role: Role,
        predicate: &ScopePredicate,
        wanted: bool,
    ) -> Result<Vec<SearchHit>, StorageError> {
        if !wanted {
            return Ok(Vec::new());
        }
        let range = Query::all()
            .filter("message", FilterOp::Gte, query)
            .filter("message", FilterOp::Lte, prefix_upper_bound(query))
            .order_by("message", Direction::Asc);
        let (rows, students) = tokio::join!(
            self.store.query(ISSUES, &range),
            scoped_students(self.store.as_ref(), predicate),
        );
        let rows = rows?;
        let students = students?;
        let parents: HashMap<&str, ParentContext> = students
            .iter()
            .map(|doc| (doc.id.as_str(), ParentContext::from_student(&doc.id, &doc.data)))
            .collect();

        let now = now_ms();
        let mut hits = Vec::new();
        for row in rows {
            let student_id =
                first_text(&row.data, &["studentId", "userId", "authorId"]).unwrap_or_default();
            let parent = parents
                .get(student_id.as_str())
                .cloned()
                .unwrap_or_else(|| ParentContext::detached(&student_id));
            let issue = normalize_issue(&row.data, SourceKind::Standalone, &parent, now);
            if !predicate.admits_issue(&issue)
                || (role == Role::FloorAttendant && issue.issue_type != IssueType::Maintenance)
            {
                continue;
            }
            let Ok(Value::Object(mut data)) = serde_json::to_value(&issue) else {
                continue;
            };
            if let Some(kind) = data.remove("type") {
                data.insert("issueType".to_string(), kind);
            }
            hits.push(SearchHit {
                target: SearchTarget::Issues,
                id: issue.id,
                data,
            });
        }
        Ok(hits)
    }
}
