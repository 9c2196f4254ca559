//! 工单聚合：展开、合并去重、作用域过滤与排序。

use domain::collections::ISSUES;
use domain::{Issue, IssueType, Provenance, Role, SourcedIssue};
use hostel_normalize::fields::first_text;
use hostel_normalize::{ParentContext, SourceKind, embedded_issues, normalize_issue};
use hostel_scope::ScopePredicate;
use hostel_storage::{Document, DocumentStore, Query, StorageError};
use std::collections::HashMap;

/// 独立集合行中关联学生的字段。
const ROW_STUDENT_FIELDS: [&str; 3] = ["studentId", "userId", "authorId"];

/// 把学生文档与独立集合行汇总为规范工单列表。
///
/// 同一 ID 同时出现在内嵌数组与独立集合时，保留内嵌版本。
pub fn collect_issues(students: &[Document], standalone: &[Document], now_ms: i64) -> Vec<Issue> {
    let parents: HashMap<&str, &Document> =
        students.iter().map(|doc| (doc.id.as_str(), doc)).collect();
    gather(students, standalone, now_ms, |student_id| {
        parents.get(student_id).copied()
    })
}

/// 单个学生的工单；独立集合行关联到档案 ID 或任一别名（登录身份 ID）时都归属该学生。
pub fn collect_student_issues(
    student: &Document,
    aliases: &[&str],
    standalone: &[Document],
    now_ms: i64,
) -> Vec<Issue> {
    gather(std::slice::from_ref(student), standalone, now_ms, |student_id| {
        (student_id == student.id || aliases.contains(&student_id)).then_some(student)
    })
}

fn gather<'a>(
    students: &'a [Document],
    standalone: &[Document],
    now_ms: i64,
    parent_of: impl Fn(&str) -> Option<&'a Document>,
) -> Vec<Issue> {
    let mut sourced: Vec<SourcedIssue> = students
        .iter()
        .flat_map(|doc| embedded_issues(&doc.id, &doc.data, now_ms))
        .collect();
    for row in standalone {
        let student_id = first_text(&row.data, &ROW_STUDENT_FIELDS).unwrap_or_default();
        let parent = match parent_of(&student_id) {
            Some(doc) => ParentContext::from_student(&doc.id, &doc.data),
            None => ParentContext::detached(&student_id),
        };
        sourced.push(SourcedIssue {
            issue: normalize_issue(&row.data, SourceKind::Standalone, &parent, now_ms),
            provenance: Provenance::Standalone {
                row_id: row.id.clone(),
            },
        });
    }
    merge_issues(sourced)
}

/// 按 ID 去重，内嵌来源优先；其余保持首次出现的顺序。
pub fn merge_issues(sourced: Vec<SourcedIssue>) -> Vec<Issue> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<SourcedIssue> = Vec::with_capacity(sourced.len());
    for item in sourced {
        match index.get(&item.issue.id) {
            Some(&position) => {
                if !merged[position].provenance.is_embedded() && item.provenance.is_embedded() {
                    merged[position] = item;
                }
            }
            None => {
                index.insert(item.issue.id.clone(), merged.len());
                merged.push(item);
            }
        }
    }
    merged.into_iter().map(|item| item.issue).collect()
}

/// 稳定排序：时间倒序，时间相同保持原顺序。
pub fn sort_newest_first(issues: &mut [Issue]) {
    issues.sort_by(|left, right| right.timestamp_utc.cmp(&left.timestamp_utc));
}

/// 作用域过滤 + 角色过滤（楼层保洁员只看维修工单）+ 排序。
pub fn finalize(mut issues: Vec<Issue>, role: Role, predicate: &ScopePredicate) -> Vec<Issue> {
    issues.retain(|issue| predicate.admits_issue(issue));
    if role == Role::FloorAttendant {
        issues.retain(|issue| issue.issue_type == IssueType::Maintenance);
    }
    sort_newest_first(&mut issues);
    issues
}

/// 读取独立集合行。学生只读取与本人关联的行。
pub async fn standalone_rows(
    store: &dyn DocumentStore,
    predicate: &ScopePredicate,
) -> Result<Vec<Document>, StorageError> {
    match predicate {
        ScopePredicate::SelfOnly(student_id) => own_rows(store, &[student_id.as_str()]).await,
        _ => store.query(ISSUES, &Query::all()).await,
    }
}

/// 按 `userId` 或 `studentId` 关联到任一给定学生 ID 的独立集合行，按行 ID 去重。
pub async fn own_rows(
    store: &dyn DocumentStore,
    student_ids: &[&str],
) -> Result<Vec<Document>, StorageError> {
    let mut rows: Vec<Document> = Vec::new();
    for student_id in student_ids {
        let by_user = Query::all().eq("userId", *student_id);
        let by_student = Query::all().eq("studentId", *student_id);
        let (by_user, by_student) =
            tokio::join!(store.query(ISSUES, &by_user), store.query(ISSUES, &by_student));
        for row in by_user?.into_iter().chain(by_student?) {
            if !rows.iter().any(|existing| existing.id == row.id) {
                rows.push(row);
            }
        }
    }
    Ok(rows)
}
