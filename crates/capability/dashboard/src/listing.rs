//! 工单列表与公开公告板。

use crate::aggregate::{collect_issues, finalize, sort_newest_first, standalone_rows};
use crate::engine::{DashboardService, degrade};
use domain::collections::{ISSUES, STUDENTS};
use domain::{HostelError, Identity, Issue, IssueType, Role};
use hostel_normalize::now_ms;
use hostel_scope::{find_profile, scope_for, scoped_students};
use hostel_storage::Query;

/// 公告板最多展示的条目数。
pub const NOTICE_BOARD_LIMIT: usize = 50;

/// 按解决状态筛选。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Pending,
    Solved,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<StatusFilter> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "open" => Some(StatusFilter::Pending),
            "solved" | "resolved" => Some(StatusFilter::Solved),
            _ => None,
        }
    }

    fn accepts(&self, issue: &Issue) -> bool {
        match self {
            StatusFilter::Pending => !issue.solved,
            StatusFilter::Solved => issue.solved,
        }
    }
}

/// 工单列表筛选条件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueFilter {
    pub status: Option<StatusFilter>,
    pub issue_type: Option<IssueType>,
    pub limit: usize,
}

/// 工单列表；`count` 为截断前的匹配数。
#[derive(Debug, Clone, PartialEq)]
pub struct IssueList {
    pub issues: Vec<Issue>,
    pub count: usize,
}

impl DashboardService {
    /// 身份范围内的全部规范工单（时间倒序）。
    pub async fn scoped_issues(&self, identity: &Identity) -> Result<Vec<Issue>, HostelError> {
        let store = self.store.as_ref();
        let mut degraded = Vec::new();
        if identity.role == Role::Student {
            let email = Some(identity.email.as_str()).filter(|email| !email.is_empty());
            let Some(doc) = find_profile(store, STUDENTS, &identity.id, email).await? else {
                return Ok(Vec::new());
            };
            return Ok(self.own_issues(identity, &doc, &mut degraded).await);
        }

        let predicate = scope_for(identity)?;
        let (students, standalone) = tokio::join!(
            scoped_students(store, &predicate),
            standalone_rows(store, &predicate),
        );
        let students = students?;
        let standalone = degrade(standalone, ISSUES, &mut degraded);
        Ok(finalize(
            collect_issues(&students, &standalone, now_ms()),
            identity.role,
            &predicate,
        ))
    }

    /// 按状态/类型筛选并截断。
    pub async fn list_issues(
        &self,
        identity: &Identity,
        filter: IssueFilter,
    ) -> Result<IssueList, HostelError> {
        let mut issues: Vec<Issue> = self
            .scoped_issues(identity)
            .await?
            .into_iter()
            .filter(|issue| filter.status.is_none_or(|status| status.accepts(issue)))
            .filter(|issue| filter.issue_type.is_none_or(|kind| issue.issue_type == kind))
            .collect();
        let count = issues.len();
        issues.truncate(filter.limit);
        Ok(IssueList { issues, count })
    }

    /// 公开公告板：全部未解决的维修工单，时间倒序，最多 50 条。
    pub async fn notice_board(&self) -> Result<Vec<Issue>, HostelError> {
        let store = self.store.as_ref();
        let all = Query::all();
        let (students, standalone) = tokio::join!(
            store.query(STUDENTS, &all),
            store.query(ISSUES, &all),
        );
        let students = students?;
        let mut degraded = Vec::new();
        let standalone = degrade(standalone, ISSUES, &mut degraded);
        let mut issues: Vec<Issue> = collect_issues(&students, &standalone, now_ms())
            .into_iter()
            .filter(|issue| issue.issue_type == IssueType::Maintenance && !issue.solved)
            .collect();
        sort_newest_first(&mut issues);
        issues.truncate(NOTICE_BOARD_LIMIT);
        Ok(issues)
    }
}
