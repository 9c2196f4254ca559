//! 仪表盘返回结构，按角色区分形态。

use crate::directory::{FloorRecord, HostelRecord, RoomRecord};
use domain::{Issue, Person};
use serde::Serialize;

/// 仪表盘统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub students: u64,
    pub total_issues: usize,
    pub pending_issues: usize,
    pub solved_issues: usize,
}

impl DashboardStats {
    pub fn from_issues(students: u64, issues: &[Issue]) -> Self {
        let solved_issues = issues.iter().filter(|issue| issue.solved).count();
        Self {
            students,
            total_issues: issues.len(),
            pending_issues: issues.len() - solved_issues,
            solved_issues,
        }
    }
}

/// 员工花名册。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRoster {
    pub supervisors: Vec<Person>,
    pub hostel_wardens: Vec<Person>,
    pub floor_wardens: Vec<Person>,
    pub floor_attendants: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiefWardenDashboard {
    pub profile: Option<Person>,
    pub hostels: Vec<HostelRecord>,
    pub staff: StaffRoster,
    pub students: Vec<Person>,
    pub issues: Vec<Issue>,
    pub stats: DashboardStats,
    /// 降级（查询失败被跳过）的数据源。
    pub degraded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelDashboard {
    pub profile: Person,
    pub hostel: Option<HostelRecord>,
    pub floors: Vec<FloorRecord>,
    pub staff: StaffRoster,
    pub students: Vec<Person>,
    pub issues: Vec<Issue>,
    pub stats: DashboardStats,
    pub degraded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDashboard {
    pub profile: Person,
    pub floors: Vec<FloorRecord>,
    pub rooms: Vec<RoomRecord>,
    pub floor_attendants: Vec<Person>,
    pub students: Vec<Person>,
    pub issues: Vec<Issue>,
    pub stats: DashboardStats,
    pub degraded: Vec<String>,
}

/// 学生仪表盘；尚无学生文档时 `profile` 为空、工单列表为空。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub profile: Option<Person>,
    pub issues: Vec<Issue>,
    pub stats: DashboardStats,
    pub degraded: Vec<String>,
}

/// 按角色区分的仪表盘。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardPayload {
    ChiefWarden(ChiefWardenDashboard),
    Supervisor(HostelDashboard),
    HostelWarden(HostelDashboard),
    FloorWarden(FloorDashboard),
    FloorAttendant(FloorDashboard),
    Student(StudentDashboard),
}

impl DashboardPayload {
    pub fn issues(&self) -> &[Issue] {
        match self {
            DashboardPayload::ChiefWarden(board) => &board.issues,
            DashboardPayload::Supervisor(board) | DashboardPayload::HostelWarden(board) => {
                &board.issues
            }
            DashboardPayload::FloorWarden(board) | DashboardPayload::FloorAttendant(board) => {
                &board.issues
            }
            DashboardPayload::Student(board) => &board.issues,
        }
    }

    pub fn stats(&self) -> DashboardStats {
        match self {
            DashboardPayload::ChiefWarden(board) => board.stats,
            DashboardPayload::Supervisor(board) | DashboardPayload::HostelWarden(board) => {
                board.stats
            }
            DashboardPayload::FloorWarden(board) | DashboardPayload::FloorAttendant(board) => {
                board.stats
            }
            DashboardPayload::Student(board) => board.stats,
        }
    }
}
