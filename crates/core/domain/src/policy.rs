//! 角色策略：`can(role, action, resource)`。
//!
//! 只回答"该角色是否可以对这类资源执行该动作"；具体实例是否落在作用域内
//! 由 scope 能力模块判定。

use crate::Role;
use serde::{Deserialize, Serialize};

/// 动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
}

/// 可检索的集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    Students,
    Supervisors,
    HostelWardens,
    FloorWardens,
    FloorAttendants,
    Issues,
}

impl SearchTarget {
    pub const ALL: [SearchTarget; 6] = [
        SearchTarget::Students,
        SearchTarget::Supervisors,
        SearchTarget::HostelWardens,
        SearchTarget::FloorWardens,
        SearchTarget::FloorAttendants,
        SearchTarget::Issues,
    ];

    pub fn parse(value: &str) -> Option<SearchTarget> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "students" => Some(SearchTarget::Students),
            "supervisors" => Some(SearchTarget::Supervisors),
            "hostel_wardens" => Some(SearchTarget::HostelWardens),
            "floor_wardens" => Some(SearchTarget::FloorWardens),
            "floor_attendants" => Some(SearchTarget::FloorAttendants),
            "issues" => Some(SearchTarget::Issues),
            _ => None,
        }
    }

    /// 集合对应的人员角色；`Issues` 返回 None。
    pub fn role(&self) -> Option<Role> {
        match self {
            SearchTarget::Students => Some(Role::Student),
            SearchTarget::Supervisors => Some(Role::Supervisor),
            SearchTarget::HostelWardens => Some(Role::HostelWarden),
            SearchTarget::FloorWardens => Some(Role::FloorWarden),
            SearchTarget::FloorAttendants => Some(Role::FloorAttendant),
            SearchTarget::Issues => None,
        }
    }
}

/// 资源类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Dashboard,
    Issue,
    Student,
    Staff(Role),
    Room,
    RoomImage,
    Hostel,
    Metrics,
    Search(SearchTarget),
}

/// 判断角色能否对资源执行动作。
pub fn can(role: Role, action: Action, resource: Resource) -> bool {
    use Action::*;
    use Role::*;

    if role == ChiefWarden {
        return true;
    }
    match resource {
        Resource::Dashboard => action == Read,
        Resource::Issue => match action {
            Read | Update => true,
            Create => role == Student,
        },
        Resource::Student => match action {
            Read => role != Student,
            Create | Update => matches!(role, Supervisor | HostelWarden),
        },
        Resource::Staff(target) => match action {
            Read => match role {
                Supervisor => target != Supervisor && target.is_staff(),
                HostelWarden => target.is_floor_scoped(),
                FloorWarden => target == FloorAttendant,
                _ => false,
            },
            Create | Update => role.is_hostel_scoped() && target.is_floor_scoped(),
        },
        Resource::Room => match action {
            Read => role != Student,
            Create | Update => role.is_hostel_scoped(),
        },
        Resource::RoomImage => role != Student,
        Resource::Hostel => action == Read && role.is_hostel_scoped(),
        Resource::Metrics => false,
        Resource::Search(target) => match role {
            Supervisor => target != SearchTarget::Supervisors,
            HostelWarden => matches!(
                target,
                SearchTarget::Students
                    | SearchTarget::FloorWardens
                    | SearchTarget::FloorAttendants
                    | SearchTarget::Issues
            ),
            FloorWarden => matches!(
                target,
                SearchTarget::Students | SearchTarget::FloorAttendants | SearchTarget::Issues
            ),
            FloorAttendant => target == SearchTarget::Issues,
            _ => false,
        },
    }
}
