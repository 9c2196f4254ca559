pub mod collections;
pub mod error;
pub mod issue;
pub mod person;
pub mod policy;

pub use error::HostelError;
pub use issue::{Issue, IssueStatus, IssueType, Provenance, SourcedIssue};
pub use person::Person;
pub use policy::{Action, Resource, SearchTarget, can};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 系统角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ChiefWarden,
    Supervisor,
    HostelWarden,
    FloorWarden,
    FloorAttendant,
    Student,
}

impl Role {
    /// 所有员工角色（不含 chief warden 与学生）。
    pub const STAFF: [Role; 4] = [
        Role::Supervisor,
        Role::HostelWarden,
        Role::FloorWarden,
        Role::FloorAttendant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ChiefWarden => "chief_warden",
            Role::Supervisor => "supervisor",
            Role::HostelWarden => "hostel_warden",
            Role::FloorWarden => "floor_warden",
            Role::FloorAttendant => "floor_attendant",
            Role::Student => "student",
        }
    }

    /// 解析角色 claim，容忍大小写、连字符与空格写法（如 `Floor-Warden`）。
    pub fn parse(value: &str) -> Option<Role> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "chief_warden" => Some(Role::ChiefWarden),
            "supervisor" => Some(Role::Supervisor),
            "hostel_warden" => Some(Role::HostelWarden),
            "floor_warden" => Some(Role::FloorWarden),
            "floor_attendant" => Some(Role::FloorAttendant),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// 角色档案所在的集合。
    pub fn profile_collection(&self) -> &'static str {
        match self {
            Role::ChiefWarden => collections::CHIEF_WARDENS,
            Role::Supervisor => collections::SUPERVISORS,
            Role::HostelWarden => collections::HOSTEL_WARDENS,
            Role::FloorWarden => collections::FLOOR_WARDENS,
            Role::FloorAttendant => collections::FLOOR_ATTENDANTS,
            Role::Student => collections::STUDENTS,
        }
    }

    /// 面向用户的角色名称。
    pub fn label(&self) -> &'static str {
        match self {
            Role::ChiefWarden => "Chief Warden",
            Role::Supervisor => "Supervisor",
            Role::HostelWarden => "Hostel Warden",
            Role::FloorWarden => "Floor Warden",
            Role::FloorAttendant => "Floor Attendant",
            Role::Student => "Student",
        }
    }

    pub fn is_staff(&self) -> bool {
        Self::STAFF.contains(self)
    }

    /// 作用域按楼宇（hostel）划分的角色。
    pub fn is_hostel_scoped(&self) -> bool {
        matches!(self, Role::Supervisor | Role::HostelWarden)
    }

    /// 作用域按楼层集合划分的角色。
    pub fn is_floor_scoped(&self) -> bool {
        matches!(self, Role::FloorWarden | Role::FloorAttendant)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 角色相关的访问范围属性。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub assigned_hostel_id: Option<String>,
    pub assigned_floor_ids: BTreeSet<String>,
}

impl Scope {
    pub fn hostel(hostel_id: impl Into<String>) -> Self {
        Self {
            assigned_hostel_id: Some(hostel_id.into()),
            assigned_floor_ids: BTreeSet::new(),
        }
    }

    pub fn floors<I, S>(floor_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assigned_hostel_id: None,
            assigned_floor_ids: floor_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_hostel_id.is_none() && self.assigned_floor_ids.is_empty()
    }
}

/// 请求级身份：每个请求解析一次，不落库。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub scope: Scope,
}

impl Identity {
    /// 构造不带作用域属性的身份。
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: display_name.into(),
            role,
            scope: Scope::default(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}
