//! 角色作用域解析。
//!
//! [`scope_for`] 把身份映射为 [`ScopePredicate`]，决定一个身份能看到哪些学生、员工、
//! 工单与房间。楼层角色没有分配楼层、楼宇角色没有分配楼宇时直接返回
//! `Forbidden`，调用方由此区分“无权限”与“无数据”。
//!
//! [`scoped_students`] 把谓词翻译为存储查询，楼层字段的各种写法分别查询后按 ID 合并；
//! [`find_profile`] 按 ID、再按邮箱定位档案文档。

mod lookup;

pub use lookup::{find_profile, scope_floor_ids, scoped_students};

use domain::{HostelError, Identity, Issue, Person, Role};
use std::collections::BTreeSet;

/// 可见范围谓词。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePredicate {
    /// 全部楼宇与楼层。
    All,
    /// 单个楼宇。
    Hostel(String),
    /// 楼层集合（非空）。
    Floors(BTreeSet<String>),
    /// 仅本人。
    SelfOnly(String),
}

/// 计算身份的可见范围。
pub fn scope_for(identity: &Identity) -> Result<ScopePredicate, HostelError> {
    match identity.role {
        Role::ChiefWarden => Ok(ScopePredicate::All),
        Role::Supervisor | Role::HostelWarden => identity
            .scope
            .assigned_hostel_id
            .as_deref()
            .map(str::trim)
            .filter(|hostel| !hostel.is_empty())
            .map(|hostel| ScopePredicate::Hostel(hostel.to_string()))
            .ok_or_else(|| HostelError::forbidden("no hostel assigned")),
        Role::FloorWarden | Role::FloorAttendant => {
            let floors: BTreeSet<String> = identity
                .scope
                .assigned_floor_ids
                .iter()
                .map(|floor| floor.trim().to_string())
                .filter(|floor| !floor.is_empty())
                .collect();
            if floors.is_empty() {
                return Err(HostelError::forbidden("no floors assigned"));
            }
            Ok(ScopePredicate::Floors(floors))
        }
        Role::Student => Ok(ScopePredicate::SelfOnly(identity.id.clone())),
    }
}

impl ScopePredicate {
    /// 人员是否在范围内。
    pub fn admits(&self, person: &Person) -> bool {
        match self {
            ScopePredicate::All => true,
            ScopePredicate::Hostel(hostel) => person.hostel_id.as_deref() == Some(hostel.as_str()),
            ScopePredicate::Floors(floors) => {
                person
                    .floor_id
                    .as_ref()
                    .is_some_and(|floor| floors.contains(floor))
                    || person
                        .assigned_floors
                        .iter()
                        .any(|floor| floors.contains(floor))
            }
            ScopePredicate::SelfOnly(id) => &person.id == id,
        }
    }

    /// 员工是否在范围内；楼宇范围同时接受分配到该楼宇任一楼层的员工，
    /// `hostel_floors` 为该楼宇的楼层 ID（见 [`scope_floor_ids`]）。学生不可见员工。
    pub fn admits_staff(&self, person: &Person, hostel_floors: &BTreeSet<String>) -> bool {
        match self {
            ScopePredicate::Hostel(hostel) => {
                person.hostel_id.as_deref() == Some(hostel.as_str())
                    || person
                        .assigned_floors
                        .iter()
                        .any(|floor| hostel_floors.contains(floor))
            }
            ScopePredicate::SelfOnly(_) => false,
            other => other.admits(person),
        }
    }

    /// 工单是否在范围内（按解析后的楼宇/楼层或学生 ID）。
    pub fn admits_issue(&self, issue: &Issue) -> bool {
        match self {
            ScopePredicate::All => true,
            ScopePredicate::Hostel(hostel) => issue.hostel.as_deref() == Some(hostel.as_str()),
            ScopePredicate::Floors(floors) => issue
                .floor
                .as_ref()
                .is_some_and(|floor| floors.contains(floor)),
            ScopePredicate::SelfOnly(id) => &issue.student_id == id,
        }
    }

    /// 房间是否在范围内；学生不可见任何房间。
    pub fn admits_location(&self, hostel_id: Option<&str>, floor_id: Option<&str>) -> bool {
        match self {
            ScopePredicate::All => true,
            ScopePredicate::Hostel(hostel) => hostel_id == Some(hostel.as_str()),
            ScopePredicate::Floors(floors) => floor_id.is_some_and(|floor| floors.contains(floor)),
            ScopePredicate::SelfOnly(_) => false,
        }
    }

    pub fn hostel_id(&self) -> Option<&str> {
        match self {
            ScopePredicate::Hostel(hostel) => Some(hostel),
            _ => None,
        }
    }

    pub fn floor_ids(&self) -> Option<&BTreeSet<String>> {
        match self {
            ScopePredicate::Floors(floors) => Some(floors),
            _ => None,
        }
    }
}
