use crate::Role;
use serde::{Deserialize, Serialize};

/// 规范化人员（学生或员工）。
///
/// 楼宇/楼层/房间已经按回退链解析完毕，业务层不再读取原始文档字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub role: Role,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
    pub course: Option<String>,
    pub hostel_id: Option<String>,
    pub hostel: Option<String>,
    pub floor_id: Option<String>,
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_hostel: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_floors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<String>,
}

impl Person {
    /// 仅带 id 与角色的空档案。
    pub fn empty(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            name: String::new(),
            email: None,
            phone: None,
            registration_number: None,
            course: None,
            hostel_id: None,
            hostel: None,
            floor_id: None,
            room: None,
            assigned_hostel: None,
            assigned_floors: Vec::new(),
            reports_to: None,
        }
    }
}
