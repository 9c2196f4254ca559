//! 文档集合名称。

pub const STUDENTS: &str = "students";
pub const CHIEF_WARDENS: &str = "chief_wardens";
pub const SUPERVISORS: &str = "supervisors";
pub const HOSTEL_WARDENS: &str = "hostel_wardens";
pub const FLOOR_WARDENS: &str = "floor_wardens";
pub const FLOOR_ATTENDANTS: &str = "floor_attendants";
pub const HOSTELS: &str = "hostels";
pub const FLOORS: &str = "floors";
pub const ROOMS: &str = "rooms";
/// 历史遗留的独立工单集合（行以 userId/studentId 关联学生）。
pub const ISSUES: &str = "issues";
/// issueId -> 所属学生文档 的二级索引。
pub const ISSUE_INDEX: &str = "issue_index";

/// 学生文档内嵌工单数组字段。
pub const FIELD_ISSUES: &str = "issues";
pub const FIELD_COMPLAINTS: &str = "complaints";
pub const FIELD_MAINTENANCE: &str = "maintenance";

/// 学生文档中所有可能承载工单的数组字段（按读取顺序）。
pub const EMBEDDED_ISSUE_FIELDS: [&str; 3] = [FIELD_ISSUES, FIELD_COMPLAINTS, FIELD_MAINTENANCE];
