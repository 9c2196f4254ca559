//! 角色仪表盘聚合引擎。
//!
//! 给定已解析的身份，并行读取学生、员工、楼宇与历史独立工单集合，
//! 把内嵌数组（`issues`/`complaints`/`maintenance`）与独立集合行统一标准化，
//! 按 ID 去重（内嵌优先）、按作用域过滤、按时间倒序稳定排序，输出按角色区分的结构。
//!
//! - [`DashboardService`]：仪表盘、工单列表、公告板
//! - [`DirectoryService`]：学生/员工/楼宇/楼层/房间的范围内读取与员工创建
//! - [`aggregate`]：纯函数形式的合并、过滤与排序
//!
//! 错误策略：本人档案解析失败是致命错误；独立集合等次要数据源失败时
//! 记录告警与降级计数，并在返回结构的 `degraded` 字段中列出。

pub mod aggregate;
pub mod directory;
mod engine;
mod listing;
pub mod payload;

pub use directory::{DirectoryService, FloorRecord, HostelRecord, NewStaff, RoomRecord};
pub use engine::DashboardService;
pub use listing::{IssueFilter, IssueList, NOTICE_BOARD_LIMIT, StatusFilter};
pub use payload::{
    ChiefWardenDashboard, DashboardPayload, DashboardStats, FloorDashboard, HostelDashboard,
    StaffRoster, StudentDashboard,
};
