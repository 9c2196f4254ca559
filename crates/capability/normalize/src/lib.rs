//! 存储边界上的标准化。
//!
//! 学生与员工文档在历史演进中积累了多种字段写法（`floorId` / `floor` /
//! `hostelDetails.floor`、`solved` / `isSolved`、原生时间戳 / `date` 字符串）。
//! 本 crate 把它们一次性规整成 [`domain::Issue`] 与 [`domain::Person`]，
//! 上层业务只接触规范形态。
//!
//! - [`issue`]：工单标准化与学生文档内嵌工单展开
//! - [`person`]：人员档案标准化
//! - [`timestamp`]：时间字段解析
//!
//! 所有函数都是纯函数，不会因字段缺失或格式错误而失败。

pub mod fields;
pub mod issue;
pub mod person;
pub mod timestamp;

pub use issue::{ParentContext, SourceKind, embedded_issues, normalize_issue};
pub use person::normalize_person;
pub use timestamp::now_ms;
