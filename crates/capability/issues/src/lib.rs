//! 工单变更服务。
//!
//! - [`IssueService::submit_issue`]：学生提交工单，追加到本人文档的 `issues` 数组，
//!   并写入 `issue_index/{issueId}` 二级索引
//! - [`IssueService::set_solved`]：标记解决或重新打开。先查索引，索引缺失时在
//!   调用方作用域内的学生文档中扫描（命中即停），最后回退到独立集合
//!
//! 内嵌工单的状态写入是按原元素比较后的 `array_replace`，不会覆盖同一数组中
//! 其他元素的并发追加或修改；目标元素本身被并发修改时重新定位后重试。

mod locate;
mod solve;
mod submit;

pub use solve::SolveAck;
pub use submit::{HostelDetails, NewIssue};

use hostel_storage::DocumentStore;
use std::sync::Arc;

/// 工单变更服务。
pub struct IssueService {
    store: Arc<dyn DocumentStore>,
}

impl IssueService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}
