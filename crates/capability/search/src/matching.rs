//! 人员文档的关键字匹配。

use hostel_normalize::fields::{first_text, nested_text};
use serde_json::{Map, Value};

/// 参与匹配的顶层字段。
const PERSON_FIELDS: [&str; 9] = [
    "name",
    "email",
    "phone",
    "registrationNumber",
    "course",
    "hostel",
    "hostelId",
    "room",
    "roomNumber",
];

/// 参与匹配的 `hostelDetails.*` 字段。
const DETAIL_FIELDS: [&str; 3] = ["hostel", "hostelId", "room"];

/// 不区分大小写的子串匹配；`needle` 须已转为小写。
pub fn person_matches(data: &Map<String, Value>, needle: &str) -> bool {
    let contains = |value: Option<String>| {
        value.is_some_and(|value| value.to_lowercase().contains(needle))
    };
    PERSON_FIELDS
        .iter()
        .any(|field| contains(first_text(data, &[*field])))
        || DETAIL_FIELDS
            .iter()
            .any(|field| contains(nested_text(data, "hostelDetails", &[*field])))
}

/// 前缀范围查询的上界：`query` 后接私用区高位字符。
pub fn prefix_upper_bound(query: &str) -> String {
    format!("{query}\u{f8ff}")
}
