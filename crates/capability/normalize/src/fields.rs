//! JSON 字段读取辅助：按候选字段列表取第一个非空值。

use serde_json::{Map, Value};

/// 把字符串或数字读成非空文本。
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// 依次读取候选字段，返回第一个非空文本。
pub fn first_text(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| data.get(*key).and_then(text))
}

/// 读取嵌套对象 `parent.<keys>` 中的第一个非空文本。
pub fn nested_text(data: &Map<String, Value>, parent: &str, keys: &[&str]) -> Option<String> {
    data.get(parent)
        .and_then(Value::as_object)
        .and_then(|nested| first_text(nested, keys))
}

/// 布尔标志；兼容字符串 `"true"`。
pub fn flag(data: &Map<String, Value>, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(value)) => value.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// 读取字符串数组；单个字符串视为单元素数组。
pub fn text_list(data: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    for key in keys {
        match data.get(*key) {
            Some(Value::Array(items)) => {
                let values: Vec<String> = items.iter().filter_map(text).collect();
                if !values.is_empty() {
                    return values;
                }
            }
            Some(other) => {
                if let Some(value) = text(other) {
                    return vec![value];
                }
            }
            None => {}
        }
    }
    Vec::new()
}
