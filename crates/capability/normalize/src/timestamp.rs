//! 时间字段解析，统一输出 Unix 毫秒。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

// 小于该值的数字按秒处理（约为 1973 年的毫秒值）。
const SECONDS_THRESHOLD: i64 = 100_000_000_000;

/// 当前时间（Unix 毫秒）。
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 文档存储原生时间戳：`{_seconds, _nanoseconds}` 或 `{seconds, nanoseconds}`。
///
/// 换算溢出时返回 None。
pub fn native_timestamp(value: &Value) -> Option<i64> {
    let object = value.as_object()?;
    let seconds = object
        .get("_seconds")
        .or_else(|| object.get("seconds"))
        .and_then(Value::as_i64)?;
    let nanos = object
        .get("_nanoseconds")
        .or_else(|| object.get("nanoseconds"))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    seconds.checked_mul(1000)?.checked_add(nanos / 1_000_000)
}

/// 数字时间：秒或毫秒。
pub fn epoch_number(value: &Value) -> Option<i64> {
    let number = value
        .as_i64()
        .or_else(|| value.as_f64().map(|float| float as i64))?;
    scale_epoch(number)
}

/// 日期字符串：RFC 3339、`YYYY-MM-DD HH:MM:SS`、`YYYY-MM-DD` 或纯数字。
pub fn date_text(value: &Value) -> Option<i64> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.timestamp_millis());
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp_millis());
    }
    text.parse::<i64>().ok().and_then(scale_epoch)
}

/// 任意形态的时间值。
pub fn any_timestamp(value: &Value) -> Option<i64> {
    native_timestamp(value)
        .or_else(|| epoch_number(value))
        .or_else(|| date_text(value))
}

/// 超出 i64 毫秒范围的值视为无法解析。
fn scale_epoch(number: i64) -> Option<i64> {
    if number.unsigned_abs() < SECONDS_THRESHOLD.unsigned_abs() {
        number.checked_mul(1000)
    } else {
        Some(number)
    }
}
