//! 文档与查询模型
//!
//! 文档是 `id + JSON 对象`；查询由过滤条件、排序与数量限制组成。
//! 字段路径使用点号分隔（如 `hostelDetails.floor`）。

use serde_json::{Map, Value};
use std::cmp::Ordering;

/// 存储中的一条文档。
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// 按点号路径读取字段。
    pub fn field(&self, path: &str) -> Option<&Value> {
        value_at_path(&self.data, path)
    }

    /// 读取非空字符串字段。
    pub fn str_field(&self, path: &str) -> Option<&str> {
        self.field(path)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// 比较运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// 字段值属于给定数组。
    In,
    Gte,
    Lte,
}

/// 单个过滤条件。
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

/// 排序方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// 集合查询：`where(..).where(..).order_by(..).limit(n)`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    /// 全集合查询。
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    pub fn is_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.filter(field, FilterOp::In, Value::Array(values))
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// 判断文档数据是否满足全部过滤条件。
    pub fn matches(&self, data: &Map<String, Value>) -> bool {
        self.filters.iter().all(|filter| {
            let Some(actual) = value_at_path(data, &filter.field) else {
                return false;
            };
            match filter.op {
                FilterOp::Eq => actual == &filter.value,
                FilterOp::In => filter
                    .value
                    .as_array()
                    .map(|items| items.iter().any(|item| item == actual))
                    .unwrap_or(false),
                FilterOp::Gte => matches!(
                    compare_values(actual, &filter.value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                FilterOp::Lte => matches!(
                    compare_values(actual, &filter.value),
                    Some(Ordering::Less | Ordering::Equal)
                ),
            }
        })
    }
}

/// 按点号路径读取 JSON 字段。
pub fn value_at_path<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = data.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// 同类型值比较：字符串按字节序，数字按数值；类型不同不可比较。
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// 按排序字段比较两份文档，缺失字段排在最后。
pub fn compare_documents(left: &Document, right: &Document, order: &OrderBy) -> Ordering {
    let ordering = match (left.field(&order.field), right.field(&order.field)) {
        (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    match order.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
