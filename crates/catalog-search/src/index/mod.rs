// catalog-search/src/index/mod.rs
//! 索引适配器
//!
//! - [`TantivyCatalogIndex`]：基于 Tantivy 的持久化索引
//! - [`MemoryIndex`]：进程内索引

mod engine;
mod memory;

use std::cmp::Ordering;

use serde_json::Value;

use crate::builder::{SortClause, SortDirection};

pub use engine::{DEFAULT_WRITER_MEMORY, TantivyCatalogIndex};
pub use memory::MemoryIndex;

/// 标量值的文本形式；对象、数组和 null 没有文本形式
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 比较两个排序键：数字按数值、文本忽略大小写，缺失值排在最后
pub(crate) fn compare_sort_keys(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 按排序条件排序，条件都相等时按 ID 排序保证结果稳定
pub(crate) fn sort_documents<T>(
    items: &mut [T],
    sort: &[SortClause],
    key: impl Fn(&T, &str) -> Option<String>,
    id: impl Fn(&T) -> &str,
) {
    items.sort_by(|a, b| {
        for clause in sort {
            let ordering = compare_sort_keys(
                key(a, &clause.field).as_deref(),
                key(b, &clause.field).as_deref(),
            );
            let ordering = match clause.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        id(a).cmp(id(b))
    });
}
