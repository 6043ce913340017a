// catalog-search/src/pagination.rs
//! 游标分页
//!
//! 游标是结果在完整结果集中的绝对偏移量（十进制字符串）。
//! 偏移量游标在并发写入时不稳定：两次请求之间插入或删除文档会导致条目移位。

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

impl<T> Connection<T> {
    /// 将一页结果包装为连接
    ///
    /// `items` 为从 `skip` 开始取回的结果，最多 `take` 条；负数按 0 处理。
    pub fn paginate(total_count: i64, skip: i64, take: i64, items: Vec<T>) -> Self {
        let total_count = total_count.max(0);
        let skip = skip.max(0);
        let take = take.max(0);

        let edges = items
            .into_iter()
            .enumerate()
            .map(|(i, node)| Edge {
                cursor: encode_cursor(skip.saturating_add(i as i64)),
                node,
            })
            .collect();

        let window_end = total_count.min(skip.saturating_add(take));
        let (start_cursor, end_cursor) = if window_end > skip {
            (Some(encode_cursor(skip)), Some(encode_cursor(window_end - 1)))
        } else {
            (None, None)
        };

        Self {
            edges,
            page_info: PageInfo {
                has_next_page: total_count > skip.saturating_add(take),
                has_previous_page: skip > 0,
                start_cursor,
                end_cursor,
            },
            total_count,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge {
                    cursor: edge.cursor,
                    node: f(edge.node),
                })
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }
}

pub fn encode_cursor(offset: i64) -> String {
    offset.to_string()
}

/// `after` 游标转换为下一页的起始偏移量
///
/// 缺失、非数字或负数游标返回 0；数字游标 `n` 返回 `n + 1`。
pub fn after_to_skip(after: Option<&str>) -> i64 {
    after
        .and_then(|cursor| cursor.trim().parse::<i64>().ok())
        .filter(|offset| *offset >= 0)
        .map(|offset| offset.saturating_add(1))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_last_partial_page() {
        let connection = Connection::paginate(25, 20, 10, vec!['a', 'b', 'c', 'd', 'e']);

        assert!(!connection.page_info.has_next_page);
        assert!(connection.page_info.has_previous_page);
        assert_eq!(connection.page_info.start_cursor.as_deref(), Some("20"));
        assert_eq!(connection.page_info.end_cursor.as_deref(), Some("24"));
        assert_eq!(connection.edges[4].cursor, "24");
        assert_eq!(connection.total_count, 25);
    }

    #[test]
    fn test_first_page() {
        let connection = Connection::paginate(25, 0, 10, (0..10).collect());

        assert!(connection.page_info.has_next_page);
        assert!(!connection.page_info.has_previous_page);
        assert_eq!(connection.page_info.end_cursor.as_deref(), Some("9"));
        assert_eq!(connection.edges[0].cursor, "0");
    }

    #[rstest]
    #[case(0, 0, 10)]
    #[case(5, 10, 10)]
    #[case(5, 0, 0)]
    fn test_empty_window_has_no_cursors(#[case] total: i64, #[case] skip: i64, #[case] take: i64) {
        let connection = Connection::<u8>::paginate(total, skip, take, Vec::new());
        assert_eq!(connection.page_info.start_cursor, None);
        assert_eq!(connection.page_info.end_cursor, None);
        assert!(connection.edges.is_empty());
    }

    #[test]
    fn test_page_info_properties() {
        for total in 0..12 {
            for skip in 0..12 {
                for take in 0..6 {
                    let available = (total - skip).clamp(0, take);
                    let items: Vec<i64> = (skip..skip + available).collect();
                    let info = Connection::paginate(total, skip, take, items).page_info;

                    assert_eq!(info.has_previous_page, skip > 0);
                    assert_eq!(info.has_next_page, total > skip + take);
                    if let Some(end) = info.end_cursor {
                        let end: i64 = end.parse().unwrap();
                        assert!(end < total);
                        assert!(end >= skip);
                    }
                }
            }
        }
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some(""), 0)]
    #[case(Some("abc"), 0)]
    #[case(Some("-3"), 0)]
    #[case(Some("0"), 1)]
    #[case(Some("24"), 25)]
    fn test_after_to_skip(#[case] after: Option<&str>, #[case] expected: i64) {
        assert_eq!(after_to_skip(after), expected);
    }

    #[test]
    fn test_walk_pages_with_end_cursor() {
        let all: Vec<i64> = (0..23).collect();
        let take = 5;
        let mut after: Option<String> = None;
        let mut seen = Vec::new();

        loop {
            let skip = after_to_skip(after.as_deref());
            let items: Vec<i64> = all.iter().copied().skip(skip as usize).take(take).collect();
            let connection = Connection::paginate(all.len() as i64, skip, take as i64, items);
            seen.extend(connection.nodes().copied());
            if !connection.page_info.has_next_page {
                break;
            }
            after = connection.page_info.end_cursor;
        }

        assert_eq!(seen, all);
    }

    #[test]
    fn test_cursor_at_offset_limit_saturates() {
        let connection = Connection::paginate(i64::MAX, i64::MAX - 1, 5, vec!["a", "b", "c"]);
        let cursors: Vec<_> = connection.edges.iter().map(|e| e.cursor.as_str()).collect();
        let max = i64::MAX.to_string();
        assert_eq!(cursors, vec![(i64::MAX - 1).to_string().as_str(), max.as_str(), max.as_str()]);
        assert!(!connection.page_info.has_next_page);
    }

    #[test]
    fn test_map_keeps_cursors() {
        let connection = Connection::paginate(3, 1, 2, vec![1, 2]).map(|n| n * 10);
        assert_eq!(connection.edges[1].cursor, "2");
        assert_eq!(connection.edges[1].node, 20);
    }
}
