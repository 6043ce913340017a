// catalog-search/src/field_path.rs
//! 输出字段路径工具
//!
//! 客户端请求的字段以点分路径表示，例如 `masterVariation.prices.list`。
//! 路径保留原始大小写，前缀/子串判断一律忽略大小写。

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 单个请求字段路径（不可变）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// 规范化并创建路径：去除空白和空段，空路径返回 `None`
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".");

        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        self.strip_prefix_ignore_case(prefix).is_some()
    }

    /// 忽略大小写剥离前缀，返回剩余部分
    pub fn strip_prefix_ignore_case(&self, prefix: &str) -> Option<&str> {
        let head = self.0.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            self.0.get(prefix.len()..)
        } else {
            None
        }
    }

    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 请求字段路径集合（有序、去重）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPathSet(BTreeSet<FieldPath>);

impl FieldPathSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: FieldPath) -> bool {
        self.0.insert(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        FieldPath::new(path).is_some_and(|p| self.0.contains(&p))
    }

    pub fn union(&self, other: &FieldPathSet) -> FieldPathSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// 取出某个子字段下的路径（去掉 `prefix.` 前缀），用于嵌套请求
    pub fn under(&self, prefix: &str) -> FieldPathSet {
        let prefix = format!("{}.", prefix.trim_end_matches('.'));
        self.0
            .iter()
            .filter_map(|p| p.strip_prefix_ignore_case(&prefix))
            .filter_map(FieldPath::new)
            .collect()
    }
}

impl FromIterator<FieldPath> for FieldPathSet {
    fn from_iter<T: IntoIterator<Item = FieldPath>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for FieldPathSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().filter_map(FieldPath::new).collect()
    }
}

impl<'a> IntoIterator for &'a FieldPathSet {
    type Item = &'a FieldPath;
    type IntoIter = std::collections::btree_set::Iter<'a, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 请求的字段选择树（GraphQL 选择集的简化表示）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Selection>,
}

impl Selection {
    /// 根节点（名称为空）
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with(mut self, child: Selection) -> Self {
        self.children.push(child);
        self
    }

    /// 由点分路径列表构建选择树
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut root = Self::root();
        for path in paths.into_iter().filter_map(FieldPath::new) {
            let mut node = &mut root;
            for segment in path.segments() {
                let index = match node.children.iter().position(|c| c.name == segment) {
                    Some(index) => index,
                    None => {
                        node.children.push(Selection::field(segment));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[index];
            }
        }
        root
    }

    /// 忽略大小写查找直接子字段
    pub fn child(&self, name: &str) -> Option<&Selection> {
        self.children
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// 所有叶子字段相对于当前节点的路径
    pub fn leaf_paths(&self) -> FieldPathSet {
        let mut paths = FieldPathSet::new();
        for child in &self.children {
            child.collect_leaf_paths("", &mut paths);
        }
        paths
    }

    fn collect_leaf_paths(&self, parent: &str, paths: &mut FieldPathSet) {
        let current = if parent.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", parent, self.name)
        };

        if self.children.is_empty() {
            if let Some(path) = FieldPath::new(&current) {
                paths.insert(path);
            }
            return;
        }

        for child in &self.children {
            child.collect_leaf_paths(&current, paths);
        }
    }
}
