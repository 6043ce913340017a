// catalog-search/src/schema/fields.rs
//! 字段名常量与索引字段组
//!
//! 索引文档按字段组存放：`__object` 为对象主体，`__prices` 为价格列表，
//! `__variations` 为变体 ID 列表。查询的 include 字段以 `组.路径` 形式表示。

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

// ============== 字段组 ==============

/// 对象主体
pub const GROUP_OBJECT: &str = "__object";

/// 价格列表
pub const GROUP_PRICES: &str = "__prices";

/// 变体 ID 列表
pub const GROUP_VARIATIONS: &str = "__variations";

// ============== 系统字段 ==============

/// 文档 ID（精确匹配，存储）
pub const FIELD_DOC_ID: &str = "__id";

/// 文档类型 + ID 组合键（用于覆盖写入）
pub const FIELD_KEY: &str = "__key";

/// 文档类型（Product / Category）
pub const FIELD_TYPE: &str = "__type";

/// 分类路径（多值，每个路径的所有前缀都会被索引）
pub const FIELD_OUTLINE: &str = query::OUTLINE_FIELD;

/// 全文检索字段（中文分词）
pub const FIELD_CONTENT: &str = "__content";

/// 原始文档 JSON（仅存储，用于投影）
pub const FIELD_SOURCE: &str = "__source";

/// 对象 ID 字段路径
pub const OBJECT_ID_PATH: &str = "id";

/// 索引文档中的字段组（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldGroup {
    #[serde(rename = "__object")]
    Object,
    #[serde(rename = "__prices")]
    Prices,
    #[serde(rename = "__variations")]
    Variations,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 3] = [FieldGroup::Object, FieldGroup::Prices, FieldGroup::Variations];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::Object => GROUP_OBJECT,
            FieldGroup::Prices => GROUP_PRICES,
            FieldGroup::Variations => GROUP_VARIATIONS,
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 需要从索引取回的字段
///
/// `path` 为空表示取回整个字段组。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexField {
    pub group: FieldGroup,
    pub path: Option<String>,
}

impl IndexField {
    pub fn new(group: FieldGroup, path: impl Into<String>) -> Self {
        Self {
            group,
            path: Some(path.into()),
        }
    }

    /// 整个字段组
    pub fn whole(group: FieldGroup) -> Self {
        Self { group, path: None }
    }

    pub fn object(path: impl Into<String>) -> Self {
        Self::new(FieldGroup::Object, path)
    }

    pub fn prices(path: impl Into<String>) -> Self {
        Self::new(FieldGroup::Prices, path)
    }

    /// `__object.id`，所有查询都会取回
    pub fn object_id() -> Self {
        Self::object(OBJECT_ID_PATH)
    }

    /// 字段组内路径分段
    pub fn segments(&self) -> Vec<&str> {
        self.path
            .as_deref()
            .map(|p| p.split('.').collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for IndexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}.{}", self.group, path),
            None => write!(f, "{}", self.group),
        }
    }
}

impl Serialize for IndexField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 静态规则表中的字段引用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    pub group: FieldGroup,
    pub path: Option<&'static str>,
}

impl FieldRef {
    pub const fn object(path: &'static str) -> Self {
        Self {
            group: FieldGroup::Object,
            path: Some(path),
        }
    }

    pub const fn whole(group: FieldGroup) -> Self {
        Self { group, path: None }
    }

    pub fn to_index_field(self) -> IndexField {
        IndexField {
            group: self.group,
            path: self.path.map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_field_display() {
        assert_eq!(IndexField::object("name").to_string(), "__object.name");
        assert_eq!(IndexField::prices("list").to_string(), "__prices.list");
        assert_eq!(IndexField::whole(FieldGroup::Variations).to_string(), "__variations");
    }

    #[test]
    fn test_index_field_serializes_as_string() {
        let json = serde_json::to_string(&IndexField::object_id()).unwrap();
        assert_eq!(json, "\"__object.id\"");
    }

    #[test]
    fn test_whole_group_sorts_first() {
        let mut fields = vec![IndexField::prices("list"), IndexField::whole(FieldGroup::Prices)];
        fields.sort();
        assert_eq!(fields[0], IndexField::whole(FieldGroup::Prices));
    }
}
