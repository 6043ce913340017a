// catalog-search/src/schema/document.rs
//! 文档结构定义
//!
//! - [`CatalogDocument`]：待写入索引的目录对象（商品或分类）
//! - [`Document`]：查询返回的文档，只包含 include 字段投影后的内容

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::*;

/// 索引中的文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Product,
    Category,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Product => "Product",
            DocumentType::Category => "Category",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 索引文档 - 待写入索引的目录对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub id: String,

    #[serde(rename = "type")]
    pub document_type: DocumentType,

    /// 分类路径，例如 `catalog-1/cat-phones/cat-android`
    #[serde(default)]
    pub outlines: Vec<String>,

    /// 对象主体
    #[serde(default)]
    pub object: Map<String, Value>,

    #[serde(default)]
    pub prices: Vec<Value>,

    /// 变体商品 ID
    #[serde(default)]
    pub variations: Vec<String>,
}

impl CatalogDocument {
    pub fn new(id: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            id: id.into(),
            document_type,
            outlines: Vec::new(),
            object: Map::new(),
            prices: Vec::new(),
            variations: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.object.insert(name.into(), value);
        self
    }

    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outlines.push(outline.into());
        self
    }

    pub fn with_price(mut self, price: Value) -> Self {
        self.prices.push(price);
        self
    }

    pub fn with_variation(mut self, id: impl Into<String>) -> Self {
        self.variations.push(id.into());
        self
    }

    /// 类型 + ID 组合键
    pub fn key(&self) -> String {
        format!("{}:{}", self.document_type, self.id)
    }

    /// 对象主体，始终包含 `id`
    pub fn object_with_id(&self) -> Map<String, Value> {
        let mut object = self.object.clone();
        object.insert(OBJECT_ID_PATH.to_string(), Value::String(self.id.clone()));
        object
    }

    /// 按字段组组织的完整文档
    pub fn source(&self) -> Map<String, Value> {
        let mut source = Map::new();
        source.insert(GROUP_OBJECT.to_string(), Value::Object(self.object_with_id()));
        source.insert(GROUP_PRICES.to_string(), Value::Array(self.prices.clone()));
        source.insert(
            GROUP_VARIATIONS.to_string(),
            Value::Array(self.variations.iter().cloned().map(Value::String).collect()),
        );
        source
    }

    /// 分类路径的所有前缀，`a/b/c` 展开为 `a`、`a/b`、`a/b/c`
    pub fn outline_terms(&self) -> Vec<String> {
        let mut terms = BTreeSet::new();
        for outline in &self.outlines {
            let mut prefix = String::new();
            for segment in outline.split('/').filter(|s| !s.is_empty()) {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(segment);
                terms.insert(prefix.clone());
            }
        }
        terms.into_iter().collect()
    }

    /// 对象主体中所有文本值（用于全文检索）
    pub fn content(&self) -> String {
        let mut parts = Vec::new();
        for value in self.object.values() {
            collect_text(value, &mut parts);
        }
        parts.join(" ")
    }
}

fn collect_text<'a>(value: &'a Value, parts: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => parts.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, parts)),
        Value::Object(map) => map.values().for_each(|v| collect_text(v, parts)),
        _ => {}
    }
}

/// 查询返回的文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// 按字段组组织的投影结果
    pub source: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, source: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }

    pub fn group(&self, group: FieldGroup) -> Option<&Value> {
        self.source.get(group.as_str())
    }

    pub fn object(&self) -> Option<&Map<String, Value>> {
        self.group(FieldGroup::Object).and_then(Value::as_object)
    }

    /// 对象主体中的字段（点分路径，忽略大小写）
    pub fn get(&self, path: &str) -> Option<&Value> {
        let object = self.group(FieldGroup::Object)?;
        let segments: Vec<&str> = path.split('.').collect();
        values_at_path(object, &segments).into_iter().next()
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn category_id(&self) -> Option<&str> {
        self.get_str("categoryId").filter(|id| !id.is_empty())
    }

    pub fn variation_ids(&self) -> Vec<String> {
        self.group(FieldGroup::Variations)
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn prices(&self) -> &[Value] {
        self.group(FieldGroup::Prices)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// 按 ID 建立索引，结果顺序与请求顺序无关时使用
pub fn index_by_id(documents: &[Document]) -> HashMap<&str, &Document> {
    documents.iter().map(|d| (d.id.as_str(), d)).collect()
}

/// 沿路径取值，遇到数组时展开所有元素
pub fn values_at_path<'a>(value: &'a Value, segments: &[&str]) -> Vec<&'a Value> {
    let Some((head, rest)) = segments.split_first() else {
        return match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
    };

    match value {
        Value::Object(map) => match lookup(map, head) {
            Some(child) => values_at_path(child, rest),
            None => Vec::new(),
        },
        Value::Array(items) => items
            .iter()
            .flat_map(|item| values_at_path(item, segments))
            .collect(),
        _ => Vec::new(),
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn lookup_key<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a String> {
    map.get_key_value(key).map(|(k, _)| k).or_else(|| {
        map.keys().find(|k| k.eq_ignore_ascii_case(key))
    })
}

/// 按 include 字段投影文档
///
/// 只保留 include 字段覆盖的内容；数组中的每个元素分别投影。
pub fn project(source: &Map<String, Value>, includes: &BTreeSet<IndexField>) -> Map<String, Value> {
    let mut projected = Map::new();
    for field in includes {
        let Some(group_value) = source.get(field.group.as_str()) else {
            continue;
        };
        let target = projected
            .entry(field.group.as_str().to_string())
            .or_insert(Value::Null);
        copy_path(group_value, &field.segments(), target);
    }
    projected
}

fn copy_path(src: &Value, segments: &[&str], dst: &mut Value) {
    let Some((head, rest)) = segments.split_first() else {
        *dst = src.clone();
        return;
    };

    match src {
        Value::Object(map) => {
            let Some(key) = lookup_key(map, head) else {
                return;
            };
            if !dst.is_object() {
                *dst = Value::Object(Map::new());
            }
            if let Value::Object(dst_map) = dst {
                let child = dst_map.entry(key.clone()).or_insert(Value::Null);
                copy_path(&map[key.as_str()], rest, child);
            }
        }
        Value::Array(items) => {
            let needs_init = !matches!(dst, Value::Array(existing) if existing.len() == items.len());
            if needs_init {
                *dst = Value::Array(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::Object(_) => Value::Object(Map::new()),
                            _ => Value::Null,
                        })
                        .collect(),
                );
            }
            if let Value::Array(dst_items) = dst {
                for (item, target) in items.iter().zip(dst_items.iter_mut()) {
                    copy_path(item, segments, target);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phone() -> CatalogDocument {
        CatalogDocument::new("p1", DocumentType::Product)
            .with_field("name", json!("Phone"))
            .with_field("categoryId", json!("c1"))
            .with_field("images", json!([{ "url": "a.png", "sortOrder": 1 }]))
            .with_outline("catalog-1/c1")
            .with_price(json!({ "currency": "USD", "list": 10.0, "sale": 8.0 }))
            .with_price(json!({ "currency": "EUR", "list": 9.0 }))
            .with_variation("p1-red")
    }

    fn includes(fields: &[IndexField]) -> BTreeSet<IndexField> {
        fields.iter().cloned().collect()
    }

    #[test]
    fn test_source_contains_id() {
        let source = phone().source();
        assert_eq!(source[GROUP_OBJECT]["id"], json!("p1"));
        assert_eq!(source[GROUP_VARIATIONS], json!(["p1-red"]));
    }

    #[test]
    fn test_outline_terms_expand_prefixes() {
        let doc = CatalogDocument::new("p1", DocumentType::Product)
            .with_outline("cat/a/b")
            .with_outline("cat/x");
        assert_eq!(doc.outline_terms(), vec!["cat", "cat/a", "cat/a/b", "cat/x"]);
    }

    #[test]
    fn test_content_collects_nested_text() {
        let content = phone().content();
        assert!(content.contains("Phone"));
        assert!(content.contains("a.png"));
    }

    #[test]
    fn test_project_only_id() {
        let projected = project(&phone().source(), &includes(&[IndexField::object_id()]));
        assert_eq!(json!(projected), json!({ "__object": { "id": "p1" } }));
    }

    #[test]
    fn test_project_maps_over_arrays() {
        let projected = project(
            &phone().source(),
            &includes(&[IndexField::object_id(), IndexField::prices("list")]),
        );
        assert_eq!(
            json!(projected),
            json!({
                "__object": { "id": "p1" },
                "__prices": [{ "list": 10.0 }, { "list": 9.0 }]
            })
        );
    }

    #[test]
    fn test_project_whole_group_then_subpath() {
        let projected = project(
            &phone().source(),
            &includes(&[IndexField::whole(FieldGroup::Prices), IndexField::prices("list")]),
        );
        assert_eq!(projected[GROUP_PRICES][0]["sale"], json!(8.0));
    }

    #[test]
    fn test_project_ignores_key_case() {
        let projected = project(&phone().source(), &includes(&[IndexField::object("CategoryID")]));
        assert_eq!(projected[GROUP_OBJECT]["categoryId"], json!("c1"));
    }

    #[test]
    fn test_project_missing_field() {
        let projected = project(&phone().source(), &includes(&[IndexField::object("brand")]));
        assert!(projected[GROUP_OBJECT].is_null());
    }

    #[test]
    fn test_document_accessors() {
        let doc = Document::new("p1", phone().source());
        assert_eq!(doc.category_id(), Some("c1"));
        assert_eq!(doc.variation_ids(), vec!["p1-red"]);
        assert_eq!(doc.prices().len(), 2);
        assert_eq!(doc.get("images.url"), Some(&json!("a.png")));
    }

    #[test]
    fn test_values_at_path_flattens_arrays() {
        let source = Value::Object(phone().source());
        let values = values_at_path(&source, &["__prices", "currency"]);
        assert_eq!(values, vec![&json!("USD"), &json!("EUR")]);
    }

    #[test]
    fn test_catalog_document_json_shape() {
        let doc: CatalogDocument = serde_json::from_value(json!({
            "id": "c1",
            "type": "Category",
            "outlines": ["catalog-1/c1"],
            "object": { "name": "Phones" }
        }))
        .unwrap();
        assert_eq!(doc.document_type, DocumentType::Category);
        assert!(doc.prices.is_empty());
    }
}
