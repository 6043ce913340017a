// catalog-search/src/index/memory.rs
//! 内存索引
//!
//! 在进程内直接对文档求值，语义与 Tantivy 适配器一致。
//! 用于测试和小规模数据。

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use query::{Condition, OUTLINE_FIELD, RangeBound, RangeCondition, TermClause};
use serde_json::Value;

use super::{sort_documents, value_text};
use crate::builder::SearchQuery;
use crate::executor::{IndexError, SearchIndex, SearchResultPage};
use crate::schema::{CatalogDocument, Document, DocumentType, FIELD_DOC_ID, project, values_at_path};

#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    documents: Arc<Vec<CatalogDocument>>,
}

impl MemoryIndex {
    pub fn new(documents: Vec<CatalogDocument>) -> Self {
        Self {
            documents: Arc::new(documents),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn search_sync(&self, document_type: DocumentType, query: &SearchQuery) -> SearchResultPage {
        let fuzzy = query.fuzzy();
        let fuzzy_level = fuzzy.enabled.then_some(fuzzy.level);
        let mut hits: Vec<&CatalogDocument> = self
            .documents
            .iter()
            .filter(|doc| doc.document_type == document_type)
            .filter(|doc| query.object_ids().is_empty() || query.object_ids().contains(&doc.id))
            .filter(|doc| query.phrase().is_none_or(|phrase| matches_phrase(doc, phrase, fuzzy_level)))
            .filter(|doc| query.terms().iter().all(|clause| matches_clause(doc, clause)))
            .collect();

        if !query.sort().is_empty() {
            sort_documents(
                &mut hits,
                query.sort(),
                |doc, field| sort_key(doc, field),
                |doc| doc.id.as_str(),
            );
        }

        let total_count = hits.len() as i64;
        let documents = hits
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.take() as usize)
            .map(|doc| Document::new(doc.id.clone(), project(&doc.source(), query.include_fields())))
            .collect();

        SearchResultPage {
            documents,
            total_count,
        }
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn search(
        &self,
        document_type: DocumentType,
        query: &SearchQuery,
    ) -> Result<SearchResultPage, IndexError> {
        Ok(self.search_sync(document_type, query))
    }
}

/// 文档在某个过滤字段上的所有取值（文本形式）
fn field_values(doc: &CatalogDocument, field: &str) -> Vec<String> {
    if field.eq_ignore_ascii_case(OUTLINE_FIELD) {
        return doc.outline_terms();
    }
    if field.eq_ignore_ascii_case(FIELD_DOC_ID) {
        return vec![doc.id.clone()];
    }

    let object = Value::Object(doc.object_with_id());
    let segments: Vec<&str> = field.split('.').collect();
    values_at_path(&object, &segments)
        .into_iter()
        .filter_map(value_text)
        .collect()
}

fn matches_clause(doc: &CatalogDocument, clause: &TermClause) -> bool {
    let values = field_values(doc, &clause.field);
    let matched = match &clause.condition {
        Condition::AnyOf(candidates) => values
            .iter()
            .any(|v| candidates.iter().any(|c| scalar_eq(v, c))),
        Condition::Range(range) => values.iter().any(|v| in_range(v, range)),
    };
    matched != clause.negated
}

fn scalar_eq(value: &str, candidate: &str) -> bool {
    match (value.parse::<f64>(), candidate.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => value == candidate,
    }
}

fn compare_scalar(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn in_range(value: &str, range: &RangeCondition) -> bool {
    let above = |bound: &RangeBound| match compare_scalar(value, &bound.value) {
        Ordering::Greater => true,
        Ordering::Equal => bound.inclusive,
        Ordering::Less => false,
    };
    let below = |bound: &RangeBound| match compare_scalar(value, &bound.value) {
        Ordering::Less => true,
        Ordering::Equal => bound.inclusive,
        Ordering::Greater => false,
    };
    range.lower.as_ref().is_none_or(above) && range.upper.as_ref().is_none_or(below)
}

/// 所有短语词都要命中（模糊匹配时允许编辑距离）
fn matches_phrase(doc: &CatalogDocument, phrase: &str, fuzzy_level: Option<i32>) -> bool {
    let content = doc.content().to_lowercase();
    let words: Vec<&str> = content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    phrase.split_whitespace().all(|token| {
        let token = token.to_lowercase();
        if content.contains(&token) {
            return true;
        }
        match fuzzy_level {
            Some(level) if level > 0 => words
                .iter()
                .any(|word| strsim::levenshtein(word, &token) <= level as usize),
            _ => false,
        }
    })
}

fn sort_key(doc: &CatalogDocument, field: &str) -> Option<String> {
    field_values(doc, field).into_iter().next()
}
