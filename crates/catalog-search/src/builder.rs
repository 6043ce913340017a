// catalog-search/src/builder.rs
//! 查询构建器
//!
//! 以链式调用累积查询配置，`build()` 时统一校验并生成不可变的 [`SearchQuery`]。
//! 过滤表达式解析或排序表达式错误不会立即返回，而是在 `build()` 时报告。

use std::collections::BTreeSet;

use query::TermClause;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, SearchError};
use crate::phrase::PhraseParser;
use crate::schema::{DocumentType, IndexField};

/// 未指定分页时的默认条数
pub const DEFAULT_TAKE: i64 = 20;

/// 最大模糊匹配编辑距离
pub const MAX_FUZZY_LEVEL: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// 解析排序表达式：`field[:asc|desc][;field[:asc|desc]]...`
    pub fn parse_list(expression: &str) -> Result<Vec<SortClause>, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidSort(expression.to_string());

        expression
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (field, direction) = match part.split_once(':') {
                    Some((field, direction)) => (field.trim(), Some(direction.trim())),
                    None => (part, None),
                };
                if field.is_empty() {
                    return Err(invalid());
                }
                let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
                    None | Some("") | Some("asc") | Some("ascending") => SortDirection::Asc,
                    Some("desc") | Some("descending") => SortDirection::Desc,
                    Some(_) => return Err(invalid()),
                };
                Ok(SortClause {
                    field: field.to_string(),
                    direction,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fuzzy {
    pub enabled: bool,
    pub level: i32,
}

/// 编译完成的索引查询（不可变）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    document_type: DocumentType,
    object_ids: Vec<String>,
    phrase: Option<String>,
    terms: Vec<TermClause>,
    sort: Vec<SortClause>,
    skip: i64,
    take: i64,
    fuzzy: Fuzzy,
    include_fields: BTreeSet<IndexField>,
}

impl SearchQuery {
    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn object_ids(&self) -> &[String] {
        &self.object_ids
    }

    pub fn phrase(&self) -> Option<&str> {
        self.phrase.as_deref()
    }

    pub fn terms(&self) -> &[TermClause] {
        &self.terms
    }

    pub fn sort(&self) -> &[SortClause] {
        &self.sort
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn take(&self) -> i64 {
        self.take
    }

    pub fn fuzzy(&self) -> Fuzzy {
        self.fuzzy
    }

    pub fn include_fields(&self) -> &BTreeSet<IndexField> {
        &self.include_fields
    }

    /// 无任何限制条件的列表查询
    pub fn is_listing(&self) -> bool {
        self.object_ids.is_empty() && self.phrase.is_none() && self.terms.is_empty()
    }

    /// 用于日志的 JSON 表示
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<unserializable query: {e}>"))
    }
}

/// 查询构建器
#[derive(Debug)]
pub struct SearchQueryBuilder {
    document_type: DocumentType,
    paging: Option<(i64, i64)>,
    object_ids: Vec<String>,
    phrase: Option<String>,
    terms: Vec<TermClause>,
    sort: Vec<SortClause>,
    fuzzy: Fuzzy,
    include_fields: BTreeSet<IndexField>,
    error: Option<SearchError>,
}

impl SearchQueryBuilder {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            paging: None,
            object_ids: Vec::new(),
            phrase: None,
            terms: Vec::new(),
            sort: Vec::new(),
            fuzzy: Fuzzy::default(),
            include_fields: BTreeSet::new(),
            error: None,
        }
    }

    pub fn products() -> Self {
        Self::new(DocumentType::Product)
    }

    pub fn categories() -> Self {
        Self::new(DocumentType::Category)
    }

    pub fn with_paging(mut self, skip: i64, take: i64) -> Self {
        self.paging = Some((skip, take));
        self
    }

    pub fn with_include_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = IndexField>,
    {
        self.include_fields.extend(fields);
        self
    }

    /// 限定对象 ID（保持插入顺序去重）
    pub fn add_object_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !id.trim().is_empty() && !self.object_ids.contains(&id) {
                self.object_ids.push(id);
            }
        }
        self
    }

    pub fn with_search_phrase(mut self, phrase: Option<&str>) -> Self {
        if let Some(phrase) = phrase.map(str::trim).filter(|p| !p.is_empty()) {
            self.phrase = Some(phrase.to_string());
        }
        self
    }

    /// 解析过滤表达式；失败时记录错误，由 `build()` 返回
    pub fn parse_filters(mut self, parser: &dyn PhraseParser, filter: Option<&str>) -> Self {
        let Some(filter) = filter.filter(|f| !f.trim().is_empty()) else {
            return self;
        };
        match parser.parse(filter) {
            Ok(clauses) => self.terms.extend(clauses),
            Err(e) => {
                tracing::debug!("[Query构建器] 过滤表达式解析失败: '{}' - {}", filter, e);
                self.record_error(e.into());
            }
        }
        self
    }

    pub fn add_terms<I>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = TermClause>,
    {
        self.terms.extend(terms);
        self
    }

    /// 解析排序表达式；为空时按相关度排序
    pub fn add_sorting(mut self, sort: Option<&str>) -> Self {
        let Some(sort) = sort.filter(|s| !s.trim().is_empty()) else {
            return self;
        };
        match SortClause::parse_list(sort) {
            Ok(clauses) => self.sort.extend(clauses),
            Err(e) => self.record_error(e.into()),
        }
        self
    }

    pub fn add_sort_clauses<I>(mut self, clauses: I) -> Self
    where
        I: IntoIterator<Item = SortClause>,
    {
        self.sort.extend(clauses);
        self
    }

    pub fn with_fuzzy(mut self, enabled: bool, level: i32) -> Self {
        self.fuzzy = Fuzzy { enabled, level };
        self
    }

    fn record_error(&mut self, error: SearchError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn has_restriction(&self) -> bool {
        !self.object_ids.is_empty() || self.phrase.is_some() || !self.terms.is_empty()
    }

    /// 校验并生成查询
    pub fn build(self) -> Result<SearchQuery, SearchError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.paging.is_none() && !self.has_restriction() {
            return Err(ConfigurationError::EmptyConfiguration.into());
        }

        let (skip, take) = self.paging.unwrap_or((0, DEFAULT_TAKE));
        if skip < 0 {
            return Err(ConfigurationError::NegativeSkip(skip).into());
        }
        if take < 0 {
            return Err(ConfigurationError::NegativeTake(take).into());
        }

        if !(0..=MAX_FUZZY_LEVEL).contains(&self.fuzzy.level) {
            return Err(ConfigurationError::InvalidFuzzyLevel {
                level: self.fuzzy.level,
                max: MAX_FUZZY_LEVEL,
            }
            .into());
        }

        let mut include_fields = self.include_fields;
        include_fields.insert(IndexField::object_id());

        let query = SearchQuery {
            document_type: self.document_type,
            object_ids: self.object_ids,
            phrase: self.phrase,
            terms: self.terms,
            sort: self.sort,
            skip,
            take,
            fuzzy: self.fuzzy,
            include_fields,
        };

        if query.is_listing() {
            tracing::debug!(
                "[Query构建器] 无限制条件，按分页列出全部 {}: skip={}, take={}",
                query.document_type,
                skip,
                take
            );
        }

        Ok(query)
    }
}
