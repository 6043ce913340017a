// catalog-search/src/index/engine.rs
//! Tantivy 索引适配器
//!
//! 查询结构：
//! 1. 文档类型精确匹配
//! 2. 对象 ID 集合（可选）
//! 3. 搜索短语，`__content` 字段中文分词，可选模糊匹配
//! 4. 每个过滤条件转换为查询字符串，否定条件作为 MustNot
//!
//! 搜索在 `spawn_blocking` 中执行，避免阻塞异步运行时。

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use query::{Condition, RangeBound, TermClause};
use serde_json::{Map, Value, json};
use tantivy::collector::{Count, DocSetCollector, TopDocs};
use tantivy::query::{BooleanQuery, Occur, Query, QueryParser, TermQuery, TermSetQuery};
use tantivy::schema::{IndexRecordOption, Value as _};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term};

use super::{sort_documents, value_text};
use crate::builder::SearchQuery;
use crate::executor::{IndexError, SearchIndex, SearchResultPage};
use crate::schema::{
    CatalogDocument, Document, DocumentType, FIELD_CONTENT, FIELD_DOC_ID, FIELD_KEY, FIELD_OUTLINE,
    FIELD_SOURCE, FIELD_TYPE, GROUP_OBJECT, IndexField, SchemaFields, build_schema, project,
    register_tokenizers, values_at_path,
};

/// 默认写入内存预算
pub const DEFAULT_WRITER_MEMORY: usize = 50_000_000;

/// 基于 Tantivy 的目录索引
#[derive(Clone)]
pub struct TantivyCatalogIndex {
    index: Index,
    reader: IndexReader,
    fields: SchemaFields,
    writer_memory: usize,
}

impl TantivyCatalogIndex {
    /// 打开或创建持久化索引
    pub fn open(index_path: &Path, writer_memory: usize) -> Result<Self> {
        if !index_path.exists() {
            fs::create_dir_all(index_path)?;
        }

        let index = Index::open_or_create(
            tantivy::directory::MmapDirectory::open(index_path)?,
            build_schema(),
        )?;
        tracing::info!("[索引] 已打开索引: {}", index_path.display());

        Self::from_index(index, writer_memory)
    }

    /// 创建内存索引（测试用）
    pub fn create_in_ram() -> Result<Self> {
        Self::from_index(Index::create_in_ram(build_schema()), DEFAULT_WRITER_MEMORY)
    }

    fn from_index(index: Index, writer_memory: usize) -> Result<Self> {
        register_tokenizers(&index);

        let fields = SchemaFields::from_schema(&index.schema())?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            fields,
            writer_memory,
        })
    }

    /// 写入文档；相同类型和 ID 的旧文档会被替换
    pub fn index_documents(&self, documents: &[CatalogDocument]) -> Result<usize> {
        let schema = self.index.schema();
        let mut writer: IndexWriter = self.index.writer(self.writer_memory)?;

        for document in documents {
            writer.delete_term(Term::from_field_text(self.fields.key, &document.key()));

            let source = Value::Object(document.source()).to_string();
            let json = json!({
                FIELD_KEY: document.key(),
                FIELD_DOC_ID: document.id,
                FIELD_TYPE: document.document_type.as_str(),
                FIELD_OUTLINE: document.outline_terms(),
                FIELD_CONTENT: document.content(),
                GROUP_OBJECT: document.object_with_id(),
                FIELD_SOURCE: source,
            });
            let doc = TantivyDocument::parse_json(&schema, &json.to_string())?;
            writer.add_document(doc)?;
        }

        writer.commit()?;
        self.reader.reload()?;

        tracing::info!("[索引] 已写入 {} 个文档", documents.len());
        Ok(documents.len())
    }

    /// 索引中的文档总数
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn build_query(
        &self,
        document_type: DocumentType,
        query: &SearchQuery,
    ) -> Result<BooleanQuery, IndexError> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = vec![(
            Occur::Must,
            Box::new(TermQuery::new(
                Term::from_field_text(self.fields.doc_type, document_type.as_str()),
                IndexRecordOption::Basic,
            )),
        )];

        if !query.object_ids().is_empty() {
            let terms = query
                .object_ids()
                .iter()
                .map(|id| Term::from_field_text(self.fields.doc_id, id));
            clauses.push((Occur::Must, Box::new(TermSetQuery::new(terms))));
        }

        if let Some(phrase) = query.phrase() {
            let mut parser = QueryParser::for_index(&self.index, vec![self.fields.content]);
            parser.set_conjunction_by_default();
            let fuzzy = query.fuzzy();
            if fuzzy.enabled && fuzzy.level > 0 {
                parser.set_field_fuzzy(self.fields.content, false, fuzzy.level as u8, true);
            }
            let (phrase_query, errors) = parser.parse_query_lenient(phrase);
            if !errors.is_empty() {
                tracing::debug!("[索引] 搜索短语部分无法解析: '{}' - {:?}", phrase, errors);
            }
            clauses.push((Occur::Must, phrase_query));
        }

        if !query.terms().is_empty() {
            let parser = QueryParser::for_index(&self.index, Vec::new());
            for clause in query.terms() {
                let text = clause_query_string(clause);
                let term_query = parser
                    .parse_query(&text)
                    .map_err(|e| IndexError::Rejected(format!("过滤条件 '{clause}' 无法转换: {e}")))?;
                let occur = if clause.negated { Occur::MustNot } else { Occur::Must };
                clauses.push((occur, term_query));
            }
        }

        Ok(BooleanQuery::new(clauses))
    }

    fn search_blocking(
        &self,
        document_type: DocumentType,
        query: &SearchQuery,
    ) -> Result<SearchResultPage, IndexError> {
        let tantivy_query = self.build_query(document_type, query)?;
        let searcher = self.reader.searcher();
        let unavailable = |e: tantivy::TantivyError| IndexError::Unavailable(e.to_string());

        // 收集器按 skip + take 预分配，先按文档总数截断
        let num_docs = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX);
        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.take()).unwrap_or(usize::MAX).min(num_docs);

        let (total_count, hits) = if !query.sort().is_empty() {
            let addresses = searcher
                .search(&tantivy_query, &DocSetCollector)
                .map_err(unavailable)?;
            let mut hits = addresses
                .into_iter()
                .map(|address| self.load(&searcher, address))
                .collect::<Result<Vec<_>, _>>()?;
            sort_documents(
                &mut hits,
                query.sort(),
                |(_, source), field| sort_key(source, field),
                |(id, _)| id.as_str(),
            );
            let total = hits.len();
            (total, hits.into_iter().skip(skip).take(take).collect::<Vec<_>>())
        } else if take == 0 || skip >= num_docs {
            let total = searcher.search(&tantivy_query, &Count).map_err(unavailable)?;
            (total, Vec::new())
        } else {
            let (total, top_docs) = searcher
                .search(
                    &tantivy_query,
                    &(Count, TopDocs::with_limit(take).and_offset(skip)),
                )
                .map_err(unavailable)?;
            let hits = top_docs
                .into_iter()
                .map(|(_, address)| self.load(&searcher, address))
                .collect::<Result<Vec<_>, _>>()?;
            (total, hits)
        };

        let documents = hits
            .into_iter()
            .map(|(id, source)| project_document(id, &source, query.include_fields()))
            .collect();

        Ok(SearchResultPage {
            documents,
            total_count: total_count as i64,
        })
    }

    /// 读取存储的文档 ID 和原始 JSON
    fn load(
        &self,
        searcher: &Searcher,
        address: DocAddress,
    ) -> Result<(String, Map<String, Value>), IndexError> {
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        let id = doc
            .get_first(self.fields.doc_id)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let source = doc
            .get_first(self.fields.source)
            .and_then(|v| v.as_str())
            .map(serde_json::from_str::<Map<String, Value>>)
            .transpose()
            .map_err(|e| IndexError::Unavailable(format!("文档 {id} 的存储内容损坏: {e}")))?
            .unwrap_or_default();

        Ok((id, source))
    }
}

#[async_trait]
impl SearchIndex for TantivyCatalogIndex {
    async fn search(
        &self,
        document_type: DocumentType,
        query: &SearchQuery,
    ) -> Result<SearchResultPage, IndexError> {
        let index = self.clone();
        let query = query.clone();
        tokio::task::spawn_blocking(move || index.search_blocking(document_type, &query))
            .await
            .map_err(join_error)?
    }
}

/// 任务 panic 说明查询本身有问题，重试不会成功
fn join_error(error: tokio::task::JoinError) -> IndexError {
    if error.is_panic() {
        IndexError::Rejected(format!("搜索任务异常退出: {error}"))
    } else {
        IndexError::Unavailable(format!("搜索任务被取消: {error}"))
    }
}

fn project_document(
    id: String,
    source: &Map<String, Value>,
    includes: &BTreeSet<IndexField>,
) -> Document {
    Document::new(id, project(source, includes))
}

fn sort_key(source: &Map<String, Value>, field: &str) -> Option<String> {
    let object = source.get(GROUP_OBJECT)?;
    let segments: Vec<&str> = field.split('.').collect();
    values_at_path(object, &segments)
        .into_iter()
        .find_map(value_text)
}

/// 过滤条件转换为 Tantivy 查询字符串
///
/// 以 `__` 开头的字段是顶层系统字段，其余字段位于 `__object` 内。
fn clause_query_string(clause: &TermClause) -> String {
    let field = if clause.field.starts_with("__") {
        clause.field.clone()
    } else {
        format!("{}.{}", GROUP_OBJECT, clause.field)
    };

    match &clause.condition {
        Condition::AnyOf(values) => {
            let alternatives: Vec<String> = values
                .iter()
                .map(|value| format!("{}:{}", field, literal(value)))
                .collect();
            format!("({})", alternatives.join(" OR "))
        }
        Condition::Range(range) => {
            let (open, lower) = match &range.lower {
                Some(RangeBound { value, inclusive }) => {
                    (if *inclusive { '[' } else { '{' }, literal(value))
                }
                None => ('{', "*".to_string()),
            };
            let (close, upper) = match &range.upper {
                Some(RangeBound { value, inclusive }) => {
                    (if *inclusive { ']' } else { '}' }, literal(value))
                }
                None => ('}', "*".to_string()),
            };
            format!("{field}:{open}{lower} TO {upper}{close}")
        }
    }
}

/// 简单词原样输出，其余加引号转义
fn literal(value: &str) -> String {
    let reserved = ["AND", "OR", "NOT", "TO", "IN"];
    let plain = value
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric())
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
        && !reserved.contains(&value);

    if plain {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
