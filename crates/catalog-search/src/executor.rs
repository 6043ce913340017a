// catalog-search/src/executor.rs
//! Query 执行器
//!
//! 每个逻辑请求只调用一次索引，不重试、不缓存。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::builder::SearchQuery;
use crate::error::SearchError;
use crate::schema::{Document, DocumentType};

/// 一页搜索结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResultPage {
    pub documents: Vec<Document>,
    pub total_count: i64,
}

/// 索引适配器错误
#[derive(Debug, Error)]
pub enum IndexError {
    /// 暂时不可用（超时、IO 等）
    #[error("{0}")]
    Unavailable(String),

    /// 查询不合法
    #[error("{0}")]
    Rejected(String),
}

/// 搜索索引能力
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(
        &self,
        document_type: DocumentType,
        query: &SearchQuery,
    ) -> Result<SearchResultPage, IndexError>;
}

/// 查询执行器
#[derive(Clone)]
pub struct QueryExecutor {
    index: Arc<dyn SearchIndex>,
}

impl QueryExecutor {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }

    /// 执行查询
    pub async fn execute(&self, query: &SearchQuery) -> Result<SearchResultPage, SearchError> {
        tracing::debug!("[Query执行器] 执行查询: {}", query.to_json());

        match self.index.search(query.document_type(), query).await {
            Ok(page) => {
                tracing::debug!(
                    "[Query执行器] 返回 {} 条结果，共 {} 条",
                    page.documents.len(),
                    page.total_count
                );
                Ok(page)
            }
            Err(IndexError::Unavailable(reason)) => {
                tracing::warn!("[Query执行器] 索引不可用: {}", reason);
                Err(SearchError::IndexUnavailable(reason))
            }
            Err(IndexError::Rejected(reason)) => {
                tracing::error!(
                    query = %query.to_json(),
                    "[Query执行器] 索引拒绝查询: {}",
                    reason
                );
                Err(SearchError::IndexRejectedQuery(reason))
            }
        }
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor").finish_non_exhaustive()
    }
}
