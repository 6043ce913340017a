// catalog/src/context.rs
//! 请求处理上下文

use std::sync::Arc;

use catalog_search::{DslPhraseParser, PagingConfig, PhraseParser, QueryExecutor, SearchIndex};

use crate::error::{CatalogError, Result};
use crate::store::{Store, StoreService};

/// 所有处理器共享的依赖，克隆代价低
#[derive(Clone)]
pub struct CatalogContext {
    pub executor: QueryExecutor,
    pub stores: Arc<dyn StoreService>,
    pub phrase_parser: Arc<dyn PhraseParser>,
    pub paging: PagingConfig,
}

impl CatalogContext {
    pub fn new(index: Arc<dyn SearchIndex>, stores: Arc<dyn StoreService>) -> Self {
        Self {
            executor: QueryExecutor::new(index),
            stores,
            phrase_parser: Arc::new(DslPhraseParser),
            paging: PagingConfig::default(),
        }
    }

    pub fn with_phrase_parser(mut self, parser: Arc<dyn PhraseParser>) -> Self {
        self.phrase_parser = parser;
        self
    }

    pub fn with_paging(mut self, paging: PagingConfig) -> Self {
        self.paging = paging;
        self
    }

    /// 查找商店，不存在时返回错误
    pub async fn require_store(&self, id: &str) -> Result<Store> {
        self.stores
            .get_store(id)
            .await?
            .ok_or_else(|| CatalogError::StoreNotFound(id.to_string()))
    }
}
