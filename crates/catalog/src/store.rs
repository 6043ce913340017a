// catalog/src/store.rs
//! 商店信息
//!
//! 每个商店绑定一个目录，分类搜索会被限定在该目录的分类路径下。

use std::collections::HashMap;

use async_trait::async_trait;
use catalog_search::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub catalog: String,
}

impl From<&StoreConfig> for Store {
    fn from(config: &StoreConfig) -> Self {
        Self {
            id: config.id.clone(),
            catalog: config.catalog.clone(),
        }
    }
}

/// 商店查询能力
#[async_trait]
pub trait StoreService: Send + Sync {
    async fn get_store(&self, id: &str) -> Result<Option<Store>>;
}

/// 由配置构建的静态商店列表
#[derive(Debug, Clone, Default)]
pub struct StaticStoreService {
    stores: HashMap<String, Store>,
}

impl StaticStoreService {
    pub fn new(stores: impl IntoIterator<Item = Store>) -> Self {
        Self {
            stores: stores.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn from_config(stores: &[StoreConfig]) -> Self {
        Self::new(stores.iter().map(Store::from))
    }
}

#[async_trait]
impl StoreService for StaticStoreService {
    async fn get_store(&self, id: &str) -> Result<Option<Store>> {
        Ok(self.stores.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_from_config() {
        let service = StaticStoreService::from_config(&[StoreConfig {
            id: "electronics".into(),
            catalog: "catalog-1".into(),
        }]);

        let store = service.get_store("electronics").await.unwrap().unwrap();
        assert_eq!(store.catalog, "catalog-1");
        assert!(service.get_store("books").await.unwrap().is_none());
    }
}
