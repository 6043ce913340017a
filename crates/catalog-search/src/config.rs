// catalog-search/src/config.rs
//! 配置模块

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::DEFAULT_TAKE;

/// 搜索配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub index: IndexConfig,
    pub paging: PagingConfig,
    /// 商店列表（商店 ID → 所属目录）
    pub stores: Vec<StoreConfig>,
}

/// 索引配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexConfig {
    pub storage_path: String,
    pub writer_memory: usize,
}

/// 分页配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: i64,
    /// 商品关联列表默认每页条数
    pub association_page_size: i64,
}

/// 商店配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    pub id: String,
    pub catalog: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            storage_path: "./storage".to_string(),
            writer_memory: 50_000_000,
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_TAKE,
            association_page_size: 20,
        }
    }
}

impl SearchConfig {
    /// 从 TOML 文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SearchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// 尝试加载配置，失败则使用默认值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load_from_file(path).unwrap_or_else(|e| {
            tracing::debug!("[配置] 无法加载 {}，使用默认配置: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn store(&self, id: &str) -> Option<&StoreConfig> {
        self.stores.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[paging]
association_page_size = 50

[[stores]]
id = "electronics"
catalog = "catalog-1"
"#
        )
        .unwrap();

        let config = SearchConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.paging.association_page_size, 50);
        assert_eq!(config.paging.default_page_size, DEFAULT_TAKE);
        assert_eq!(config.index, IndexConfig::default());
        assert_eq!(config.store("electronics").map(|s| s.catalog.as_str()), Some("catalog-1"));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = SearchConfig::load_or_default("/nonexistent/catalog.toml");
        assert_eq!(config, SearchConfig::default());
    }
}
