use crate::error::Result;
use catalog_search::{DEFAULT_TAKE, DEFAULT_WRITER_MEMORY, IndexConfig, PagingConfig, SearchConfig, StoreConfig};
use config::constants::{APP_NAME, CLI_CONFIG_FILE_NAME, INDEX_DIR_NAME};
use config::{AppStrategy, create_strategy, default_index_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default = "default_config", deny_unknown_fields)]
pub struct Config {
    pub index_dir: PathBuf,
    pub writer_memory: usize,
    pub default_page_size: i64,
    pub association_page_size: i64,
    /// 商店与目录的对应关系
    pub stores: Vec<StoreConfig>,
}

fn default_config() -> Config {
    let index_dir = match create_strategy() {
        Ok(strategy) => default_index_dir(&strategy),
        Err(_) => std::env::temp_dir().join(APP_NAME).join(INDEX_DIR_NAME),
    };

    Config {
        index_dir,
        writer_memory: DEFAULT_WRITER_MEMORY,
        default_page_size: DEFAULT_TAKE,
        association_page_size: DEFAULT_TAKE,
        stores: vec![],
    }
}

impl Config {
    fn load_str(user_config_str: &str) -> Result<Config> {
        let user_config: Config = toml::from_str(user_config_str)?;
        Ok(user_config)
    }

    pub fn load() -> Result<Config> {
        let strategy = create_strategy()?;
        let config_path = strategy.config_dir().join(CLI_CONFIG_FILE_NAME);

        match std::fs::read_to_string(&config_path) {
            Ok(user_config_str) => Self::load_str(&user_config_str),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::create_example_config(&config_path)?;
                Self::load_str("")
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let example_config = r#"# 目录命令行配置文件
#
# 此文件在首次运行时自动创建

# 商店与目录的对应关系，分类搜索限定在商店所属目录内
stores = [
    # { id = "electronics", catalog = "catalog-1" },
]

# 可选：自定义索引目录
# index-dir = "/custom/index/path"

# 可选：分页默认值
# default-page-size = 20
# association-page-size = 20
"#;

        std::fs::write(config_path, example_config)?;

        eprintln!("\n📝 已创建配置文件: {}", config_path.display());
        eprintln!("💡 请编辑配置文件，添加商店到 stores\n");

        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            index: IndexConfig {
                storage_path: self.index_dir.display().to_string(),
                writer_memory: self.writer_memory,
            },
            paging: PagingConfig {
                default_page_size: self.default_page_size,
                association_page_size: self.association_page_size,
            },
            stores: self.stores.clone(),
        }
    }
}
