use super::{Command, open_index};
use crate::config::Config;
use crate::error::{Result, WrapErr, error};
use catalog_search::CatalogDocument;
use std::path::PathBuf;

pub struct IndexCommand {
    config: Config,
    documents: PathBuf,
}

impl IndexCommand {
    pub fn new(cfg: Config, documents: PathBuf) -> Self {
        Self {
            config: cfg,
            documents,
        }
    }
}

#[async_trait::async_trait]
impl Command for IndexCommand {
    async fn execute(&self) -> Result<()> {
        let content = tokio::fs::read_to_string(&self.documents)
            .await
            .with_context(|| format!("读取文档文件失败: {}", self.documents.display()))?;
        let documents: Vec<CatalogDocument> =
            serde_json::from_str(&content).context("文档格式错误，应为 JSON 数组")?;

        let index = open_index(&self.config)?;
        let count = tokio::task::spawn_blocking(move || index.index_documents(&documents))
            .await?
            .map_err(|e| error!("写入索引失败: {e:#}"))?;

        tracing::info!("[索引] 已写入 {} 个文档", count);
        println!("Indexed {count} documents into {}", self.config.index_dir.display());
        Ok(())
    }
}
