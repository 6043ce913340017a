use super::{Command, catalog_context, print_json};
use crate::config::Config;
use crate::error::Result;
use catalog::{SearchCategoryQuery, search_categories};

pub struct CategoriesCommand {
    config: Config,
    query: SearchCategoryQuery,
    take: Option<i64>,
}

impl CategoriesCommand {
    /// 未指定 `take` 时使用配置中的默认页大小
    pub fn new(cfg: Config, query: SearchCategoryQuery, take: Option<i64>) -> Self {
        Self {
            config: cfg,
            query,
            take,
        }
    }
}

#[async_trait::async_trait]
impl Command for CategoriesCommand {
    async fn execute(&self) -> Result<()> {
        let ctx = catalog_context(&self.config)?;
        let query = SearchCategoryQuery {
            take: self.take.unwrap_or(ctx.paging.default_page_size),
            ..self.query.clone()
        };

        let response = search_categories(&ctx, &query).await?;
        tracing::debug!("[分类搜索] 命中 {} 个分类", response.total_count);
        print_json(&response)
    }
}
