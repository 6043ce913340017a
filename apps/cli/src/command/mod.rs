pub mod associations;
pub mod categories;
pub mod explain;
pub mod index;
pub mod products;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, error};
use catalog::{CatalogContext, StaticStoreService};
use catalog_search::TantivyCatalogIndex;

pub use associations::AssociationsCommand;
pub use categories::CategoriesCommand;
pub use explain::ExplainCommand;
pub use index::IndexCommand;
pub use products::ProductsCommand;

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

fn open_index(config: &Config) -> Result<TantivyCatalogIndex> {
    TantivyCatalogIndex::open(&config.index_dir, config.writer_memory)
        .map_err(|e| error!("打开索引失败 {}: {e:#}", config.index_dir.display()))
}

fn catalog_context(config: &Config) -> Result<CatalogContext> {
    let search = config.search_config();
    let index = open_index(config)?;
    let stores = StaticStoreService::from_config(&search.stores);
    Ok(CatalogContext::new(Arc::new(index), Arc::new(stores)).with_paging(search.paging))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
