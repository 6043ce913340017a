use super::{Command, catalog_context, print_json};
use crate::config::Config;
use crate::error::Result;
use catalog::{AssociationsArgs, IndexAssociationSearch, resolve_associations};

pub struct AssociationsCommand {
    config: Config,
    product_id: String,
    args: AssociationsArgs,
}

impl AssociationsCommand {
    pub fn new(cfg: Config, product_id: String, args: AssociationsArgs) -> Self {
        Self {
            config: cfg,
            product_id,
            args,
        }
    }
}

#[async_trait::async_trait]
impl Command for AssociationsCommand {
    async fn execute(&self) -> Result<()> {
        let ctx = catalog_context(&self.config)?;
        let search = IndexAssociationSearch::new(ctx.clone());

        let connection = resolve_associations(&ctx, &search, &self.product_id, &self.args).await?;
        tracing::debug!(
            "[商品关联] 商品 {} 共 {} 个关联",
            self.product_id,
            connection.total_count
        );
        print_json(&connection)
    }
}
