// catalog/src/resolver.rs
//! 商品嵌套字段解析
//!
//! 商品先一次性加载，然后每个商品并发加载请求的分类和变体。
//! 嵌套加载各自返回结果，单个失败只影响对应字段。

use catalog_search::{Document, Selection};
use futures::future::join_all;

use crate::categories::{LoadCategoryQuery, load_category};
use crate::context::CatalogContext;
use crate::error::{CatalogError, Result};
use crate::products::{LoadProductsQuery, load_products};

/// 商品及其嵌套字段
///
/// 未请求的嵌套字段为 `None`。
#[derive(Debug)]
pub struct ProductNode {
    pub product: Document,
    pub category: Option<Result<Option<Document>>>,
    pub variations: Option<Result<Vec<Document>>>,
}

/// 加载商品并解析嵌套字段；商品本身加载失败时整体失败
pub async fn load_product_nodes(
    ctx: &CatalogContext,
    store_id: &str,
    ids: &[String],
    selection: &Selection,
) -> Result<Vec<ProductNode>> {
    let query = LoadProductsQuery::new(ids.iter().cloned(), selection.leaf_paths());
    let response = load_products(ctx, &query).await?;

    let nodes = join_all(
        response
            .products
            .into_iter()
            .map(|product| resolve_product_node(ctx, store_id, product, selection)),
    )
    .await;

    Ok(nodes)
}

pub async fn resolve_product_node(
    ctx: &CatalogContext,
    store_id: &str,
    product: Document,
    selection: &Selection,
) -> ProductNode {
    let category = async {
        let sub = selection.child("category")?;
        Some(resolve_category(ctx, store_id, &product, sub).await)
    };
    let variations = async {
        let sub = selection.child("variations")?;
        Some(resolve_variations(ctx, &product, sub).await)
    };

    let (category, variations) = futures::join!(category, variations);

    for error in [
        category.as_ref().and_then(|r| r.as_ref().err()),
        variations.as_ref().and_then(|r| r.as_ref().err()),
    ]
    .into_iter()
    .flatten()
    {
        log_nested_failure(&product, error);
    }

    ProductNode {
        product,
        category,
        variations,
    }
}

async fn resolve_category(
    ctx: &CatalogContext,
    store_id: &str,
    product: &Document,
    selection: &Selection,
) -> Result<Option<Document>> {
    let Some(category_id) = product.category_id() else {
        return Ok(None);
    };
    let query = LoadCategoryQuery {
        store_id: store_id.to_string(),
        object_ids: vec![category_id.to_string()],
        include_fields: selection.leaf_paths(),
    };
    load_category(ctx, &query).await
}

async fn resolve_variations(
    ctx: &CatalogContext,
    product: &Document,
    selection: &Selection,
) -> Result<Vec<Document>> {
    let query = LoadProductsQuery::new(product.variation_ids(), selection.leaf_paths());
    Ok(load_products(ctx, &query).await?.products)
}

fn log_nested_failure(product: &Document, error: &CatalogError) {
    tracing::warn!("[商品解析] 商品 {} 的嵌套字段加载失败: {}", product.id, error);
}
