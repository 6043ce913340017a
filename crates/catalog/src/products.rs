// catalog/src/products.rs
//! 按 ID 加载商品

use std::collections::HashMap;

use catalog_search::schema::index_by_id;
use catalog_search::{
    Document, FieldPathSet, PRODUCT_INCLUDE_RULES, SearchError, SearchQuery, SearchQueryBuilder,
};
use serde::Serialize;

use crate::context::CatalogContext;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct LoadProductsQuery {
    pub object_ids: Vec<String>,
    /// 请求的输出字段
    pub include_fields: FieldPathSet,
}

impl LoadProductsQuery {
    pub fn new<I, S>(ids: I, include_fields: FieldPathSet) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            object_ids: ids.into_iter().map(Into::into).collect(),
            include_fields,
        }
    }
}

/// 商品列表，顺序为索引返回顺序，不保证与请求 ID 顺序一致
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadProductsResponse {
    pub products: Vec<Document>,
}

impl LoadProductsResponse {
    pub fn by_id(&self) -> HashMap<&str, &Document> {
        index_by_id(&self.products)
    }
}

/// 编译商品加载查询：一页取回全部请求的 ID
pub fn compile_load_products(query: &LoadProductsQuery) -> std::result::Result<SearchQuery, SearchError> {
    let mut ids: Vec<&str> = Vec::with_capacity(query.object_ids.len());
    for id in &query.object_ids {
        if !ids.contains(&id.as_str()) {
            ids.push(id);
        }
    }

    SearchQueryBuilder::products()
        .with_include_fields(PRODUCT_INCLUDE_RULES.resolve(&query.include_fields))
        .with_paging(0, ids.len() as i64)
        .add_object_ids(ids)
        .build()
}

pub async fn load_products(ctx: &CatalogContext, query: &LoadProductsQuery) -> Result<LoadProductsResponse> {
    if query.object_ids.is_empty() {
        return Ok(LoadProductsResponse::default());
    }

    let search_query = compile_load_products(query)?;
    let page = ctx.executor.execute(&search_query).await?;

    tracing::debug!(
        "[商品加载] 请求 {} 个，返回 {} 个",
        query.object_ids.len(),
        page.documents.len()
    );

    Ok(LoadProductsResponse {
        products: page.documents,
    })
}
