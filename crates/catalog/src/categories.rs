// catalog/src/categories.rs
//! 分类搜索与加载
//!
//! 分类搜索总是限定在商店所属目录的分类路径下。

use catalog_search::{
    CATEGORY_INCLUDE_RULES, Document, FieldPathSet, PhraseParser, SearchError, SearchQuery,
    SearchQueryBuilder, TermClause,
};
use serde::{Deserialize, Serialize};

use crate::context::CatalogContext;
use crate::error::Result;
use crate::store::Store;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCategoryQuery {
    pub store_id: String,
    pub culture_name: Option<String>,
    /// 搜索短语
    pub query: Option<String>,
    /// 过滤表达式
    pub filter: Option<String>,
    pub fuzzy: bool,
    pub fuzzy_level: i32,
    pub skip: i64,
    pub take: i64,
    pub sort: Option<String>,
    pub object_ids: Vec<String>,
    pub include_fields: FieldPathSet,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCategoryResponse {
    pub results: Vec<Document>,
    pub total_count: i64,
}

/// 编译分类搜索查询
pub fn compile_search_categories(
    parser: &dyn PhraseParser,
    query: &SearchCategoryQuery,
    store: &Store,
) -> std::result::Result<SearchQuery, SearchError> {
    SearchQueryBuilder::categories()
        .with_fuzzy(query.fuzzy, query.fuzzy_level)
        .parse_filters(parser, query.filter.as_deref())
        .with_search_phrase(query.query.as_deref())
        .with_paging(query.skip, query.take)
        .add_object_ids(query.object_ids.iter().cloned())
        .add_sorting(query.sort.as_deref())
        .with_include_fields(CATEGORY_INCLUDE_RULES.resolve(&query.include_fields))
        .add_terms([TermClause::outline(&store.catalog)])
        .build()
}

pub async fn search_categories(
    ctx: &CatalogContext,
    query: &SearchCategoryQuery,
) -> Result<SearchCategoryResponse> {
    let store = ctx.require_store(&query.store_id).await?;
    let search_query = compile_search_categories(ctx.phrase_parser.as_ref(), query, &store)?;
    let page = ctx.executor.execute(&search_query).await?;

    Ok(SearchCategoryResponse {
        results: page.documents,
        total_count: page.total_count,
    })
}

#[derive(Debug, Clone, Default)]
pub struct LoadCategoryQuery {
    pub store_id: String,
    pub object_ids: Vec<String>,
    pub include_fields: FieldPathSet,
}

/// 按 ID 加载分类，返回第一个结果
pub async fn load_category(ctx: &CatalogContext, query: &LoadCategoryQuery) -> Result<Option<Document>> {
    if query.object_ids.is_empty() {
        return Ok(None);
    }

    let search = SearchCategoryQuery {
        store_id: query.store_id.clone(),
        object_ids: query.object_ids.clone(),
        take: query.object_ids.len() as i64,
        include_fields: query.include_fields.clone(),
        ..Default::default()
    };
    let response = search_categories(ctx, &search).await?;
    Ok(response.results.into_iter().next())
}
