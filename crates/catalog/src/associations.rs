// catalog/src/associations.rs
//! 商品关联列表（游标分页）

use async_trait::async_trait;
use catalog_search::pagination::{Connection, after_to_skip};
use catalog_search::{Document, FieldPathSet};
use serde::{Deserialize, Serialize};

use crate::context::CatalogContext;
use crate::error::{CatalogError, Result};
use crate::products::{LoadProductsQuery, load_products};

/// 商品对象中保存关联列表的字段
pub const ASSOCIATIONS_FIELD: &str = "associations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAssociation {
    /// 关联分组，例如 `Accessories`
    pub group: String,
    pub associated_object_id: String,
    pub associated_object_type: String,
    pub quantity: Option<i32>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductAssociation {
    /// 关键字匹配关联对象 ID 或标签（忽略大小写）
    fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.associated_object_id.to_lowercase().contains(&keyword)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&keyword))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationCriteria {
    pub object_ids: Vec<String>,
    pub keyword: Option<String>,
    pub group: Option<String>,
    pub skip: i64,
    pub take: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AssociationPage {
    pub results: Vec<ProductAssociation>,
    pub total_count: i64,
}

/// 关联查询能力
#[async_trait]
pub trait AssociationSearch: Send + Sync {
    async fn search_associations(&self, criteria: &AssociationCriteria) -> Result<AssociationPage>;
}

/// 从商品文档的 `associations` 字段读取关联
///
/// 结果按优先级从高到低排列，优先级相同按关联对象 ID 排序。
pub struct IndexAssociationSearch {
    ctx: CatalogContext,
}

impl IndexAssociationSearch {
    pub fn new(ctx: CatalogContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl AssociationSearch for IndexAssociationSearch {
    async fn search_associations(&self, criteria: &AssociationCriteria) -> Result<AssociationPage> {
        let fields: FieldPathSet = [ASSOCIATIONS_FIELD].into_iter().collect();
        let query = LoadProductsQuery::new(criteria.object_ids.iter().cloned(), fields);
        let products = load_products(&self.ctx, &query).await?.products;

        let mut associations = Vec::new();
        for product in &products {
            associations.extend(product_associations(product)?);
        }
        associations.retain(|a| {
            criteria
                .group
                .as_deref()
                .is_none_or(|g| a.group.eq_ignore_ascii_case(g))
                && criteria
                    .keyword
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())
                    .is_none_or(|k| a.matches_keyword(k.trim()))
        });
        associations.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.associated_object_id.cmp(&b.associated_object_id))
        });

        let total_count = associations.len() as i64;
        let results = associations
            .into_iter()
            .skip(usize::try_from(criteria.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(criteria.take).unwrap_or(usize::MAX))
            .collect();

        Ok(AssociationPage {
            results,
            total_count,
        })
    }
}

fn product_associations(product: &Document) -> Result<Vec<ProductAssociation>> {
    let Some(values) = product
        .object()
        .and_then(|object| object.get(ASSOCIATIONS_FIELD))
        .and_then(|value| value.as_array())
    else {
        return Ok(Vec::new());
    };

    values
        .iter()
        .map(|value| {
            ProductAssociation::deserialize(value).map_err(|e| {
                CatalogError::Associations(format!("商品 {} 的关联数据格式错误: {e}", product.id))
            })
        })
        .collect()
}

/// 连接参数
#[derive(Debug, Clone, Default)]
pub struct AssociationsArgs {
    pub first: Option<i64>,
    pub after: Option<String>,
    pub query: Option<String>,
    pub group: Option<String>,
}

/// 商品关联连接
///
/// 未指定 `first` 时使用配置的关联每页条数。
pub async fn resolve_associations(
    ctx: &CatalogContext,
    search: &dyn AssociationSearch,
    product_id: &str,
    args: &AssociationsArgs,
) -> Result<Connection<ProductAssociation>> {
    let take = args.first.unwrap_or(ctx.paging.association_page_size);
    if take < 0 {
        return Err(CatalogError::InvalidArgument(format!("first 不能为负数: {take}")));
    }
    let skip = after_to_skip(args.after.as_deref());

    let criteria = AssociationCriteria {
        object_ids: vec![product_id.to_string()],
        keyword: args.query.clone(),
        group: args.group.clone(),
        skip,
        take,
    };
    let page = search.search_associations(&criteria).await?;

    Ok(Connection::paginate(page.total_count, skip, take, page.results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use catalog_search::{CatalogDocument, DocumentType, MemoryIndex, PagingConfig};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    /// 商品 p1 有 7 个关联：前 4 个配件，后 3 个相关商品
    struct FixedAssociations;

    #[async_trait]
    impl AssociationSearch for FixedAssociations {
        async fn search_associations(&self, criteria: &AssociationCriteria) -> Result<AssociationPage> {
            let all: Vec<ProductAssociation> = (0..7)
                .map(|i| ProductAssociation {
                    group: if i < 4 { "Accessories" } else { "Related" }.to_string(),
                    associated_object_id: format!("a{i}"),
                    associated_object_type: "product".to_string(),
                    quantity: None,
                    priority: i,
                    tags: Vec::new(),
                })
                .filter(|_| criteria.object_ids.iter().any(|id| id == "p1"))
                .filter(|a| criteria.group.as_ref().is_none_or(|g| *g == a.group))
                .collect();
            let total_count = all.len() as i64;
            Ok(AssociationPage {
                results: all
                    .into_iter()
                    .skip(criteria.skip as usize)
                    .take(criteria.take as usize)
                    .collect(),
                total_count,
            })
        }
    }

    fn context_with_page_size(size: i64) -> CatalogContext {
        fixtures::context().with_paging(PagingConfig {
            association_page_size: size,
            ..PagingConfig::default()
        })
    }

    #[tokio::test]
    async fn test_first_defaults_to_configured_page_size() {
        let ctx = context_with_page_size(5);
        let connection = resolve_associations(&ctx, &FixedAssociations, "p1", &AssociationsArgs::default())
            .await
            .unwrap();
        assert_eq!(connection.edges.len(), 5);
        assert!(connection.page_info.has_next_page);
        assert_eq!(connection.page_info.end_cursor.as_deref(), Some("4"));

        let connection = resolve_associations(&fixtures::context(), &FixedAssociations, "p1", &AssociationsArgs::default())
            .await
            .unwrap();
        assert_eq!(connection.edges.len(), 7);
        assert!(!connection.page_info.has_next_page);
    }

    #[tokio::test]
    async fn test_after_cursor_continues() {
        let args = AssociationsArgs {
            first: Some(5),
            after: Some("4".to_string()),
            ..Default::default()
        };
        let connection = resolve_associations(&fixtures::context(), &FixedAssociations, "p1", &args)
            .await
            .unwrap();
        let ids: Vec<_> = connection.nodes().map(|a| a.associated_object_id.as_str()).collect();
        assert_eq!(ids, vec!["a5", "a6"]);
        assert!(!connection.page_info.has_next_page);
        assert!(connection.page_info.has_previous_page);
        assert_eq!(connection.edges[0].cursor, "5");
    }

    #[tokio::test]
    async fn test_group_filter() {
        let args = AssociationsArgs {
            group: Some("Related".to_string()),
            ..Default::default()
        };
        let connection = resolve_associations(&fixtures::context(), &FixedAssociations, "p1", &args)
            .await
            .unwrap();
        assert_eq!(connection.total_count, 3);
    }

    #[tokio::test]
    async fn test_negative_first() {
        let args = AssociationsArgs {
            first: Some(-1),
            ..Default::default()
        };
        let err = resolve_associations(&fixtures::context(), &FixedAssociations, "p1", &args)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    fn ids(connection: &Connection<ProductAssociation>) -> Vec<&str> {
        connection
            .nodes()
            .map(|a| a.associated_object_id.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_index_search_orders_by_priority() {
        let ctx = fixtures::context();
        let search = IndexAssociationSearch::new(ctx.clone());
        let connection = resolve_associations(&ctx, &search, "p1", &AssociationsArgs::default())
            .await
            .unwrap();

        assert_eq!(ids(&connection), vec!["p2", "p3", "p1-red"]);
        assert_eq!(connection.total_count, 3);
        assert_eq!(connection.edges[2].node.quantity, Some(2));
    }

    #[tokio::test]
    async fn test_index_search_pages_with_configured_size() {
        let ctx = context_with_page_size(2);
        let search = IndexAssociationSearch::new(ctx.clone());

        let first = resolve_associations(&ctx, &search, "p1", &AssociationsArgs::default())
            .await
            .unwrap();
        assert_eq!(ids(&first), vec!["p2", "p3"]);
        assert!(first.page_info.has_next_page);

        let args = AssociationsArgs {
            after: first.page_info.end_cursor.clone(),
            ..Default::default()
        };
        let second = resolve_associations(&ctx, &search, "p1", &args).await.unwrap();
        assert_eq!(ids(&second), vec!["p1-red"]);
        assert!(!second.page_info.has_next_page);
    }

    #[rstest]
    #[case(Some("accessories"), None, vec!["p2", "p3"])]
    #[case(None, Some("laptop"), vec!["p2"])]
    #[case(None, Some("RED"), vec!["p1-red"])]
    #[case(Some("RelatedItem"), Some("p2"), vec![])]
    #[tokio::test]
    async fn test_index_search_filters(
        #[case] group: Option<&str>,
        #[case] keyword: Option<&str>,
        #[case] expected: Vec<&str>,
    ) {
        let ctx = fixtures::context();
        let args = AssociationsArgs {
            group: group.map(String::from),
            query: keyword.map(String::from),
            ..Default::default()
        };
        let connection = resolve_associations(&ctx, &IndexAssociationSearch::new(ctx.clone()), "p1", &args)
            .await
            .unwrap();
        assert_eq!(ids(&connection), expected);
    }

    #[tokio::test]
    async fn test_product_without_associations() {
        let ctx = fixtures::context();
        let connection = resolve_associations(&ctx, &IndexAssociationSearch::new(ctx.clone()), "p3", &AssociationsArgs::default())
            .await
            .unwrap();
        assert_eq!(connection.total_count, 0);
        assert!(connection.page_info.start_cursor.is_none());
    }

    #[tokio::test]
    async fn test_malformed_associations_are_reported() {
        let index = MemoryIndex::new(vec![CatalogDocument::new("p9", DocumentType::Product)
            .with_field("associations", json!([{ "group": 5 }]))]);
        let ctx = fixtures::context_with(Arc::new(index));

        let err = resolve_associations(&ctx, &IndexAssociationSearch::new(ctx.clone()), "p9", &AssociationsArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Associations(_)));
        assert!(!err.is_retryable());
    }
}
