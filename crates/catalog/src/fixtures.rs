// catalog/src/fixtures.rs
//! 测试数据

use std::sync::Arc;

use async_trait::async_trait;
use catalog_search::{
    CatalogDocument, DocumentType, IndexError, MemoryIndex, SearchIndex, SearchQuery,
    SearchResultPage,
};
use serde_json::json;

use crate::context::CatalogContext;
use crate::store::{StaticStoreService, Store};

pub const STORE: &str = "electronics";

pub fn documents() -> Vec<CatalogDocument> {
    vec![
        CatalogDocument::new("c-phones", DocumentType::Category)
            .with_field("name", json!("Phones"))
            .with_field("code", json!("PH"))
            .with_field("seoInfos", json!([{ "semanticUrl": "phones" }]))
            .with_outline("catalog-1/c-phones"),
        CatalogDocument::new("c-android", DocumentType::Category)
            .with_field("name", json!("Android phones"))
            .with_field("code", json!("AN"))
            .with_field("parentId", json!("c-phones"))
            .with_outline("catalog-1/c-phones/c-android"),
        CatalogDocument::new("c-laptops", DocumentType::Category)
            .with_field("name", json!("Laptops"))
            .with_field("code", json!("LT"))
            .with_outline("catalog-1/c-laptops"),
        CatalogDocument::new("c-books", DocumentType::Category)
            .with_field("name", json!("Books"))
            .with_field("code", json!("BK"))
            .with_outline("catalog-2/c-books"),
        CatalogDocument::new("p1", DocumentType::Product)
            .with_field("name", json!("Smartphone X"))
            .with_field("code", json!("SX"))
            .with_field("categoryId", json!("c-android"))
            .with_field(
                "associations",
                json!([
                    { "group": "Accessories", "associatedObjectId": "p3", "associatedObjectType": "product", "priority": 5 },
                    { "group": "Accessories", "associatedObjectId": "p2", "associatedObjectType": "product", "priority": 10, "tags": ["Laptop"] },
                    { "group": "RelatedItem", "associatedObjectId": "p1-red", "associatedObjectType": "product", "priority": 1, "quantity": 2 }
                ]),
            )
            .with_outline("catalog-1/c-phones/c-android")
            .with_price(json!({ "id": "pr1", "currency": "USD", "list": 499.0, "sale": 449.0 }))
            .with_variation("p1-red")
            .with_variation("p1-blue"),
        CatalogDocument::new("p1-red", DocumentType::Product)
            .with_field("name", json!("Smartphone X red"))
            .with_field("mainProductId", json!("p1"))
            .with_field("color", json!("red")),
        CatalogDocument::new("p1-blue", DocumentType::Product)
            .with_field("name", json!("Smartphone X blue"))
            .with_field("mainProductId", json!("p1"))
            .with_field("color", json!("blue")),
        CatalogDocument::new("p2", DocumentType::Product)
            .with_field("name", json!("Laptop Pro"))
            .with_field("categoryId", json!("c-laptops")),
        CatalogDocument::new("p3", DocumentType::Product).with_field("name", json!("Gift card")),
    ]
}

pub fn index() -> MemoryIndex {
    MemoryIndex::new(documents())
}

pub fn context_with(index: Arc<dyn SearchIndex>) -> CatalogContext {
    let stores = StaticStoreService::new([Store {
        id: STORE.to_string(),
        catalog: "catalog-1".to_string(),
    }]);
    CatalogContext::new(index, Arc::new(stores))
}

pub fn context() -> CatalogContext {
    context_with(Arc::new(index()))
}

/// 对某种文档类型总是返回不可用的索引
pub struct FailingIndex {
    pub inner: MemoryIndex,
    pub failing: DocumentType,
}

#[async_trait]
impl SearchIndex for FailingIndex {
    async fn search(
        &self,
        document_type: DocumentType,
        query: &SearchQuery,
    ) -> Result<SearchResultPage, IndexError> {
        if document_type == self.failing {
            return Err(IndexError::Unavailable("index node down".into()));
        }
        self.inner.search(document_type, query).await
    }
}
