// catalog/src/lib.rs
//! 数字目录请求处理
//!
//! - 按 ID 加载商品，并发解析分类和变体
//! - 分类搜索与加载（限定在商店目录内）
//! - 商品关联连接

pub mod associations;
pub mod categories;
pub mod context;
pub mod error;
pub mod products;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use associations::{
    ASSOCIATIONS_FIELD, AssociationCriteria, AssociationPage, AssociationSearch, AssociationsArgs,
    IndexAssociationSearch, ProductAssociation, resolve_associations,
};
pub use categories::{
    LoadCategoryQuery, SearchCategoryQuery, SearchCategoryResponse, compile_search_categories,
    load_category, search_categories,
};
pub use context::CatalogContext;
pub use error::CatalogError;
pub use products::{LoadProductsQuery, LoadProductsResponse, compile_load_products, load_products};
pub use resolver::{ProductNode, load_product_nodes, resolve_product_node};
pub use store::{StaticStoreService, Store, StoreService};
