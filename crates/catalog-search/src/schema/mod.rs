// catalog-search/src/schema/mod.rs
//! Schema 模块 - 目录索引结构定义
//!
//! 统一管理字段组、系统字段和文档结构

pub mod builder;
pub mod document;
pub mod fields;

pub use builder::{SchemaFields, build_schema, register_tokenizers};
pub use document::{
    CatalogDocument, Document, DocumentType, index_by_id, project, values_at_path,
};
pub use fields::*;
