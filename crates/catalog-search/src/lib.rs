// catalog-search/src/lib.rs
//! 字段选择到索引查询的编译器
//!
//! 根据客户端请求的输出字段，生成一次最小化的索引查询：
//! - 字段路径 → include 字段（规则表）
//! - 分页、对象 ID、搜索短语、过滤、排序 → 查询构建器
//! - 单次索引调用 → 查询执行器
//! - 偏移量游标分页 → 连接分页器

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod field_path;
pub mod include_rules;
pub mod index;
pub mod pagination;
pub mod phrase;
pub mod schema;

// 重导出核心类型
pub use builder::{
    DEFAULT_TAKE, Fuzzy, MAX_FUZZY_LEVEL, SearchQuery, SearchQueryBuilder, SortClause,
    SortDirection,
};
pub use config::{IndexConfig, PagingConfig, SearchConfig, StoreConfig};
pub use error::{ConfigurationError, SearchError};
pub use executor::{IndexError, QueryExecutor, SearchIndex, SearchResultPage};
pub use field_path::{FieldPath, FieldPathSet, Selection};
pub use include_rules::{
    CATEGORY_INCLUDE_RULES, IncludeRule, IncludeRuleTable, PRODUCT_INCLUDE_RULES, RuleOutcome,
};
pub use index::{DEFAULT_WRITER_MEMORY, MemoryIndex, TantivyCatalogIndex};
pub use pagination::{Connection, Edge, PageInfo, after_to_skip};
pub use phrase::{DslPhraseParser, PhraseParser};
pub use schema::{CatalogDocument, Document, DocumentType, FieldGroup, IndexField};

pub use query::{Condition, FilterParseError, RangeBound, RangeCondition, TermClause};
