// catalog/src/error.rs
//! 错误类型定义

use catalog_search::SearchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("商店不存在: {0}")]
    StoreNotFound(String),

    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("关联商品查询失败: {0}")]
    Associations(String),
}

impl CatalogError {
    /// 索引暂时不可用时可以重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Search(e) if e.is_retryable())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
