// catalog-search/src/error.rs
//! 错误类型定义

use query::FilterParseError;
use thiserror::Error;

/// 查询编译或执行错误
#[derive(Debug, Error)]
pub enum SearchError {
    /// 查询配置无效（调用方错误）
    #[error("查询配置无效: {0}")]
    InvalidQueryConfiguration(#[from] ConfigurationError),

    /// 过滤表达式解析失败（调用方错误）
    #[error("过滤表达式解析失败: {0}")]
    FilterParse(#[from] FilterParseError),

    /// 索引暂时不可用（可重试）
    #[error("索引不可用: {0}")]
    IndexUnavailable(String),

    /// 索引拒绝了查询（编译器缺陷，不可重试）
    #[error("索引拒绝了查询: {0}")]
    IndexRejectedQuery(String),
}

impl SearchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::IndexUnavailable(_))
    }

    /// 是否由调用方输入导致
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidQueryConfiguration(_) | SearchError::FilterParse(_)
        )
    }
}

/// 构建器配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("skip 不能为负数: {0}")]
    NegativeSkip(i64),

    #[error("take 不能为负数: {0}")]
    NegativeTake(i64),

    #[error("模糊匹配级别 {level} 超出范围 0..={max}")]
    InvalidFuzzyLevel { level: i32, max: i32 },

    #[error("排序表达式无效: '{0}'")]
    InvalidSort(String),

    #[error("空查询：未设置分页、对象 ID、搜索短语或过滤条件")]
    EmptyConfiguration,
}
