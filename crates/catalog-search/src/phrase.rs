// catalog-search/src/phrase.rs
//! 过滤表达式解析接口

use query::{FilterParseError, TermClause};

/// 将客户端过滤表达式转换为过滤条件
pub trait PhraseParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Vec<TermClause>, FilterParseError>;
}

/// 基于 `query` DSL 的默认实现
#[derive(Debug, Default, Clone, Copy)]
pub struct DslPhraseParser;

impl PhraseParser for DslPhraseParser {
    fn parse(&self, raw: &str) -> Result<Vec<TermClause>, FilterParseError> {
        query::parse_filter(raw)
    }
}
