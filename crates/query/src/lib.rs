//! Filter expression DSL for catalog searches.
//!
//! `color:red,blue AND price:[10 TO 100) AND NOT brand:"Acme"` is turned into an
//! ordered list of [`TermClause`]s that an index adapter ANDs together.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod term;
pub mod validator;

pub use error::{FilterParseError, FilterParseErrorKind, FilterResult};
pub use lexer::{QueryLexer, Token};
pub use parser::{ParsedFilter, parse_filter_tree, parser};
pub use term::{Condition, OUTLINE_FIELD, RangeBound, RangeCondition, TermClause};
pub use validator::lower_filter;

/// Parse a filter expression into term clauses.
///
/// A blank expression yields no clauses.
pub fn parse_filter(input: &str) -> FilterResult<Vec<TermClause>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tree = parse_filter_tree(input)?;
    lower_filter(input, &tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filter() {
        assert!(parse_filter("   ").unwrap().is_empty());
    }

    #[test]
    fn test_realistic_filter() {
        let clauses =
            parse_filter(r#"color:red,blue AND price:[10 TO 100) AND NOT brand:"Acme""#).unwrap();
        assert_eq!(clauses.len(), 3);
        assert!(clauses[2].negated);
    }

    #[test]
    fn test_malformed_filter_reports_fragment() {
        let err = parse_filter("color:red AND (size:xl").unwrap_err();
        assert!(matches!(err.kind, FilterParseErrorKind::Syntax { .. }));
    }
}
