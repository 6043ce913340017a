mod range;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FilterParseError, FilterParseErrorKind, FilterResult};
use crate::parser::{ParsedFilter, ParsedTerm, ParsedTermValue, Span, Spanned};
use crate::term::{Condition, TermClause};

pub use range::{parse_bracket_range, parse_comparison};

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid field regex"));

/// Lower a parsed filter tree into an ordered list of ANDed term clauses.
///
/// - `AND` flattens into the list.
/// - `NOT` applies to exactly one clause and toggles its negation.
/// - `OR` is accepted only between any-of clauses on the same field; the
///   values are merged into one clause.
pub fn lower_filter(input: &str, filter: &Spanned<ParsedFilter>) -> FilterResult<Vec<TermClause>> {
    let (parsed, span) = filter;
    match parsed {
        ParsedFilter::Term(term) => lower_term(input, term).map(|clause| vec![clause]),
        ParsedFilter::And(items) => {
            let mut clauses = Vec::new();
            for item in items {
                clauses.extend(lower_filter(input, item)?);
            }
            Ok(clauses)
        }
        ParsedFilter::Or(items) => lower_disjunction(input, items, *span).map(|c| vec![c]),
        ParsedFilter::Not(inner) => {
            let mut clauses = lower_filter(input, inner)?;
            match (clauses.pop(), clauses.is_empty()) {
                (Some(clause), true) => Ok(vec![clause.negate()]),
                _ => Err(FilterParseError::new(
                    input,
                    span.start..span.end,
                    FilterParseErrorKind::UnsupportedNegation,
                )),
            }
        }
    }
}

fn lower_disjunction(
    input: &str,
    items: &[Spanned<ParsedFilter>],
    span: Span,
) -> FilterResult<TermClause> {
    let unsupported = |reason: &str| {
        FilterParseError::new(
            input,
            span.start..span.end,
            FilterParseErrorKind::UnsupportedDisjunction {
                reason: reason.to_string(),
            },
        )
    };

    let mut merged: Option<TermClause> = None;
    for item in items {
        let mut clauses = lower_filter(input, item)?;
        let clause = match (clauses.pop(), clauses.is_empty()) {
            (Some(clause), true) => clause,
            _ => return Err(unsupported("each alternative must be a single term")),
        };
        if clause.negated {
            return Err(unsupported("negated alternatives cannot be merged"));
        }
        let Condition::AnyOf(values) = clause.condition else {
            return Err(unsupported("ranges cannot be combined with OR"));
        };

        match merged.as_mut() {
            None => merged = Some(TermClause::any_of(clause.field, values)),
            Some(acc) => {
                if !acc.field.eq_ignore_ascii_case(&clause.field) {
                    return Err(unsupported("alternatives must use the same field"));
                }
                if let Condition::AnyOf(existing) = &mut acc.condition {
                    for value in values {
                        if !existing.contains(&value) {
                            existing.push(value);
                        }
                    }
                }
            }
        }
    }

    merged.ok_or_else(|| unsupported("empty alternative list"))
}

/// Validate a parsed term and convert it to a clause
fn lower_term(input: &str, term: &ParsedTerm) -> FilterResult<TermClause> {
    let (value, value_span) = &term.value;

    let Some((field, field_span)) = &term.field else {
        return Err(FilterParseError::new(
            input,
            value_span.start..value_span.end,
            FilterParseErrorKind::MissingField {
                value: value.unescaped(),
            },
        ));
    };

    if !FIELD_NAME.is_match(field) {
        return Err(FilterParseError::new(
            input,
            field_span.start..field_span.end,
            FilterParseErrorKind::InvalidFieldName {
                field: field.clone(),
            },
        ));
    }

    let empty_value = || {
        FilterParseError::new(
            input,
            value_span.start..value_span.end,
            FilterParseErrorKind::EmptyValue,
        )
    };

    match value {
        ParsedTermValue::Range(raw) => {
            parse_bracket_range(input, raw, *value_span).map(|r| TermClause::range(field, r))
        }
        ParsedTermValue::QuotedText(_) => {
            let text = value.unescaped();
            if text.is_empty() {
                return Err(empty_value());
            }
            Ok(TermClause::equals(field, text))
        }
        ParsedTermValue::Text(raw) => {
            if let Some(range) = parse_comparison(input, raw, *value_span) {
                return range.map(|r| TermClause::range(field, r));
            }
            let values: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect();
            if values.is_empty() {
                return Err(empty_value());
            }
            Ok(TermClause::any_of(field, values))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_filter_tree;
    use crate::term::{RangeBound, RangeCondition};
    use rstest::rstest;

    fn lower(input: &str) -> FilterResult<Vec<TermClause>> {
        let parsed = parse_filter_tree(input).expect("Parse failed");
        lower_filter(input, &parsed)
    }

    fn lower_err(input: &str) -> FilterParseErrorKind {
        lower(input).unwrap_err().kind
    }

    #[test]
    fn test_single_value() {
        let clauses = lower("color:red").unwrap();
        assert_eq!(clauses, vec![TermClause::equals("color", "red")]);
    }

    #[test]
    fn test_value_list() {
        let clauses = lower("color:red,blue,").unwrap();
        assert_eq!(clauses, vec![TermClause::any_of("color", ["red", "blue"])]);
    }

    #[test]
    fn test_quoted_value_keeps_comma() {
        let clauses = lower(r#"brand:"Smith, Jones""#).unwrap();
        assert_eq!(clauses, vec![TermClause::equals("brand", "Smith, Jones")]);
    }

    #[test]
    fn test_and_keeps_order() {
        let clauses = lower("color:red AND size:xl price:[1 TO 5]").unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].field, "color");
        assert_eq!(clauses[1].field, "size");
        assert_eq!(
            clauses[2],
            TermClause::range("price", RangeCondition::between("1", "5"))
        );
    }

    #[test]
    fn test_comparison_shorthand() {
        let clauses = lower("price:>10").unwrap();
        assert_eq!(
            clauses[0].condition,
            Condition::Range(RangeCondition {
                lower: Some(RangeBound::exclusive("10")),
                upper: None
            })
        );
    }

    #[rstest]
    #[case("NOT color:red")]
    #[case("!color:red")]
    #[case("NOT (color:red)")]
    fn test_negation(#[case] input: &str) {
        let clauses = lower(input).unwrap();
        assert_eq!(clauses, vec![TermClause::equals("color", "red").negate()]);
    }

    #[test]
    fn test_double_negation() {
        let clauses = lower("NOT NOT color:red").unwrap();
        assert!(!clauses[0].negated);
    }

    #[test]
    fn test_or_on_same_field_merges() {
        let clauses = lower("color:red OR color:blue OR color:red").unwrap();
        assert_eq!(clauses, vec![TermClause::any_of("color", ["red", "blue"])]);
    }

    #[test]
    fn test_negated_or_group() {
        let clauses = lower("NOT (color:red || color:blue)").unwrap();
        assert_eq!(clauses, vec![TermClause::any_of("color", ["red", "blue"]).negate()]);
    }

    #[rstest]
    #[case("color:red OR size:xl")]
    #[case("color:red OR NOT color:blue")]
    #[case("price:[1 TO 2] OR price:[5 TO 6]")]
    #[case("(color:red size:xl) OR color:blue")]
    fn test_unsupported_disjunction(#[case] input: &str) {
        assert!(matches!(
            lower_err(input),
            FilterParseErrorKind::UnsupportedDisjunction { .. }
        ));
    }

    #[test]
    fn test_negated_group_rejected() {
        assert_eq!(
            lower_err("NOT (color:red size:xl)"),
            FilterParseErrorKind::UnsupportedNegation
        );
    }

    #[test]
    fn test_bare_keyword_rejected() {
        let err = lower("shoes").unwrap_err();
        assert!(matches!(err.kind, FilterParseErrorKind::MissingField { ref value } if value == "shoes"));
        assert_eq!(err.fragment, "shoes");
    }

    #[rstest]
    #[case("1color:red")]
    #[case("co$lor:red")]
    fn test_invalid_field_name(#[case] input: &str) {
        assert!(matches!(
            lower_err(input),
            FilterParseErrorKind::InvalidFieldName { .. }
        ));
    }

    #[rstest]
    #[case(r#"color:"""#)]
    #[case("color:,,")]
    fn test_empty_value(#[case] input: &str) {
        assert_eq!(lower_err(input), FilterParseErrorKind::EmptyValue);
    }

    #[test]
    fn test_range_error_points_at_value() {
        let err = lower("price:[10 100]").unwrap_err();
        assert!(matches!(err.kind, FilterParseErrorKind::InvalidRange { .. }));
        assert_eq!(err.fragment, "[10 100]");
    }
}
