use crate::error::{FilterParseError, FilterParseErrorKind, FilterResult};
use crate::parser::Span;
use crate::term::{RangeBound, RangeCondition};

/// Parse a bracketed range such as `[10 TO 100)`, `(a TO b]`, `[10 TO]` or
/// `[* TO 5]`. Square brackets are inclusive, parentheses exclusive.
pub fn parse_bracket_range(input: &str, value: &str, span: Span) -> FilterResult<RangeCondition> {
    let invalid = |reason: &str| {
        FilterParseError::new(
            input,
            span.start..span.end,
            FilterParseErrorKind::InvalidRange {
                value: value.to_string(),
                reason: reason.to_string(),
            },
        )
    };

    let lower_inclusive = match value.chars().next() {
        Some('[') => true,
        Some('(') => false,
        _ => return Err(invalid("range must start with '[' or '('")),
    };
    let upper_inclusive = match value.chars().last() {
        Some(']') => true,
        Some(')') => false,
        _ => return Err(invalid("range must end with ']' or ')'")),
    };

    let inner = value.get(1..value.len().saturating_sub(1)).unwrap_or_default();
    let (lower, upper) = split_on_to(inner).ok_or_else(|| invalid("missing 'TO'"))?;

    let lower = bound(lower, lower_inclusive);
    let upper = bound(upper, upper_inclusive);

    if lower.is_none() && upper.is_none() {
        return Err(invalid("at least one bound is required"));
    }

    if let (Some(lo), Some(hi)) = (&lower, &upper) {
        if let (Ok(lo), Ok(hi)) = (lo.value.parse::<f64>(), hi.value.parse::<f64>()) {
            if lo > hi {
                return Err(invalid("lower bound is greater than upper bound"));
            }
        }
    }

    Ok(RangeCondition { lower, upper })
}

/// Parse a comparison shorthand: `>10`, `>=10`, `<10`, `<=10`.
///
/// Returns `None` when the value does not start with a comparison operator.
pub fn parse_comparison(
    input: &str,
    value: &str,
    span: Span,
) -> Option<FilterResult<RangeCondition>> {
    let (rest, inclusive, is_lower) = if let Some(rest) = value.strip_prefix(">=") {
        (rest, true, true)
    } else if let Some(rest) = value.strip_prefix("<=") {
        (rest, true, false)
    } else if let Some(rest) = value.strip_prefix('>') {
        (rest, false, true)
    } else if let Some(rest) = value.strip_prefix('<') {
        (rest, false, false)
    } else {
        return None;
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Some(Err(FilterParseError::new(
            input,
            span.start..span.end,
            FilterParseErrorKind::InvalidRange {
                value: value.to_string(),
                reason: "missing value after comparison".to_string(),
            },
        )));
    }

    let bound = RangeBound {
        value: rest.to_string(),
        inclusive,
    };
    let range = if is_lower {
        RangeCondition {
            lower: Some(bound),
            upper: None,
        }
    } else {
        RangeCondition {
            lower: None,
            upper: Some(bound),
        }
    };
    Some(Ok(range))
}

fn split_on_to(inner: &str) -> Option<(&str, &str)> {
    let words: Vec<&str> = inner.split_whitespace().collect();
    let position = words.iter().position(|w| w.eq_ignore_ascii_case("TO"))?;
    if words.iter().filter(|w| w.eq_ignore_ascii_case("TO")).count() != 1 || position > 1 {
        return None;
    }
    let lower = words.get(..position).and_then(|w| w.first()).copied().unwrap_or("");
    let upper_words = &words[position + 1..];
    if upper_words.len() > 1 {
        return None;
    }
    let upper = upper_words.first().copied().unwrap_or("");
    Some((lower, upper))
}

fn bound(value: &str, inclusive: bool) -> Option<RangeBound> {
    let value = value.trim();
    if value.is_empty() || value == "*" {
        None
    } else {
        Some(RangeBound {
            value: value.to_string(),
            inclusive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn span(len: usize) -> Span {
        (0..len).into()
    }

    fn range(value: &str) -> FilterResult<RangeCondition> {
        parse_bracket_range(value, value, span(value.len()))
    }

    #[test]
    fn test_inclusive_range() {
        let r = range("[10 TO 100]").unwrap();
        assert_eq!(r, RangeCondition::between("10", "100"));
    }

    #[test]
    fn test_mixed_brackets() {
        let r = range("[10 TO 100)").unwrap();
        assert_eq!(r.lower, Some(RangeBound::inclusive("10")));
        assert_eq!(r.upper, Some(RangeBound::exclusive("100")));
    }

    #[rstest]
    #[case("[10 TO]")]
    #[case("[10 TO *]")]
    #[case("[10 to ]")]
    fn test_open_upper(#[case] value: &str) {
        let r = range(value).unwrap();
        assert_eq!(r, RangeCondition::at_least("10"));
    }

    #[rstest]
    #[case("[TO 5]")]
    #[case("[* TO 5]")]
    fn test_open_lower(#[case] value: &str) {
        let r = range(value).unwrap();
        assert_eq!(r, RangeCondition::at_most("5"));
    }

    #[rstest]
    #[case("[10 100]")]
    #[case("[TO]")]
    #[case("[* TO *]")]
    #[case("[100 TO 10]")]
    #[case("[1 TO 2 TO 3]")]
    #[case("[a b TO c]")]
    fn test_invalid_ranges(#[case] value: &str) {
        let err = range(value).unwrap_err();
        assert!(matches!(err.kind, FilterParseErrorKind::InvalidRange { .. }));
    }

    #[rstest]
    #[case(">10", RangeCondition { lower: Some(RangeBound::exclusive("10")), upper: None })]
    #[case(">=10", RangeCondition::at_least("10"))]
    #[case("<10", RangeCondition { lower: None, upper: Some(RangeBound::exclusive("10")) })]
    #[case("<=10", RangeCondition::at_most("10"))]
    fn test_comparisons(#[case] value: &str, #[case] expected: RangeCondition) {
        let r = parse_comparison(value, value, span(value.len())).unwrap().unwrap();
        assert_eq!(r, expected);
    }

    #[test]
    fn test_not_a_comparison() {
        assert!(parse_comparison("red", "red", span(3)).is_none());
    }

    #[test]
    fn test_comparison_without_value() {
        let err = parse_comparison(">=", ">=", span(2)).unwrap().unwrap_err();
        assert!(matches!(err.kind, FilterParseErrorKind::InvalidRange { .. }));
    }
}
