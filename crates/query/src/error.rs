use std::fmt;
use std::ops::Range;

/// A filter expression that could not be turned into term clauses.
///
/// Carries the byte range and the offending fragment of the original input so
/// callers can point at the exact spot instead of returning "no results".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParseError {
    pub span: Range<usize>,
    pub fragment: String,
    pub kind: FilterParseErrorKind,
}

impl FilterParseError {
    pub fn new(input: &str, span: Range<usize>, kind: FilterParseErrorKind) -> Self {
        let fragment = input.get(span.clone()).unwrap_or(input).to_string();
        Self {
            span,
            fragment,
            kind,
        }
    }

    /// Get the byte range of the error in the original input
    pub fn range(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} near '{}' (at position {}..{})",
            self.kind, self.fragment, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for FilterParseError {}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterParseErrorKind {
    /// Input contains a character sequence the lexer does not accept
    Lex,
    Syntax { reason: String },
    /// A bare value without `field:`; free text belongs to the search phrase
    MissingField { value: String },
    InvalidFieldName { field: String },
    EmptyValue,
    InvalidRange { value: String, reason: String },
    UnsupportedDisjunction { reason: String },
    UnsupportedNegation,
}

impl fmt::Display for FilterParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterParseErrorKind::Lex => write!(f, "unexpected character"),
            FilterParseErrorKind::Syntax { reason } => write!(f, "syntax error: {}", reason),
            FilterParseErrorKind::MissingField { value } => {
                write!(f, "missing field for value '{}'", value)
            }
            FilterParseErrorKind::InvalidFieldName { field } => {
                write!(f, "invalid field name '{}'", field)
            }
            FilterParseErrorKind::EmptyValue => write!(f, "empty value"),
            FilterParseErrorKind::InvalidRange { value, reason } => {
                write!(f, "invalid range '{}': {}", value, reason)
            }
            FilterParseErrorKind::UnsupportedDisjunction { reason } => {
                write!(f, "unsupported OR: {}", reason)
            }
            FilterParseErrorKind::UnsupportedNegation => {
                write!(f, "NOT can only be applied to a single term")
            }
        }
    }
}

pub type FilterResult<T> = Result<T, FilterParseError>;
