use chumsky::{input::ValueInput, prelude::*};

use crate::error::{FilterParseError, FilterParseErrorKind};
use crate::{QueryLexer, lexer::Token};

pub type Span = SimpleSpan;
pub type Spanned<T> = (T, Span);

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFilter {
    /// A single filter term: `field:value` or a bare `value`
    Term(ParsedTerm),

    /// Logical And
    And(Vec<Spanned<ParsedFilter>>),

    /// Logical Or
    Or(Vec<Spanned<ParsedFilter>>),

    /// Logical Not
    Not(Box<Spanned<ParsedFilter>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTerm {
    pub field: Option<Spanned<String>>,
    pub value: Spanned<ParsedTermValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTermValue {
    /// Plain text e.g. `red,blue`
    Text(String),

    /// Quoted text (Not includes quotes) e.g. `dark \"navy\" blue`
    QuotedText(String),

    /// Bracketed range (includes brackets) e.g. `[10 TO 100)`
    Range(String),
}

impl ParsedTermValue {
    pub fn raw_str(&self) -> &str {
        match self {
            ParsedTermValue::Text(s) => s,
            ParsedTermValue::QuotedText(s) => s,
            ParsedTermValue::Range(s) => s,
        }
    }

    /// Return the string inside the value with escaped quotes interpretation for
    /// QuotedText. e.g. `a\"b` -> `a"b`.
    pub fn unescaped(&self) -> String {
        match self {
            ParsedTermValue::QuotedText(s) => s.replace(r#"\""#, r#"""#),
            other => other.raw_str().to_string(),
        }
    }
}

/// Parser for filter expressions
///
/// Grammar(lower to higher priority):
/// ```text
/// filter      := or_expr
/// or_expr     := and_expr (OR and_expr)*
/// and_expr    := not_expr ((AND)? not_expr)*
/// not_expr    := NOT* atom
/// atom        := term | '(' filter ')'
/// term        := (field ':')? value
/// value       := Text | QuotedText | Range
/// ```
pub fn parser<'tokens, I>()
-> impl Parser<'tokens, I, Spanned<ParsedFilter>, extra::Err<Rich<'tokens, Token>>>
where
    I: ValueInput<'tokens, Token = Token, Span = SimpleSpan>,
{
    recursive(|filter| {
        let field_with_span = select! { Token::Text(s) => s }.map_with(|s, e| (s, e.span()));

        let value_with_span = select! {
            Token::Text(s) => ParsedTermValue::Text(s),
            Token::QuotedText(s) => ParsedTermValue::QuotedText(s),
            Token::Range(s) => ParsedTermValue::Range(s),
        }
        .map_with(|v, e| (v, e.span()));

        let term = field_with_span
            .clone()
            .then(just(Token::Colon).ignore_then(value_with_span.clone()).or_not())
            .map(|(field_spanned, value_opt)| match value_opt {
                Some(value) => ParsedTerm {
                    field: Some(field_spanned),
                    value,
                },
                None => {
                    let (text, span) = field_spanned;
                    ParsedTerm {
                        field: None,
                        value: (ParsedTermValue::Text(text), span),
                    }
                }
            })
            .or(
                select! { Token::QuotedText(s) => ParsedTermValue::QuotedText(s) }.map_with(
                    |v, e| ParsedTerm {
                        field: None,
                        value: (v, e.span()),
                    },
                ),
            )
            .map(ParsedFilter::Term)
            .map_with(|q, e| (q, e.span()));

        let atom = term.or(filter
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen)));

        let not_expr = just(Token::Not).map_with(|_, e| e.span()).repeated().foldr(
            atom,
            |not_span: SimpleSpan, (q, q_span): Spanned<ParsedFilter>| {
                let combined_span = (not_span.start..q_span.end).into();
                (ParsedFilter::Not(Box::new((q, q_span))), combined_span)
            },
        );

        let and_expr = not_expr.clone().foldl(
            choice((
                just(Token::And).ignore_then(not_expr.clone()),
                not_expr.clone(),
            ))
            .repeated(),
            |lhs: Spanned<ParsedFilter>, rhs: Spanned<ParsedFilter>| {
                let span = (lhs.1.start..rhs.1.end).into();
                match lhs {
                    (ParsedFilter::And(mut v), _) => {
                        v.push(rhs);
                        (ParsedFilter::And(v), span)
                    }
                    _ => (ParsedFilter::And(vec![lhs, rhs]), span),
                }
            },
        );

        and_expr.clone().foldl(
            just(Token::Or).ignore_then(and_expr).repeated(),
            |lhs: Spanned<ParsedFilter>, rhs: Spanned<ParsedFilter>| {
                let span = (lhs.1.start..rhs.1.end).into();
                match lhs {
                    (ParsedFilter::Or(mut v), _) => {
                        v.push(rhs);
                        (ParsedFilter::Or(v), span)
                    }
                    _ => (ParsedFilter::Or(vec![lhs, rhs]), span),
                }
            },
        )
    })
}

/// Tokenize and parse a filter expression into its syntax tree.
///
/// Lexer failures are reported before the parser runs, so a stray character
/// never reaches chumsky as a bogus token.
pub fn parse_filter_tree(input: &str) -> Result<Spanned<ParsedFilter>, FilterParseError> {
    use chumsky::input::Stream;

    let mut tokens = Vec::new();
    for (token, span) in QueryLexer::new(input).spanned() {
        match token {
            Ok(token) => tokens.push((token, SimpleSpan::from(span))),
            Err(()) => {
                return Err(FilterParseError::new(input, span, FilterParseErrorKind::Lex));
            }
        }
    }

    let token_stream =
        Stream::from_iter(tokens.into_iter()).map((0..input.len()).into(), |(t, s): (_, _)| (t, s));

    parser().parse(token_stream).into_result().map_err(|errors| {
        // chumsky reports the furthest failure first
        match errors.first() {
            Some(e) => {
                let span = e.span();
                FilterParseError::new(
                    input,
                    span.start..span.end,
                    FilterParseErrorKind::Syntax {
                        reason: format!("{:?}", e.reason()),
                    },
                )
            }
            None => FilterParseError::new(
                input,
                0..input.len(),
                FilterParseErrorKind::Syntax {
                    reason: "unrecognized input".to_string(),
                },
            ),
        }
    })
}
