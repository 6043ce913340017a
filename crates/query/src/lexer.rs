use logos::{Lexer, Logos};

/// Raw tokens used internally by logos
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\n\f]+")]
enum RawToken {
    #[token("AND")]
    #[token("&&")]
    And,

    #[token("OR")]
    #[token("||")]
    Or,

    #[token("NOT")]
    #[token("!")]
    Not,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r#""([^"\\]|\\.)*""#, quoted_text_inner_string)]
    QuotedText(String),

    #[regex(r#"[^ \t\n\f:"()!&|]+"#, |lex| lex.slice().to_string())]
    Text(String),
}

fn quoted_text_inner_string(lex: &mut Lexer<RawToken>) -> String {
    strip_quotes(lex.slice())
}

fn strip_quotes(slice: &str) -> String {
    slice
        .get(1..slice.len().saturating_sub(1))
        .unwrap_or_default()
        .to_string()
}

/// Value tokens - used after `:` where operators are treated as text.
///
/// A bracketed range keeps its inner whitespace, e.g. `[10 TO 100)`.
#[derive(Logos, Debug, PartialEq, Clone)]
enum ValueToken {
    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,

    #[regex(r"[\[(][^\])]*[\])]", priority = 10)]
    Range,

    #[regex(r#"[^ \t\n\f"()]+"#)]
    Text,

    #[regex(r"[ \t\n\f]+")]
    Whitespace,
}

/// The public token type
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    And,
    Or,
    Not,
    Colon,
    LParen,
    RParen,
    QuotedText(String),
    Text(String),
    /// Bracketed range value including its brackets
    Range(String),
}

/// A context-aware filter lexer
pub struct QueryLexer<'source> {
    lexer: Lexer<'source, RawToken>,
    after_colon: bool,
    current_span: std::ops::Range<usize>,
}

impl<'source> QueryLexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: RawToken::lexer(source),
            after_colon: false,
            current_span: 0..0,
        }
    }

    /// Get the span of the last yielded token
    pub fn span(&self) -> std::ops::Range<usize> {
        self.current_span.clone()
    }

    /// Get the slice of the last yielded token
    pub fn slice(&self) -> &'source str {
        &self.lexer.source()[self.current_span.clone()]
    }

    /// Returns an iterator that yields (Result<Token, ()>, Range<usize>)
    pub fn spanned(self) -> SpannedQueryLexer<'source> {
        SpannedQueryLexer { lexer: self }
    }

    fn next_value(&mut self) -> Option<Result<Token, ()>> {
        let mut value_lexer: Lexer<'source, ValueToken> = self.lexer.clone().morph();

        let token = match value_lexer.next()? {
            Ok(ValueToken::Quoted) => Ok(Token::QuotedText(strip_quotes(value_lexer.slice()))),
            Ok(ValueToken::Range) => Ok(Token::Range(value_lexer.slice().to_string())),
            Ok(ValueToken::Text) => Ok(Token::Text(value_lexer.slice().to_string())),
            Ok(ValueToken::Whitespace) => {
                // No value after colon, continue in normal mode
                self.lexer = value_lexer.morph();
                return self.next();
            }
            Err(_) => Err(()),
        };

        self.current_span = value_lexer.span();
        self.lexer = value_lexer.morph();
        Some(token)
    }
}

impl<'source> Iterator for QueryLexer<'source> {
    type Item = Result<Token, ()>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.after_colon {
            self.after_colon = false;
            return self.next_value();
        }

        let result = self.lexer.next()?;
        self.current_span = self.lexer.span();

        match result {
            Ok(RawToken::Colon) => {
                self.after_colon = true;
                Some(Ok(Token::Colon))
            }
            Ok(RawToken::And) => Some(Ok(Token::And)),
            Ok(RawToken::Or) => Some(Ok(Token::Or)),
            Ok(RawToken::Not) => Some(Ok(Token::Not)),
            Ok(RawToken::LParen) => Some(Ok(Token::LParen)),
            Ok(RawToken::RParen) => Some(Ok(Token::RParen)),
            Ok(RawToken::QuotedText(s)) => Some(Ok(Token::QuotedText(s))),
            Ok(RawToken::Text(s)) => Some(Ok(Token::Text(s))),
            Err(_) => Some(Err(())),
        }
    }
}

/// Iterator adapter that yields tokens with their spans
pub struct SpannedQueryLexer<'source> {
    lexer: QueryLexer<'source>,
}

impl<'source> Iterator for SpannedQueryLexer<'source> {
    type Item = (Result<Token, ()>, std::ops::Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lexer.next()?;
        let span = self.lexer.span();
        Some((token, span))
    }
}
