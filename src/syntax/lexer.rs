//! Logos-based lexer for the text between `{{` and `}}`.
//!
//! Tag content is small, so the lexer keeps every token (including
//! whitespace) and the content parser decides what is significant.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position relative to the content start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Kinds of tokens inside tag content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Ident,
    Number,
    String,
    UnterminatedString,
    Dot,
    Colon,
    Pipe,
    Eq,
    Slash,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Other,
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        self == TokenKind::Whitespace
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::from(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"'([^'\\]|\\.)*'"#)]
    String,

    #[regex(r#""([^"\\]|\\.)*"#)]
    #[regex(r#"'([^'\\]|\\.)*"#)]
    UnterminatedString,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    #[token("=")]
    Eq,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[regex(r"[!?<>+*%&,;#@\[\]~^$\-]")]
    Other,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => TokenKind::Whitespace,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::Number => TokenKind::Number,
            LogosToken::String => TokenKind::String,
            LogosToken::UnterminatedString => TokenKind::UnterminatedString,
            LogosToken::Dot => TokenKind::Dot,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Pipe => TokenKind::Pipe,
            LogosToken::Eq => TokenKind::Eq,
            LogosToken::Slash => TokenKind::Slash,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
            LogosToken::Other => TokenKind::Other,
        }
    }
}

/// Strip the surrounding quotes from a string token.
pub fn unquote(text: &str) -> &str {
    let inner = text
        .strip_prefix('"')
        .or_else(|| text.strip_prefix('\''))
        .unwrap_or(text);
    inner
        .strip_suffix('"')
        .or_else(|| inner.strip_suffix('\''))
        .unwrap_or(inner)
}
