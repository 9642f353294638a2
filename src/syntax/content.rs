//! Parser for the text inside one `{{ ... }}` region.
//!
//! Only the parts the engine needs are recognised: the head, `name="value"`
//! parameters (with `{interpolations}` in their values) and a trailing
//! shorthand modifier chain. Anything else (expressions, operators) is skipped.

use smol_str::SmolStr;

use super::lexer::{Token, TokenKind, tokenize, unquote};
use super::modifiers::{ModifierArg, ModifierRecord, ModifierStyle};
use super::symbol::Parameter;
use super::{SyntaxIssue, SyntaxIssueKind};
use crate::base::{LineIndex, Span, TextSize};

/// An interpolation found in a parameter value, before it gets a symbol id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingInterpolation {
    pub text: SmolStr,
    /// Span including the braces.
    pub span: Span,
    /// Absolute offset of the text between the braces.
    pub inner_start: u32,
    pub inner: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedParameter {
    pub parameter: Parameter,
    pub interpolations: Vec<PendingInterpolation>,
}

/// Everything recognised in one content string.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedContent {
    pub is_closing: bool,
    /// Head as written, including the closing slash.
    pub head: SmolStr,
    pub parameters: Vec<ParsedParameter>,
    pub modifiers: Vec<ModifierRecord>,
    pub issues: Vec<SyntaxIssue>,
}

/// Parse `content`, whose first byte sits at absolute offset `base`.
pub(crate) fn parse_content(content: &str, base: u32, lines: &LineIndex) -> ParsedContent {
    let tokens = tokenize(content);
    let mut parser = ContentParser {
        content,
        tokens,
        pos: 0,
        base,
        lines,
        out: ParsedContent::default(),
    };
    parser.parse();
    parser.out
}

struct ContentParser<'a, 'l> {
    content: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    base: u32,
    lines: &'l LineIndex,
    out: ParsedContent,
}

impl<'a> ContentParser<'a, '_> {
    fn parse(&mut self) {
        self.skip_trivia();
        if self.at(TokenKind::Slash) {
            self.out.is_closing = true;
            self.pos += 1;
        }
        self.parse_head();

        while let Some(token) = self.peek_significant() {
            match token.kind {
                TokenKind::Pipe => {
                    self.skip_trivia();
                    self.pos += 1;
                    self.parse_shorthand_modifier();
                }
                TokenKind::Colon if self.nth_kind(1) == Some(TokenKind::Ident) => {
                    self.skip_trivia();
                    self.pos += 1;
                    self.parse_parameter(true);
                }
                TokenKind::Ident if self.next_significant_after(0) == Some(TokenKind::Eq) => {
                    self.skip_trivia();
                    self.parse_parameter(false);
                }
                _ => {
                    self.skip_trivia();
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_head(&mut self) {
        self.skip_trivia();
        let start = self.pos;
        while let Some(token) = self.tokens.get(self.pos) {
            match token.kind {
                TokenKind::Ident | TokenKind::Colon | TokenKind::Dot | TokenKind::Number => {
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let head = if start < self.pos {
            let from = usize::from(self.tokens[start].offset);
            let to = usize::from(self.tokens[self.pos - 1].end());
            &self.content[from..to]
        } else {
            ""
        };
        // `{{ nav:main: }}` leaves a dangling colon that is not part of the name.
        let head = head.trim_end_matches(':');
        self.out.head = if self.out.is_closing {
            SmolStr::from(format!("/{head}"))
        } else {
            SmolStr::from(head)
        };
    }

    fn parse_parameter(&mut self, is_variable_reference: bool) {
        let Some(name_tok) = self.bump() else { return };
        let name_span = self.span(name_tok.offset, name_tok.end());
        let name = SmolStr::from(name_tok.text);
        let param_start = if is_variable_reference {
            name_tok.offset - TextSize::from(1)
        } else {
            name_tok.offset
        };

        self.skip_trivia();
        if !self.at(TokenKind::Eq) {
            return;
        }
        let eq_end = self.tokens[self.pos].end();
        self.pos += 1;
        self.skip_trivia();

        let value_tok = self.tokens.get(self.pos).copied();
        match value_tok {
            Some(tok) if tok.kind == TokenKind::String => {
                self.pos += 1;
                let value = unquote(tok.text);
                let value_start = tok.offset + TextSize::from(1);
                let value_end = value_start + TextSize::of(value);
                let value_span = self.span(value_start, value_end);
                let interpolations = self.scan_interpolations(value, value_start);
                self.out.parameters.push(ParsedParameter {
                    parameter: Parameter {
                        name,
                        value: value.to_string(),
                        is_variable_reference,
                        is_modifier: false,
                        span: self.span(param_start, tok.end()),
                        name_span,
                        value_span,
                        interpolations: Vec::new(),
                    },
                    interpolations,
                });
            }
            Some(tok) if tok.kind == TokenKind::UnterminatedString => {
                self.pos += 1;
                self.issue(
                    param_start,
                    tok.end(),
                    format!("unterminated value for parameter '{name}'"),
                );
            }
            _ => {
                self.issue(param_start, eq_end, format!("parameter '{name}' has no value"));
            }
        }
    }

    fn parse_shorthand_modifier(&mut self) {
        self.skip_trivia();
        let Some(name_tok) = self.tokens.get(self.pos).copied() else {
            return;
        };
        if name_tok.kind != TokenKind::Ident {
            return;
        }
        self.pos += 1;
        let mut record = ModifierRecord::new(
            name_tok.text,
            ModifierStyle::Shorthand,
            self.span(name_tok.offset, name_tok.end()),
        );

        while self.at(TokenKind::Colon) {
            self.pos += 1;
            let Some(arg) = self.parse_modifier_arg() else {
                break;
            };
            record = record.with_arg(arg);
        }
        self.out.modifiers.push(record);
    }

    fn parse_modifier_arg(&mut self) -> Option<ModifierArg> {
        let first = self.tokens.get(self.pos).copied()?;
        match first.kind {
            TokenKind::String => {
                self.pos += 1;
                Some(ModifierArg {
                    text: unquote(first.text).into(),
                    span: self.span(first.offset, first.end()),
                })
            }
            TokenKind::Ident | TokenKind::Number => {
                let mut end = first.end();
                self.pos += 1;
                while self.at(TokenKind::Dot)
                    && matches!(
                        self.nth_raw_kind(1),
                        Some(TokenKind::Ident | TokenKind::Number)
                    )
                {
                    end = self.tokens[self.pos + 1].end();
                    self.pos += 2;
                }
                let text = &self.content[usize::from(first.offset)..usize::from(end)];
                Some(ModifierArg {
                    text: text.into(),
                    span: self.span(first.offset, end),
                })
            }
            _ => None,
        }
    }

    fn scan_interpolations(&self, value: &str, value_start: TextSize) -> Vec<PendingInterpolation> {
        let mut found = Vec::new();
        let bytes = value.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'{' {
                i += 1;
                continue;
            }
            let Some(close) = value[i + 1..].find(['}', '{']) else {
                break;
            };
            let close = i + 1 + close;
            if bytes[close] == b'{' {
                // Nested opener; restart from it.
                i = close;
                continue;
            }
            let inner = &value[i + 1..close];
            let start = value_start + TextSize::from(i as u32);
            let end = value_start + TextSize::from(close as u32 + 1);
            found.push(PendingInterpolation {
                text: inner.trim().into(),
                span: self.span(start, end),
                inner_start: u32::from(start) + 1,
                inner: inner.to_string(),
            });
            i = close + 1;
        }
        found
    }

    fn issue(&mut self, start: TextSize, end: TextSize, message: String) {
        let span = self.span(start, end);
        self.out.issues.push(SyntaxIssue {
            kind: SyntaxIssueKind::MalformedParameter,
            span,
            symbol: None,
            message,
        });
    }

    fn span(&self, start: TextSize, end: TextSize) -> Span {
        let start = self.base + u32::from(start);
        let end = self.base + u32::from(end);
        Span::new(
            self.lines.line_of(TextSize::from(start)),
            start,
            self.lines.line_of(TextSize::from(end)),
            end,
        )
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos).map(|t| t.kind) == Some(kind)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(token)
    }

    fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).is_some_and(|t| t.kind.is_trivia()) {
            self.pos += 1;
        }
    }

    fn peek_significant(&self) -> Option<Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .copied()
    }

    /// Kind of the n-th token after the next significant one, without skipping trivia.
    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        let first = self.tokens[self.pos..]
            .iter()
            .position(|t| !t.kind.is_trivia())?;
        self.tokens.get(self.pos + first + n).map(|t| t.kind)
    }

    fn nth_raw_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Kind of the next significant token after skipping `n` significant ones.
    fn next_significant_after(&self, n: usize) -> Option<TokenKind> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n + 1)
            .map(|t| t.kind)
    }
}
