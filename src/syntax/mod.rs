//! Symbol model for Antlers documents.
//!
//! The upstream parser hands over one [`RawToken`] per `{{ ... }}` region.
//! This module turns them into [`Symbol`]s: it lexes tag content, extracts
//! parameters, interpolations and shorthand modifiers, and pairs openers with
//! closers.

mod content;
pub mod lexer;
mod modifiers;
mod pairing;
mod symbol;
mod table;

pub use modifiers::{ModifierArg, ModifierChain, ModifierRecord, ModifierStyle};
pub use pairing::{CloseRequirement, pair_symbols};
pub use symbol::{Parameter, RawToken, Symbol, SymbolId, VariableInterpolation};
pub use table::SymbolTable;

use crate::base::{LineIndex, Span, TextSize};

/// Kind of structural problem found while building symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxIssueKind {
    UnmatchedClose,
    Unclosed,
    MalformedParameter,
}

/// A structural problem attached to a symbol. Never aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub kind: SyntaxIssueKind,
    pub span: Span,
    pub symbol: Option<SymbolId>,
    pub message: String,
}

/// Split raw document text into `{{ ... }}` regions.
///
/// A minimal stand-in for the upstream parser: comments are `{{# ... #}}`,
/// everything else runs to the next `}}`. An unterminated region ends the scan.
pub fn scan_regions(text: &str) -> Vec<RawToken> {
    let lines = LineIndex::new(text);
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find("{{") {
        let start = cursor + found;
        let body_start = start + 2;
        let close = if text[body_start..].starts_with('#') {
            text[body_start..].find("#}}").map(|i| body_start + i + 1)
        } else {
            text[body_start..].find("}}").map(|i| body_start + i)
        };
        let Some(close) = close else { break };

        let content = &text[body_start..close];
        let start_line = lines.line_of(TextSize::from(start as u32));
        let end_line = lines.line_of(TextSize::from(close as u32 + 2));
        tokens.push(RawToken::new(content, start as u32, start_line, end_line));
        cursor = close + 2;
    }
    tokens
}
