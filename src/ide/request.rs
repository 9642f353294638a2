//! Immutable caret snapshot handed to completion and hover handlers.

use std::sync::Arc;

use crate::base::{LineCol, TextSize};
use crate::hir::{
    AnalysisConfig, Catalog, DocumentAnalysis, SchemaProvider, ScopeArena, ScopeId, ScopeVariable,
    TagDefinition,
};
use crate::syntax::{ModifierRecord, Parameter, Symbol, VariableInterpolation};

use super::text_utils::{
    char_after, char_before, is_path_character, preceded_by, word_after, word_before,
};

/// Everything a handler may know about one caret position.
///
/// Built once per request; handlers only read it.
pub struct SuggestionRequest<'a> {
    pub document: &'a DocumentAnalysis,
    pub catalog: &'a Catalog,
    pub schema: &'a dyn SchemaProvider,
    pub config: &'a AnalysisConfig,
    /// Byte offset of the caret.
    pub offset: u32,
    pub position: LineCol,
    pub left_char: Option<char>,
    pub right_char: Option<char>,
    /// Text left of the caret up to whitespace.
    pub left_word: &'a str,
    /// Text right of the caret up to whitespace.
    pub right_word: &'a str,
    /// Like `left_word`, also stopping at a parameter separator.
    pub left_meaningful_word: &'a str,
    pub right_meaningful_word: &'a str,
    /// The tag or variable region the caret falls in (never an interpolation).
    pub symbol: Option<&'a Symbol>,
    /// Symbols that end at or before the caret, in document order.
    pub preceding_symbols: Vec<&'a Symbol>,
    pub parameter: Option<&'a Parameter>,
    pub interpolation: Option<&'a VariableInterpolation>,
    pub is_inside_tag: bool,
    pub is_inside_interpolation: bool,
    /// Scope in effect at the caret.
    pub scope: ScopeId,
}

impl<'a> SuggestionRequest<'a> {
    pub fn new(
        document: &'a DocumentAnalysis,
        catalog: &'a Catalog,
        schema: &'a dyn SchemaProvider,
        config: &'a AnalysisConfig,
        offset: u32,
    ) -> Self {
        let text: &'a str = &document.text;
        let caret = offset as usize;
        let separator = |c: char| config.is_parameter_separator(c);

        let innermost = document.symbols.symbol_at(offset);
        let owner = innermost.and_then(|s| match s.interpolation_parent {
            Some(parent) => document.symbols.get(parent),
            None => Some(s),
        });
        let interpolation = innermost
            .filter(|s| s.is_interpolation)
            .zip(owner)
            .and_then(|(inner, owner)| owner.interpolations().find(|i| i.symbol == inner.id));
        let parameter = owner.and_then(|s| {
            s.parameters
                .iter()
                .find(|p| p.span.contains_inclusive(offset))
        });
        let is_inside_tag = owner.is_some_and(|s| {
            !s.is_comment
                && offset >= s.span.start_offset() + 2
                && offset + 2 <= s.span.end_offset()
        });

        Self {
            document,
            catalog,
            schema,
            config,
            offset,
            position: document.lines.line_col(text, TextSize::from(offset)),
            left_char: char_before(text, caret),
            right_char: char_after(text, caret),
            left_word: word_before(text, caret, |_| false),
            right_word: word_after(text, caret, |_| false),
            left_meaningful_word: word_before(text, caret, separator),
            right_meaningful_word: word_after(text, caret, separator),
            symbol: owner,
            preceding_symbols: document
                .symbols
                .iter()
                .filter(|s| s.span.precedes(offset))
                .collect(),
            parameter,
            interpolation,
            is_inside_tag,
            is_inside_interpolation: interpolation.is_some(),
            scope: document.scope_at(offset),
        }
    }

    pub fn text(&self) -> &'a str {
        &self.document.text
    }

    pub fn scopes(&self) -> &'a ScopeArena {
        &self.document.scopes
    }

    /// Registered tag the caret is in.
    pub fn tag(&self) -> Option<&'a Arc<TagDefinition>> {
        let catalog: &'a Catalog = self.catalog;
        self.symbol.and_then(|s| catalog.resolve_tag(s))
    }

    /// Modifier record under the caret.
    pub fn modifier(&self) -> Option<&'a ModifierRecord> {
        self.symbol?.modifiers.record_at(self.offset)
    }

    pub fn find_reference(&self, path: &str) -> Option<ScopeVariable> {
        self.scopes().find_reference(self.scope, path)
    }

    pub fn visible_variables(&self) -> Vec<ScopeVariable> {
        self.scopes().visible_variables(self.scope)
    }

    /// The caret follows a `|`, possibly with a partial modifier name typed.
    pub fn is_modifier_position(&self) -> bool {
        self.is_inside_tag
            && !self.is_inside_interpolation
            && preceded_by(self.text(), self.offset as usize, '|')
    }

    /// The caret is still within the tag name (`{{ colle| }}`).
    pub fn is_head_position(&self) -> bool {
        let Some(symbol) = self.symbol.filter(|_| self.is_inside_tag) else {
            return false;
        };
        let start = symbol.span.start_offset() as usize + 2;
        let typed = self
            .text()
            .get(start..self.offset as usize)
            .unwrap_or_default()
            .trim_start();
        let typed = typed.strip_prefix('/').unwrap_or(typed);
        !typed.contains(|c: char| c.is_whitespace() || c == '|' || c == '=')
    }

    /// Dotted path being typed left of the caret (`page.auth`).
    pub fn path_before(&self) -> &'a str {
        word_before(self.text(), self.offset as usize, |c| !is_path_character(c))
    }
}
