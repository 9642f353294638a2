use super::content::{ParsedContent, PendingInterpolation, parse_content};
use super::modifiers::ModifierChain;
use super::symbol::{RawToken, Symbol, SymbolId, VariableInterpolation};
use super::{SyntaxIssue, SyntaxIssueKind};
use crate::base::{LineIndex, Span};

/// Arena of all symbols in one document, in document order.
///
/// Interpolation symbols are stored right after the symbol whose parameter
/// contains them.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    issues: Vec<SyntaxIssue>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build symbols from the upstream token stream.
    pub fn from_tokens(tokens: impl IntoIterator<Item = RawToken>, lines: &LineIndex) -> Self {
        let mut tokens: Vec<RawToken> = tokens.into_iter().collect();
        tokens.sort_by_key(|t| t.span.start_offset());

        let mut table = Self::new();
        for token in tokens {
            table.push_token(token, lines);
        }
        table
    }

    fn push_token(&mut self, token: RawToken, lines: &LineIndex) {
        let id = SymbolId::new(self.symbols.len());

        if token.is_comment {
            let mut symbol = Symbol::new(id, token.span, "");
            symbol.content = token.content;
            symbol.is_comment = true;
            self.symbols.push(symbol);
            return;
        }

        let parsed = parse_content(&token.content, token.content_start, lines);
        let mut symbol = Self::symbol_from_parsed(id, token.span, &token.content, &parsed);
        symbol.is_self_closing = token.is_self_closing;
        self.symbols.push(symbol);

        let ParsedContent {
            parameters, issues, ..
        } = parsed;
        self.issues.extend(issues.into_iter().map(|mut issue| {
            issue.symbol = Some(id);
            issue
        }));

        let mut finished = Vec::with_capacity(parameters.len());
        for parsed_param in parameters {
            let mut parameter = parsed_param.parameter;
            for pending in parsed_param.interpolations {
                let symbol = self.push_interpolation(id, &pending, lines);
                parameter.interpolations.push(VariableInterpolation {
                    parameter: parameter.name.clone(),
                    symbol,
                    text: pending.text,
                    span: pending.span,
                    value_span: parameter.value_span,
                });
            }
            finished.push(parameter);
        }
        self.symbols[id.index()].parameters = finished;
    }

    fn push_interpolation(
        &mut self,
        parent: SymbolId,
        pending: &PendingInterpolation,
        lines: &LineIndex,
    ) -> SymbolId {
        let id = SymbolId::new(self.symbols.len());
        let parsed = parse_content(&pending.inner, pending.inner_start, lines);
        let mut symbol = Self::symbol_from_parsed(id, pending.span, &pending.inner, &parsed);
        symbol.is_interpolation = true;
        symbol.interpolation_parent = Some(parent);
        self.issues.extend(parsed.issues.into_iter().map(|mut issue| {
            issue.symbol = Some(id);
            issue
        }));
        self.symbols.push(symbol);
        id
    }

    fn symbol_from_parsed(
        id: SymbolId,
        span: Span,
        content: &str,
        parsed: &ParsedContent,
    ) -> Symbol {
        let mut symbol = Symbol::new(id, span, parsed.head.clone());
        symbol.content = content.to_string();
        symbol.is_closing_tag = parsed.is_closing;
        symbol.modifiers = ModifierChain::new(parsed.modifiers.clone());
        symbol
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        (0..self.symbols.len()).map(SymbolId::new)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn issues(&self) -> &[SyntaxIssue] {
        &self.issues
    }

    /// Symbols whose span ends at or before the offset, in document order.
    pub fn symbols_before(&self, offset: u32) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .filter(|s| s.span.precedes(offset))
            .map(|s| s.id)
            .collect()
    }

    /// The innermost symbol whose span contains the offset.
    pub fn symbol_at(&self, offset: u32) -> Option<&Symbol> {
        self.symbols
            .iter()
            .filter(|s| s.span.contains(offset))
            .min_by_key(|s| s.span.len())
    }

    /// The last non-interpolation symbol that ends at or before the offset.
    pub fn last_before(&self, offset: u32) -> Option<&Symbol> {
        self.symbols
            .iter()
            .filter(|s| !s.is_interpolation && s.span.precedes(offset))
            .max_by_key(|s| s.span.end_offset())
    }

    pub fn opener_of(&self, closer: SymbolId) -> Option<&Symbol> {
        self.get(self.get(closer)?.belongs_to?)
    }

    pub fn closer_of(&self, opener: SymbolId) -> Option<&Symbol> {
        self.get(self.get(opener)?.is_closed_by?)
    }

    pub fn interpolations_of(&self, id: SymbolId) -> Vec<&VariableInterpolation> {
        self.get(id)
            .map(|s| s.interpolations().collect())
            .unwrap_or_default()
    }

    /// Record an issue against a symbol.
    pub(crate) fn report(&mut self, kind: SyntaxIssueKind, symbol: SymbolId, message: String) {
        let Some(span) = self.get(symbol).map(|s| s.span) else {
            return;
        };
        self.issues.push(SyntaxIssue {
            kind,
            span,
            symbol: Some(symbol),
            message,
        });
    }
}
