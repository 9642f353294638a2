//! Diagnostics: reportable problems found in a document.
//!
//! Structural issues from the symbol model and the engine's own lint checks
//! are expressed as [`Diagnostic`] values. None of them aborts analysis.

use std::sync::Arc;

use super::catalog::Catalog;
use super::modifiers::type_mismatches;
use crate::base::Span;
use crate::syntax::{
    ModifierRecord, ModifierStyle, Parameter, Symbol, SymbolId, SyntaxIssue, SyntaxIssueKind,
};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Range the diagnostic covers.
    pub span: Span,
    /// The symbol the diagnostic is attached to.
    pub symbol: Option<SymbolId>,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Optional related information.
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(severity: Severity, span: Span, message: impl Into<Arc<str>>) -> Self {
        Self {
            span,
            symbol: None,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, span, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, span, message)
    }

    pub fn info(span: Span, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, span, message)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the diagnostic to a symbol.
    pub fn with_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    /// Ordering key: position first, then severity, code and message.
    fn sort_key(&self) -> (u32, u32, Severity, Option<&str>, &str) {
        (
            self.span.start_offset(),
            self.span.end_offset(),
            self.severity,
            self.code.as_deref(),
            &*self.message,
        )
    }
}

/// Sort diagnostics by position and drop exact duplicates.
pub fn sort_diagnostics(diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    diagnostics.dedup();
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Structural errors (pairing, parameters, aliases)
/// - **W0001-W0099**: Warnings (modifier usage, parameters)
pub mod codes {
    /// Closing tag without an opening counterpart.
    pub const UNMATCHED_CLOSE: &str = "E0001";
    /// Tag that must be closed but never is.
    pub const UNCLOSED_TAG: &str = "E0002";
    /// Parameter without a value or with an unterminated value.
    pub const MALFORMED_PARAMETER: &str = "E0003";
    /// Alias that would make a scope reachable from itself.
    pub const CYCLIC_ALIAS: &str = "E0004";

    /// Shorthand and parameter-style modifiers on the same value.
    pub const MIXED_MODIFIER_STYLES: &str = "W0001";
    /// Modifier name not in the catalog.
    pub const UNKNOWN_MODIFIER: &str = "W0002";
    /// Modifier applied to a type it does not accept.
    pub const MODIFIER_TYPE_MISMATCH: &str = "W0003";
    /// Parameter not accepted by a registered tag.
    pub const UNKNOWN_PARAMETER: &str = "W0004";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Convert a structural issue from the symbol model.
    pub fn syntax_issue(&mut self, issue: &SyntaxIssue) {
        let code = match issue.kind {
            SyntaxIssueKind::UnmatchedClose => codes::UNMATCHED_CLOSE,
            SyntaxIssueKind::Unclosed => codes::UNCLOSED_TAG,
            SyntaxIssueKind::MalformedParameter => codes::MALFORMED_PARAMETER,
        };
        let mut diag = Diagnostic::error(issue.span, issue.message.as_str()).with_code(code);
        diag.symbol = issue.symbol;
        self.add(diag);
    }

    /// Add a cyclic alias error.
    pub fn cyclic_alias(&mut self, symbol: &Symbol, detail: &str) {
        self.add(
            Diagnostic::error(symbol.span, format!("cyclic alias: {detail}"))
                .with_code(codes::CYCLIC_ALIAS)
                .with_symbol(symbol.id),
        );
    }

    /// Add a mixed modifier styles warning.
    pub fn mixed_modifier_styles(&mut self, symbol: &Symbol) {
        let mut diag = Diagnostic::warning(
            symbol.span,
            format!(
                "'{}' mixes shorthand and parameter-style modifiers",
                symbol.adjusted_name
            ),
        )
        .with_code(codes::MIXED_MODIFIER_STYLES)
        .with_symbol(symbol.id);
        for record in symbol.modifiers.records() {
            diag = diag.with_related(RelatedInfo {
                span: record.name_span,
                message: Arc::from(format!("modifier '{}'", record.name)),
            });
        }
        self.add(diag);
    }

    /// Add an unknown modifier warning.
    pub fn unknown_modifier(&mut self, symbol: &Symbol, record: &ModifierRecord) {
        self.add(
            Diagnostic::warning(record.name_span, format!("unknown modifier: '{}'", record.name))
                .with_code(codes::UNKNOWN_MODIFIER)
                .with_symbol(symbol.id),
        );
    }

    /// Add a modifier input type warning.
    pub fn modifier_type_mismatch(&mut self, symbol: &Symbol, record: &ModifierRecord) {
        self.add(
            Diagnostic::warning(
                record.name_span,
                format!(
                    "modifier '{}' does not accept values of type '{}'",
                    record.name, record.input_type
                ),
            )
            .with_code(codes::MODIFIER_TYPE_MISMATCH)
            .with_symbol(symbol.id),
        );
    }

    /// Add an unknown parameter warning.
    pub fn unknown_parameter(&mut self, symbol: &Symbol, parameter: &Parameter) {
        self.add(
            Diagnostic::warning(
                parameter.name_span,
                format!(
                    "'{}' does not accept a parameter named '{}'",
                    symbol.runtime_name, parameter.name
                ),
            )
            .with_code(codes::UNKNOWN_PARAMETER)
            .with_symbol(symbol.id),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics attached to a symbol.
    pub fn diagnostics_for_symbol(&self, symbol: SymbolId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.symbol == Some(symbol))
            .collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Take all diagnostics sorted by position.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        sort_diagnostics(&mut self.diagnostics);
        self.diagnostics
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

// ============================================================================
// SYMBOL CHECKER
// ============================================================================

/// Lint checks run on one analysed symbol.
pub struct SymbolChecker<'a> {
    catalog: &'a Catalog,
    collector: DiagnosticCollector,
}

impl<'a> SymbolChecker<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            collector: DiagnosticCollector::new(),
        }
    }

    /// Check a single symbol.
    pub fn check_symbol(&mut self, symbol: &Symbol) {
        if symbol.is_comment || symbol.is_closing_tag {
            return;
        }
        self.check_modifiers(symbol);
        if symbol.is_tag {
            self.check_parameters(symbol);
        }
    }

    fn check_modifiers(&mut self, symbol: &Symbol) {
        let chain = &symbol.modifiers;
        if chain.has_mixed_styles() {
            self.collector.mixed_modifier_styles(symbol);
        }
        for record in chain.records() {
            let registered = self.catalog.has_modifier(&record.name);
            if record.style == ModifierStyle::Shorthand && !registered {
                self.collector.unknown_modifier(symbol, record);
            }
        }
        for record in type_mismatches(self.catalog, chain) {
            self.collector.modifier_type_mismatch(symbol, record);
        }
    }

    fn check_parameters(&mut self, symbol: &Symbol) {
        let Some(tag) = self.catalog.resolve_tag(symbol) else {
            return;
        };
        if tag.allows_any_parameter {
            return;
        }
        let accepted = tag.parameters_for(symbol);
        // A tag that declares nothing is not checked.
        if accepted.is_empty() {
            return;
        }
        for parameter in &symbol.parameters {
            if !accepted.iter().any(|p| p.matches(&parameter.name)) {
                self.collector.unknown_parameter(symbol, parameter);
            }
        }
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.collector.finish()
    }
}

/// Run every lint check on one symbol.
pub fn check_symbol(catalog: &Catalog, symbol: &Symbol) -> Vec<Diagnostic> {
    let mut checker = SymbolChecker::new(catalog);
    checker.check_symbol(symbol);
    checker.finish()
}
