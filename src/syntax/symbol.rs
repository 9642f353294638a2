use smol_str::SmolStr;

use super::modifiers::ModifierChain;
use crate::base::{RuntimeType, ScopeId, Span};

/// Unique identifier for a symbol within one analysis pass.
///
/// Ids index into the [`SymbolTable`](super::SymbolTable) arena and are not
/// stable across reparses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One tokenized `{{ ... }}` region handed over by the upstream parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// Text between the braces, untrimmed.
    pub content: String,
    /// Span of the whole region including the braces.
    pub span: Span,
    /// Absolute byte offset where `content` begins.
    pub content_start: u32,
    pub is_comment: bool,
    /// `{{ tag /}}` style.
    pub is_self_closing: bool,
}

impl RawToken {
    /// Build a token for a `{{ content }}` region starting at `start`.
    ///
    /// Assumes the region is written as `{{` + content + `}}` and that the
    /// caller has already worked out the lines it spans.
    pub fn new(content: impl Into<String>, start: u32, start_line: u32, end_line: u32) -> Self {
        let content = content.into();
        let trimmed = content.trim_end();
        let is_self_closing = trimmed.ends_with('/') && !trimmed.trim_start().starts_with('/');
        let is_comment = content.starts_with('#');
        let end = start + 4 + content.len() as u32;
        Self {
            span: Span::new(start_line, start, end_line, end),
            content_start: start + 2,
            content,
            is_comment,
            is_self_closing,
        }
    }
}

/// A `{value}` reference inside a parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInterpolation {
    /// The parameter whose value contains this interpolation.
    pub parameter: SmolStr,
    /// The interpolation symbol created for the inner text.
    pub symbol: SymbolId,
    /// Text between the braces.
    pub text: SmolStr,
    /// Span including the braces.
    pub span: Span,
    /// Span of the full parameter value this interpolation sits in.
    pub value_span: Span,
}

/// A `name="value"` pair on a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: SmolStr,
    /// Value without quotes.
    pub value: String,
    /// `:name="value"` binds the value to a variable instead of a literal.
    pub is_variable_reference: bool,
    /// Set during analysis when the name is a registered modifier applied to a variable.
    pub is_modifier: bool,
    pub span: Span,
    pub name_span: Span,
    /// Span of the value without its quotes.
    pub value_span: Span,
    pub interpolations: Vec<VariableInterpolation>,
}

impl Parameter {
    pub fn has_interpolations(&self) -> bool {
        !self.interpolations.is_empty()
    }
}

/// One parsed construct with its position, classification, links and
/// analysis annotations.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub span: Span,
    /// Raw text between the braces.
    pub content: String,

    /// Head as written, including a leading `/` on closers.
    pub name: SmolStr,
    /// Head without the closing slash.
    pub adjusted_name: SmolStr,
    /// Qualified name used for registry lookups; closers take their opener's.
    pub runtime_name: SmolStr,
    /// Part of the head before the first `:`.
    pub tag_name: SmolStr,
    /// Part of the head after the first `:`.
    pub method_name: Option<SmolStr>,

    pub is_comment: bool,
    pub is_closing_tag: bool,
    pub is_self_closing: bool,
    pub is_interpolation: bool,
    /// For interpolation symbols, the symbol whose parameter holds them.
    pub interpolation_parent: Option<SymbolId>,

    /// Opening counterpart (set on closers).
    pub belongs_to: Option<SymbolId>,
    /// Closing counterpart (set on openers).
    pub is_closed_by: Option<SymbolId>,

    pub parameters: Vec<Parameter>,
    pub modifiers: ModifierChain,

    /// Matched a registered tag during analysis.
    pub is_tag: bool,
    /// Scope active for this symbol (for openers: the body scope).
    pub scope: Option<ScopeId>,
    pub source_type: RuntimeType,
    pub manifest_type: RuntimeType,
}

impl Symbol {
    /// Create an unlinked, unannotated symbol.
    pub fn new(id: SymbolId, span: Span, name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        let adjusted: SmolStr = name.trim_start_matches('/').into();
        let (tag_name, method_name) = split_head(&adjusted);
        Self {
            id,
            span,
            content: String::new(),
            is_closing_tag: name.starts_with('/'),
            runtime_name: adjusted.clone(),
            adjusted_name: adjusted,
            name,
            tag_name,
            method_name,
            is_comment: false,
            is_self_closing: false,
            is_interpolation: false,
            interpolation_parent: None,
            belongs_to: None,
            is_closed_by: None,
            parameters: Vec::new(),
            modifiers: ModifierChain::default(),
            is_tag: false,
            scope: None,
            source_type: RuntimeType::Unknown,
            manifest_type: RuntimeType::Unknown,
        }
    }

    /// Whether this symbol may open a pair.
    pub fn can_open(&self) -> bool {
        !self.is_closing_tag
            && !self.is_comment
            && !self.is_self_closing
            && !self.is_interpolation
            && !self.adjusted_name.is_empty()
    }

    /// Whether this symbol is an opener with a matched closer.
    pub fn is_paired_opener(&self) -> bool {
        self.is_closed_by.is_some()
    }

    /// Names of all parameters in source order.
    pub fn parameter_names(&self) -> Vec<SmolStr> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// All interpolations across parameters.
    pub fn interpolations(&self) -> impl Iterator<Item = &VariableInterpolation> {
        self.parameters.iter().flat_map(|p| p.interpolations.iter())
    }

    /// Segments of a dotted variable path (`page.author.name`).
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.adjusted_name.split('.').filter(|s| !s.is_empty())
    }
}

/// Split a tag head into the tag name and an optional method name.
pub(crate) fn split_head(head: &str) -> (SmolStr, Option<SmolStr>) {
    match head.split_once(':') {
        Some((tag, method)) if !method.is_empty() => (tag.into(), Some(method.into())),
        Some((tag, _)) => (tag.into(), None),
        None => (head.into(), None),
    }
}
