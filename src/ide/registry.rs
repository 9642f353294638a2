//! Capability registry: the catalog plus hover, completion and diagnostics
//! handler chains.
//!
//! A registry is built during initialization and shared read-only (behind an
//! `Arc`) by every request of an analysis session.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::hir::{Catalog, Diagnostic, HookError, ModifierDefinition, TagDefinition, isolate_hook};

use super::analysis::RequestError;
use super::completion::{CompletionItem, CompletionResponse, merge_completions};
use super::diagnostics::SymbolRequest;
use super::hover::HoverResult;
use super::request::SuggestionRequest;

// ============================================================================
// HANDLER TRAITS
// ============================================================================

pub trait HoverHandler: Send + Sync {
    fn hover(&self, request: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError>;
}

impl<F> HoverHandler for F
where
    F: Fn(&SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> + Send + Sync,
{
    fn hover(&self, request: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
        self(request)
    }
}

pub trait CompletionHandler: Send + Sync {
    fn complete(&self, request: &SuggestionRequest<'_>) -> Result<CompletionResponse, HookError>;
}

impl<F> CompletionHandler for F
where
    F: Fn(&SuggestionRequest<'_>) -> Result<CompletionResponse, HookError> + Send + Sync,
{
    fn complete(&self, request: &SuggestionRequest<'_>) -> Result<CompletionResponse, HookError> {
        self(request)
    }
}

/// Contributes completions while the caret is inside one tag.
pub trait TagCompletionProvider: Send + Sync {
    fn completions(&self, request: &SuggestionRequest<'_>)
    -> Result<Vec<CompletionItem>, HookError>;
}

impl<F> TagCompletionProvider for F
where
    F: Fn(&SuggestionRequest<'_>) -> Result<Vec<CompletionItem>, HookError> + Send + Sync,
{
    fn completions(
        &self,
        request: &SuggestionRequest<'_>,
    ) -> Result<Vec<CompletionItem>, HookError> {
        self(request)
    }
}

/// Checks one symbol at a time.
pub trait DiagnosticsHandler: Send + Sync {
    fn check_symbol(&self, request: &SymbolRequest<'_>) -> Result<Vec<Diagnostic>, HookError>;
}

impl<F> DiagnosticsHandler for F
where
    F: Fn(&SymbolRequest<'_>) -> Result<Vec<Diagnostic>, HookError> + Send + Sync,
{
    fn check_symbol(&self, request: &SymbolRequest<'_>) -> Result<Vec<Diagnostic>, HookError> {
        self(request)
    }
}

// ============================================================================
// CATEGORIES
// ============================================================================

/// Hover hook categories, in dispatch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoverCategory {
    Modifier,
    Tag,
    ScopeVariable,
    General,
}

impl HoverCategory {
    pub const ALL: [HoverCategory; 4] = [
        HoverCategory::Modifier,
        HoverCategory::Tag,
        HoverCategory::ScopeVariable,
        HoverCategory::General,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HoverCategory::Modifier => "modifier_hover",
            HoverCategory::Tag => "tag_hover",
            HoverCategory::ScopeVariable => "scope_variable_hover",
            HoverCategory::General => "general_hover",
        }
    }
}

/// Completion hook categories, in dispatch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionCategory {
    Modifier,
    Parameter,
    Tag,
    General,
}

impl CompletionCategory {
    pub const ALL: [CompletionCategory; 4] = [
        CompletionCategory::Modifier,
        CompletionCategory::Parameter,
        CompletionCategory::Tag,
        CompletionCategory::General,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionCategory::Modifier => "modifier_completion",
            CompletionCategory::Parameter => "parameter_completion",
            CompletionCategory::Tag => "tag_completion",
            CompletionCategory::General => "general_completion",
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Tags, modifiers and handler chains for one analysis session.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    catalog: Catalog,
    hover: [Vec<Arc<dyn HoverHandler>>; 4],
    completion: [Vec<Arc<dyn CompletionHandler>>; 4],
    tag_completions: IndexMap<SmolStr, Vec<Arc<dyn TagCompletionProvider>>>,
    diagnostics: Vec<Arc<dyn DiagnosticsHandler>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    // ------------------------------------------------------------------
    // Tags and modifiers
    // ------------------------------------------------------------------

    pub fn register_tag(&mut self, tag: TagDefinition) {
        self.catalog.register_tag(tag);
    }

    pub fn register_tags(&mut self, tags: impl IntoIterator<Item = TagDefinition>) {
        self.catalog.register_tags(tags);
    }

    /// Register a plain tag by name and parameter names.
    pub fn register_tag_shorthand(&mut self, name: &str, parameters: &[&str]) {
        self.catalog.register_tag_shorthand(name, parameters);
    }

    pub fn register_modifier(&mut self, modifier: ModifierDefinition) {
        self.catalog.register_modifier(modifier);
    }

    pub fn register_modifiers(&mut self, modifiers: impl IntoIterator<Item = ModifierDefinition>) {
        self.catalog.register_modifiers(modifiers);
    }

    /// Register a modifier by name and accepted/returned type names.
    pub fn register_modifier_shorthand(&mut self, name: &str, accepts: &[&str], returns: &str) {
        self.catalog.register_modifier_shorthand(name, accepts, returns);
    }

    // ------------------------------------------------------------------
    // Handler chains
    // ------------------------------------------------------------------

    /// Replace the chain of a hover category with one handler, or clear it.
    pub fn set_hover_handler(
        &mut self,
        category: HoverCategory,
        handler: Option<Arc<dyn HoverHandler>>,
    ) {
        self.hover[category.index()] = handler.into_iter().collect();
    }

    /// Append a handler to a hover category.
    pub fn add_hover_handler(
        &mut self,
        category: HoverCategory,
        handler: impl HoverHandler + 'static,
    ) {
        self.hover[category.index()].push(Arc::new(handler));
    }

    pub fn hover_handlers(&self, category: HoverCategory) -> &[Arc<dyn HoverHandler>] {
        &self.hover[category.index()]
    }

    /// Replace the chain of a completion category with one handler, or clear it.
    pub fn set_completion_handler(
        &mut self,
        category: CompletionCategory,
        handler: Option<Arc<dyn CompletionHandler>>,
    ) {
        self.completion[category.index()] = handler.into_iter().collect();
    }

    /// Append a handler to a completion category.
    pub fn add_completion_handler(
        &mut self,
        category: CompletionCategory,
        handler: impl CompletionHandler + 'static,
    ) {
        self.completion[category.index()].push(Arc::new(handler));
    }

    pub fn completion_handlers(
        &self,
        category: CompletionCategory,
    ) -> &[Arc<dyn CompletionHandler>] {
        &self.completion[category.index()]
    }

    /// Attach a completion provider to a tag, keyed by the tag's name.
    pub fn add_tag_completion_provider(
        &mut self,
        tag: &str,
        provider: impl TagCompletionProvider + 'static,
    ) {
        self.tag_completions
            .entry(SmolStr::new(tag))
            .or_default()
            .push(Arc::new(provider));
    }

    pub fn tag_completion_providers(&self, tag: &str) -> &[Arc<dyn TagCompletionProvider>] {
        self.tag_completions
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn register_diagnostics_handler(&mut self, handler: impl DiagnosticsHandler + 'static) {
        self.diagnostics.push(Arc::new(handler));
    }

    pub fn diagnostics_handlers(&self) -> &[Arc<dyn DiagnosticsHandler>] {
        &self.diagnostics
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Run the completion chains in order.
    ///
    /// Modifier handlers come first, then completions contributed by the tag
    /// under the caret, then parameter, tag and general handlers. Results are
    /// concatenated until a response marked exclusive; later handlers are not
    /// called. A failing handler contributes nothing.
    pub fn complete(
        &self,
        request: &SuggestionRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<CompletionResponse, RequestError> {
        let subject = request
            .symbol
            .map(|s| s.adjusted_name.as_str())
            .unwrap_or_default();

        let mut responses = Vec::new();
        'dispatch: {
            for handler in self.completion_handlers(CompletionCategory::Modifier) {
                let call = || handler.complete(request);
                if collect(&mut responses, cancel, "modifier_completion", subject, call)? {
                    break 'dispatch;
                }
            }
            if let Some(tag) = request.tag() {
                for provider in self.tag_completion_providers(&tag.name) {
                    let call = || provider.completions(request).map(CompletionResponse::new);
                    let category = "tag_completion_provider";
                    if collect(&mut responses, cancel, category, &tag.name, call)? {
                        break 'dispatch;
                    }
                }
            }
            for category in &CompletionCategory::ALL[1..] {
                for handler in self.completion_handlers(*category) {
                    let call = || handler.complete(request);
                    if collect(&mut responses, cancel, category.as_str(), subject, call)? {
                        break 'dispatch;
                    }
                }
            }
        }
        if cancel.is_cancelled() {
            return Err(RequestError::Cancelled);
        }
        Ok(merge_completions(responses))
    }

    /// Run the hover chains in order; the first handler returning a result wins.
    pub fn hover(
        &self,
        request: &SuggestionRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<Option<HoverResult>, RequestError> {
        let subject = request
            .symbol
            .map(|s| s.adjusted_name.as_str())
            .unwrap_or_default();
        for category in HoverCategory::ALL {
            for handler in self.hover_handlers(category) {
                if cancel.is_cancelled() {
                    return Err(RequestError::Cancelled);
                }
                let result = isolate_hook(category.as_str(), subject, || handler.hover(request));
                if let Some(Some(hover)) = result {
                    return Ok(Some(hover));
                }
            }
        }
        Ok(None)
    }
}

/// Run one completion call and keep its response. Returns whether the
/// response was exclusive.
fn collect(
    responses: &mut Vec<CompletionResponse>,
    cancel: &CancellationToken,
    category: &str,
    subject: &str,
    call: impl FnOnce() -> Result<CompletionResponse, HookError>,
) -> Result<bool, RequestError> {
    if cancel.is_cancelled() {
        return Err(RequestError::Cancelled);
    }
    let Some(response) = isolate_hook(category, subject, call) else {
        return Ok(false);
    };
    let exclusive = response.is_exclusive_result;
    responses.push(response);
    Ok(exclusive)
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("catalog", &self.catalog)
            .field("hover", &self.hover.iter().map(Vec::len).collect::<Vec<_>>())
            .field(
                "completion",
                &self.completion.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field(
                "tag_completions",
                &self
                    .tag_completions
                    .iter()
                    .map(|(name, providers)| (name, providers.len()))
                    .collect::<Vec<_>>(),
            )
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}
