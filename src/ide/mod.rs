//! IDE features: completion, hover and diagnostics over an analysed document.
//!
//! This module sits between the scope model (HIR) and an editor integration.
//! Each request is answered against one published [`DocumentAnalysis`] pass.
//!
//! ## Design Principles
//!
//! 1. **Immutable snapshots**: handlers read a [`SuggestionRequest`], never the host
//! 2. **No LSP types**: uses our own types, converted at the LSP boundary
//! 3. **Isolated handlers**: a failing handler contributes nothing and stops nothing
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use antlers::ide::{AnalysisHost, CapabilityRegistry, register_defaults};
//!
//! let mut registry = CapabilityRegistry::new();
//! register_defaults(&mut registry);
//! let host = AnalysisHost::new(registry, Arc::new(EmptySchema), AnalysisConfig::default());
//! let doc = host.set_document("page.antlers.html", "{{ title }}", 1);
//!
//! let analysis = host.analysis();
//! let items = analysis.completions(doc, 1, 0, 4, &CancellationToken::new())?;
//! ```
//!
//! [`DocumentAnalysis`]: crate::hir::DocumentAnalysis

mod analysis;
mod builtin;
mod completion;
mod diagnostics;
mod hover;
mod registry;
mod request;
pub mod text_utils;

pub use analysis::{Analysis, AnalysisHost, DocumentId, RequestError};
pub use builtin::{
    lint_symbol, modifier_completions, modifier_hover, parameter_completions, register_defaults,
    tag_completions, tag_hover, variable_completions, variable_hover,
};
pub use completion::{CompletionItem, CompletionKind, CompletionResponse, merge_completions};
pub use diagnostics::{SymbolRequest, collect_diagnostics};
pub use hover::HoverResult;
pub use registry::{
    CapabilityRegistry, CompletionCategory, CompletionHandler, DiagnosticsHandler, HoverCategory,
    HoverHandler, TagCompletionProvider,
};
pub use request::SuggestionRequest;
pub use text_utils::extract_path_at_cursor;
