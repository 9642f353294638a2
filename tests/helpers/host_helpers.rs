//! Helpers for setting up analysis hosts and locating carets.

use std::sync::Arc;

use antlers::hir::{AnalysisConfig, DocumentAnalysis, ScopeBuilder, SchemaProvider};
use antlers::ide::{AnalysisHost, CapabilityRegistry, CompletionResponse, DocumentId};
use antlers::{LineIndex, TextSize};

use super::blog_fixtures::{BLOG_SCHEMA, blog_catalog, blog_registry};

pub const PATH: &str = "page.antlers.html";

pub fn blog_schema() -> Arc<dyn SchemaProvider> {
    BLOG_SCHEMA.clone()
}

/// A host with the blog registry and one document at version 1.
pub fn blog_host(text: &str) -> (AnalysisHost, DocumentId) {
    host_with(blog_registry(), text)
}

pub fn host_with(registry: CapabilityRegistry, text: &str) -> (AnalysisHost, DocumentId) {
    let host = AnalysisHost::new(registry, blog_schema(), AnalysisConfig::default());
    let id = host.set_document(PATH, text, 1);
    (host, id)
}

/// Analyse `text` against the blog catalog and schema.
pub fn analyze(text: &str) -> DocumentAnalysis {
    let catalog = blog_catalog();
    let config = AnalysisConfig::default();
    ScopeBuilder::new(&catalog, &**BLOG_SCHEMA, &config).analyze(text, 1)
}

/// Line and column of the caret placed `delta` chars after `needle` starts.
pub fn caret(text: &str, needle: &str, delta: usize) -> (u32, u32) {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not in {text:?}"));
    let offset = TextSize::from((start + delta) as u32);
    let position = LineIndex::new(text).line_col(text, offset);
    (position.line, position.col)
}

pub fn labels(response: &CompletionResponse) -> Vec<&str> {
    response.items.iter().map(|item| &*item.label).collect()
}
