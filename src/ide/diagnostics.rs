//! Diagnostics dispatch.
//!
//! Every registered handler sees every symbol exactly once. Results are
//! unioned with the structural diagnostics of the pass; no handler can stop
//! another.

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::hir::{
    AnalysisConfig, Catalog, Diagnostic, DocumentAnalysis, isolate_hook, sort_diagnostics,
};
use crate::syntax::Symbol;

use super::analysis::RequestError;
use super::registry::CapabilityRegistry;

/// What a diagnostics handler gets for one symbol.
pub struct SymbolRequest<'a> {
    pub document: &'a DocumentAnalysis,
    pub catalog: &'a Catalog,
    pub config: &'a AnalysisConfig,
    pub symbol: &'a Symbol,
}

/// Structural diagnostics of `document` plus everything the registered
/// handlers report, sorted by position.
///
/// Symbols are checked in parallel once the document reaches
/// `config.parallel_diagnostics_threshold` symbols.
pub fn collect_diagnostics(
    registry: &CapabilityRegistry,
    document: &DocumentAnalysis,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> Result<Vec<Diagnostic>, RequestError> {
    let check = |symbol: &Symbol| -> Vec<Diagnostic> {
        if cancel.is_cancelled() {
            return Vec::new();
        }
        let request = SymbolRequest {
            document,
            catalog: registry.catalog(),
            config,
            symbol,
        };
        registry
            .diagnostics_handlers()
            .iter()
            .filter_map(|handler| {
                isolate_hook("diagnostics", &symbol.adjusted_name, || {
                    handler.check_symbol(&request)
                })
            })
            .flatten()
            .collect()
    };

    let symbols = document.symbols.symbols();
    let reported: Vec<Diagnostic> = if symbols.len() >= config.parallel_diagnostics_threshold {
        symbols.par_iter().flat_map_iter(check).collect()
    } else {
        symbols.iter().flat_map(check).collect()
    };
    if cancel.is_cancelled() {
        return Err(RequestError::Cancelled);
    }

    let mut diagnostics = document.diagnostics.clone();
    diagnostics.extend(reported);
    sort_diagnostics(&mut diagnostics);
    Ok(diagnostics)
}
