//! One synchronous analysis pass over a document.
//!
//! ```text
//! raw tokens → SymbolTable → pairing → scope walk → resolution → types
//!                                          │
//!                                          └─ augment hooks (isolated)
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};
use uuid::Uuid;

use super::catalog::{AugmentContext, Catalog};
use super::config::AnalysisConfig;
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::error::{HookError, ScopeError, run_hook};
use super::modifiers::extract_parameter_modifiers;
use super::schema::SchemaProvider;
use super::scope::ScopeArena;
use super::types::TypeInference;
use super::variable::ScopeVariable;
use crate::base::{LineIndex, RuntimeType, ScopeId};
use crate::syntax::{RawToken, Symbol, SymbolId, SymbolTable, pair_symbols, scan_regions};

/// Identifier of one analysis pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PassId(pub Uuid);

impl PassId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PassId {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one pass produced for one document version. Immutable once built.
#[derive(Clone, Debug)]
pub struct DocumentAnalysis {
    pub id: PassId,
    pub version: u64,
    pub text: Arc<str>,
    pub lines: LineIndex,
    pub symbols: SymbolTable,
    pub scopes: ScopeArena,
    pub root_scope: ScopeId,
    /// Structural diagnostics found while building (pairing, parameters, aliases).
    pub diagnostics: Vec<Diagnostic>,
    /// Scope each symbol is evaluated in, indexed by symbol id.
    entry_scopes: Vec<ScopeId>,
    /// Variable each symbol resolved to, indexed by symbol id.
    variables: Vec<Option<ScopeVariable>>,
}

impl DocumentAnalysis {
    /// Scope a symbol is evaluated in (before its own augmentation).
    pub fn entry_scope(&self, symbol: SymbolId) -> ScopeId {
        self.entry_scopes
            .get(symbol.index())
            .copied()
            .unwrap_or(self.root_scope)
    }

    /// Scope in effect at a byte offset.
    ///
    /// Inside a symbol this is the scope the symbol is evaluated in; between
    /// symbols it is the scope left by the last preceding symbol.
    pub fn scope_at(&self, offset: u32) -> ScopeId {
        if let Some(symbol) = self.symbols.symbol_at(offset) {
            let owner = symbol.interpolation_parent.unwrap_or(symbol.id);
            return self.entry_scope(owner);
        }
        self.symbols
            .last_before(offset)
            .and_then(|s| s.scope)
            .unwrap_or(self.root_scope)
    }

    /// Resolve a dotted path at a byte offset.
    pub fn find_reference(&self, offset: u32, path: &str) -> Option<ScopeVariable> {
        self.scopes.find_reference(self.scope_at(offset), path)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Variable a symbol resolved to in its entry scope.
    pub fn scope_variable(&self, id: SymbolId) -> Option<&ScopeVariable> {
        self.variables.get(id.index())?.as_ref()
    }
}

/// Runs analysis passes against one catalog, schema and configuration.
pub struct ScopeBuilder<'a> {
    catalog: &'a Catalog,
    schema: &'a dyn SchemaProvider,
    config: &'a AnalysisConfig,
}

impl<'a> ScopeBuilder<'a> {
    pub fn new(
        catalog: &'a Catalog,
        schema: &'a dyn SchemaProvider,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            catalog,
            schema,
            config,
        }
    }

    /// Split `text` into regions and analyse them.
    pub fn analyze(&self, text: &str, version: u64) -> DocumentAnalysis {
        self.analyze_tokens(text, scan_regions(text), version)
    }

    /// Analyse tokens produced by an upstream parser for `text`.
    pub fn analyze_tokens(
        &self,
        text: &str,
        tokens: impl IntoIterator<Item = RawToken>,
        version: u64,
    ) -> DocumentAnalysis {
        let lines = LineIndex::new(text);
        let mut symbols = SymbolTable::from_tokens(tokens, &lines);
        pair_symbols(&mut symbols, |s| self.catalog.close_requirement(s));

        let mut scopes = ScopeArena::new().with_max_path_depth(self.config.max_path_depth);
        let root_scope = scopes.new_root("document");
        if self.config.inject_globals {
            scopes.inject_fields(root_scope, self.schema.globals(), "*internal.globals", None);
        }

        let mut collector = DiagnosticCollector::new();
        for issue in symbols.issues() {
            collector.syntax_issue(issue);
        }

        let walk = self.walk(&symbols, &mut scopes, root_scope, &mut collector);
        let variables = self.resolve(&mut symbols, &scopes, &walk);

        let analysis = DocumentAnalysis {
            id: PassId::new(),
            version,
            text: Arc::from(text),
            lines,
            symbols,
            scopes,
            root_scope,
            diagnostics: collector.finish(),
            entry_scopes: walk.entry,
            variables,
        };
        debug!(
            pass = ?analysis.id,
            version,
            symbols = analysis.symbols.len(),
            scopes = analysis.scopes.len(),
            diagnostics = analysis.diagnostics.len(),
            "analysis pass finished"
        );
        analysis
    }

    /// Build scopes in document order. Returns the entry and exit scope of
    /// every symbol.
    fn walk(
        &self,
        symbols: &SymbolTable,
        scopes: &mut ScopeArena,
        root: ScopeId,
        collector: &mut DiagnosticCollector,
    ) -> Walk {
        let mut walk = Walk {
            entry: vec![root; symbols.len()],
            exit: vec![root; symbols.len()],
        };
        let mut current = root;
        // Paired opener → scope in effect before it.
        let mut saved: FxHashMap<SymbolId, ScopeId> = FxHashMap::default();

        for symbol in symbols.iter() {
            let index = symbol.id.index();

            if let Some(owner) = symbol.interpolation_parent {
                let scope = walk.entry.get(owner.index()).copied().unwrap_or(current);
                walk.entry[index] = scope;
                walk.exit[index] = scope;
                continue;
            }

            walk.entry[index] = current;
            if symbol.is_comment {
                walk.exit[index] = current;
                continue;
            }
            if symbol.is_closing_tag {
                if let Some(before) = symbol.belongs_to.and_then(|o| saved.remove(&o)) {
                    current = before;
                }
                walk.exit[index] = current;
                continue;
            }

            let next = self.augment(symbols, scopes, symbol, current, collector);
            if symbol.is_paired_opener() {
                saved.insert(symbol.id, current);
            }
            current = next;
            walk.exit[index] = current;
        }
        walk
    }

    /// Scope to use after `symbol`.
    fn augment(
        &self,
        symbols: &SymbolTable,
        scopes: &mut ScopeArena,
        symbol: &Symbol,
        current: ScopeId,
        collector: &mut DiagnosticCollector,
    ) -> ScopeId {
        let Some(tag) = self.catalog.resolve_tag(symbol) else {
            return self.implicit_body(scopes, symbol, current);
        };

        let mut scope = current;
        if tag.inject_parent_scope && symbol.is_paired_opener() {
            scope = scopes.make_named(scope, symbol.runtime_name.clone());
        }
        let Some(augmenter) = tag.augmenter() else {
            return scope;
        };

        let from = scope;
        let outcome = run_hook("augment_scope", &symbol.runtime_name, || {
            let mut ctx = AugmentContext {
                scopes: &mut *scopes,
                schema: self.schema,
                symbols,
            };
            let returned = augmenter.augment(&mut ctx, symbol, from)?;
            if ctx.scopes.contains(returned) {
                Ok(returned)
            } else {
                Err(HookError::dangling(returned))
            }
        });
        match outcome {
            Ok(returned) => {
                trace!(
                    symbol = symbol.id.0,
                    tag = %tag.name,
                    from = from.0,
                    to = returned.0,
                    "scope augmented"
                );
                returned
            }
            Err(err) => {
                if let Some(ScopeError::CyclicAlias { alias }) = &err.cause {
                    let detail = format!("'{alias}' refers back to its own scope");
                    collector.cyclic_alias(symbol, &detail);
                }
                from
            }
        }
    }

    /// Body scope of an unregistered paired opener (`{{ posts }}...{{ /posts }}`).
    fn implicit_body(&self, scopes: &mut ScopeArena, symbol: &Symbol, current: ScopeId) -> ScopeId {
        if !symbol.is_paired_opener() {
            return current;
        }
        let name = symbol.adjusted_name.as_str();
        let body = match scopes.lift_list(current, name) {
            Some(lifted) => lifted,
            None => {
                let body = scopes.make_named(current, name);
                if let Some(variable) = scopes.find_reference(current, name) {
                    scopes.merge_variable_scope(body, &variable);
                }
                body
            }
        };
        let is_loop = scopes
            .find_reference(current, name)
            .is_some_and(|v| v.data_type.is_array());
        if is_loop {
            scopes.add_variables(body, loop_variables(symbol.id));
        }
        body
    }

    /// Attach scopes and types to every symbol. Returns the variable each
    /// symbol resolved to, indexed by symbol id.
    fn resolve(
        &self,
        symbols: &mut SymbolTable,
        scopes: &ScopeArena,
        walk: &Walk,
    ) -> Vec<Option<ScopeVariable>> {
        let inference = TypeInference::new(self.catalog, self.schema);
        let mut variables = vec![None; symbols.len()];
        for id in symbols.ids() {
            let Some(symbol) = symbols.get_mut(id) else {
                continue;
            };
            symbol.scope = walk.exit.get(id.index()).copied();
            if symbol.is_comment {
                continue;
            }
            symbol.is_tag = !symbol.is_closing_tag && self.catalog.resolve_tag(symbol).is_some();
            let mut variable = None;
            if !symbol.is_tag && !symbol.is_closing_tag {
                extract_parameter_modifiers(self.catalog, symbol);
                let entry = walk.entry.get(id.index()).copied();
                variable = entry
                    .filter(|_| !symbol.adjusted_name.is_empty())
                    .and_then(|scope| scopes.find_reference(scope, &symbol.adjusted_name));
            }
            inference.annotate(symbol, variable.as_ref());
            variables[id.index()] = variable;
        }
        variables
    }
}

struct Walk {
    entry: Vec<ScopeId>,
    exit: Vec<ScopeId>,
}

/// Helper variables available inside a loop body.
fn loop_variables(symbol: SymbolId) -> Vec<ScopeVariable> {
    [
        ("count", RuntimeType::Number),
        ("index", RuntimeType::Number),
        ("first", RuntimeType::Boolean),
        ("last", RuntimeType::Boolean),
        ("total_results", RuntimeType::Number),
    ]
    .into_iter()
    .map(|(name, ty)| {
        ScopeVariable::internal(SmolStr::new_static(name), ty, "loop").introduced_by(symbol)
    })
    .collect()
}
