//! High-level IR (HIR): scopes, types and the tag/modifier catalog.
//!
//! One analysis pass turns a [`SymbolTable`](crate::syntax::SymbolTable) into a
//! [`DocumentAnalysis`]: every symbol gets the scope it is evaluated in, the
//! variable it resolves to and the type flowing out of its modifier chain.
//!
//! ## Key Types
//!
//! - [`ScopeArena`] / [`ScopeId`] - hierarchical, shadow-aware namespaces
//! - [`ScopeVariable`] - one binding visible in a scope
//! - [`Catalog`] - registered tags and modifiers
//! - [`TypeInference`] - assumed types from fields and modifier chains
//! - [`ScopeBuilder`] - runs one pass over a document
//!
//! ## Pass Layers
//!
//! ```text
//! SymbolTable            ← symbols, pairs, modifier records
//!     │
//!     ▼
//! scope walk             ← document order; tags augment, closers restore
//!     │
//!     ▼
//! resolution             ← scope_variable per symbol
//!     │
//!     ▼
//! type inference         ← source_type / manifest_type per symbol
//! ```

mod builder;
mod catalog;
mod config;
mod diagnostics;
mod error;
mod modifiers;
mod schema;
mod scope;
mod types;
mod variable;

pub use builder::{DocumentAnalysis, PassId, ScopeBuilder};
pub use catalog::{
    AugmentContext, CapabilityKind, Catalog, CloseResolver, ModifierDefinition,
    ParameterDefinition, ParameterResolver, ScopeAugmenter, TagCapability, TagDefinition,
};
pub use config::AnalysisConfig;
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, RelatedInfo, Severity, SymbolChecker, check_symbol, codes,
    sort_diagnostics,
};
pub use error::{HookError, ScopeError};
pub(crate) use error::{isolate_hook, run_hook};
pub use modifiers::{extract_parameter_modifiers, resolve_chain, type_mismatches};
pub use schema::{
    BlueprintField, EmptySchema, FieldSet, Fieldset, SchemaCategory, SchemaProvider, StaticSchema,
};
pub use scope::{AliasEntry, DEFAULT_MAX_PATH_DEPTH, ListEntry, Scope, ScopeArena};
pub use types::{AssumedType, TypeInference};

pub use crate::base::{RuntimeType, ScopeId};
pub use variable::{INTERNAL_SOURCE_PREFIX, ScopeVariable};
