//! # antlers-base
//!
//! Scope and symbol resolution for Antlers templates: which variables are in
//! scope at a caret, what type they carry, and what an editor should offer or
//! report there.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Capability registry, completion, hover, diagnostics, AnalysisHost
//!   ↓
//! hir       → Catalog, scope arena, type inference, scope builder
//!   ↓
//! syntax    → Symbols, parameters, modifier chains, tag pairing
//!   ↓
//! base      → Primitives (TextRange, LineIndex, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → hir → ide)
// ============================================================================

/// Foundation types: TextRange, LineIndex, Span
pub mod base;

/// Syntax: symbols extracted from `{{ ... }}` regions and their pairing
pub mod syntax;

/// Semantic model: catalog, scopes, types, per-document analysis
pub mod hir;

/// IDE features: completion, hover, diagnostics
pub mod ide;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Span, TextRange, TextSize};
