//! Foundation types for the Antlers analysis engine.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Span`] - Symbol ranges (lines and offsets)
//! - [`ScopeId`] - Scope arena index
//! - [`RuntimeType`] - Value types shared by symbols and scopes
//!
//! This module has NO dependencies on other antlers modules.

mod position;
mod runtime_type;
mod scope_id;
mod span;

pub use position::Span;
pub use runtime_type::RuntimeType;
pub use scope_id::ScopeId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
