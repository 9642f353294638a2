//! HIR layer tests
//!
//! Tests for the scope model:
//! - Scope building across paired tags and loops
//! - Variable resolution and shadowing
//! - Type inference through modifier chains
//! - Structural and lint diagnostics of a pass

pub mod tests_modifier_types;
pub mod tests_scope_resolution;
