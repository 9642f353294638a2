//! Syntax layer tests
//!
//! Tests for the symbol model:
//! - Region scanning and symbol extraction
//! - Parameters, interpolations and modifier chains
//! - Open/close pairing

pub mod tests_pairing;
pub mod tests_symbols;
