//! IDE feature tests
//!
//! Tests for:
//! - Completion dispatch and exclusivity
//! - Hover dispatch
//! - Diagnostics union
//! - Document versions and cancellation

pub mod tests_completion;
pub mod tests_diagnostics;
pub mod tests_host;
pub mod tests_hover;
