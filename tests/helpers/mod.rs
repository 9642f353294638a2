//! Shared fixtures for the integration tests.

pub mod blog_fixtures;
pub mod host_helpers;
