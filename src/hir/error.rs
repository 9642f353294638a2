//! Errors raised by the scope store and by extension hooks.

use std::panic::{self, AssertUnwindSafe};

use smol_str::SmolStr;
use thiserror::Error;
use tracing::warn;

use crate::base::ScopeId;

/// Structurally invalid scope operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("alias '{alias}' would make a scope reachable from itself")]
    CyclicAlias { alias: SmolStr },

    #[error("unknown scope {0:?}")]
    UnknownScope(ScopeId),
}

/// Failure reported by (or on behalf of) an extension hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
    /// Scope operation that made the hook fail, if any.
    #[source]
    pub cause: Option<ScopeError>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::new(format!("hook panicked: {detail}"))
    }

    pub(crate) fn dangling(scope: ScopeId) -> Self {
        Self::new(format!("hook returned unknown scope {scope:?}"))
    }
}

impl From<ScopeError> for HookError {
    fn from(err: ScopeError) -> Self {
        Self {
            message: err.to_string(),
            cause: Some(err),
        }
    }
}

/// Run one hook call, turning a panic into an error. Failures are logged.
pub(crate) fn run_hook<T>(
    category: &str,
    subject: &str,
    hook: impl FnOnce() -> Result<T, HookError>,
) -> Result<T, HookError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(hook))
        .unwrap_or_else(|payload| Err(HookError::panicked(payload.as_ref())));
    if let Err(err) = &outcome {
        warn!(category, subject, error = %err, "extension hook failed");
    }
    outcome
}

/// Run one hook call, treating an error or a panic as "no contribution".
pub(crate) fn isolate_hook<T>(
    category: &str,
    subject: &str,
    hook: impl FnOnce() -> Result<T, HookError>,
) -> Option<T> {
    run_hook(category, subject, hook).ok()
}
