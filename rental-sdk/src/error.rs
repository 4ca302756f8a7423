//! Error types for guarded invocation
//!
//! Failures coming out of [`crate::Guard::call`] are one of three
//! kinds: the call ran out of time, the circuit refused it, or the
//! backing operation itself failed. The last kind carries the
//! operation's own error unmodified so callers can classify it.

use std::error::Error;

use thiserror::Error;

/// Classification hook the guard uses for breaker accounting.
///
/// A backing operation can fail in ways that say nothing about its
/// health (a lookup for a key that does not exist, for instance).
/// Such failures must not push the breaker towards tripping; they are
/// recorded as completed calls instead.
pub trait FailureClass {
    /// Whether this failure indicates an unhealthy backing operation.
    fn trips_breaker(&self) -> bool {
        true
    }
}

/// Failure of a guarded call.
#[derive(Debug, Error)]
pub enum GuardError<E>
where
    E: Error + Send + Sync + 'static,
{
    /// The backing operation did not settle within the configured
    /// deadline. Any late result is discarded, never delivered.
    #[error("operation `{operation}` timed out after {timeout_ms} ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// The circuit for this operation is open; the backing operation
    /// was not invoked.
    #[error("circuit open for `{operation}`, retry in {retry_in_ms} ms")]
    CircuitOpen { operation: String, retry_in_ms: u64 },

    /// The backing operation itself failed.
    #[error(transparent)]
    Underlying(#[from] E),
}

impl<E> GuardError<E>
where
    E: Error + Send + Sync + 'static,
{
    /// The wrapped backing-operation error, if this is one.
    pub fn underlying(&self) -> Option<&E> {
        match self {
            GuardError::Underlying(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the guard itself produced this failure (timeout or
    /// open circuit) rather than the backing operation.
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            GuardError::Timeout { .. } | GuardError::CircuitOpen { .. }
        )
    }
}
