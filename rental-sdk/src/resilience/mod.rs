//! Resilience patterns for backing operations
//!
//! This module provides:
//! - Circuit breaker with rolling-window failure-rate tripping
//! - A process-wide breaker registry keyed by operation name
//! - A guarded invocation facade combining timeout and breaker

mod circuit_breaker;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitStatus, Rejected,
};

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FailureClass, GuardError};

/// Process-wide registry of circuit breakers, one per backing
/// operation name.
///
/// Created once at startup and shared across all requests, so a
/// tripped circuit stays tripped for every caller of that operation
/// until its cooldown has passed.
pub struct BreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
}

impl BreakerRegistry {
    /// Create an empty registry; breakers are created lazily with the
    /// given configuration the first time an operation is guarded.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: RwLock::new(HashMap::new()),
        }
    }

    /// Get the breaker for an operation, creating it on first use.
    pub fn breaker(&self, operation: &str) -> Arc<CircuitBreaker> {
        if let Some(breaker) = self.breakers.read().unwrap().get(operation) {
            return Arc::clone(breaker);
        }
        let mut breakers = self.breakers.write().unwrap();
        Arc::clone(
            breakers
                .entry(operation.to_string())
                .or_insert_with(|| Arc::new(CircuitBreaker::new(self.config.clone()))),
        )
    }

    /// Current status of every registered breaker.
    pub fn statuses(&self) -> Vec<(String, CircuitStatus)> {
        let breakers = self.breakers.read().unwrap();
        let mut statuses: Vec<_> = breakers
            .iter()
            .map(|(name, breaker)| (name.clone(), breaker.status()))
            .collect();
        statuses.sort_by(|a, b| a.0.cmp(&b.0));
        statuses
    }

    /// Forcibly close every registered breaker. Returns the number of
    /// breakers reset.
    pub fn reset_all(&self) -> usize {
        let breakers = self.breakers.read().unwrap();
        for breaker in breakers.values() {
            breaker.reset();
        }
        breakers.len()
    }
}

/// Guard configuration
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Deadline for a single guarded call
    pub timeout: Duration,

    /// Breaker configuration applied to every operation
    pub breaker: CircuitBreakerConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(15_000),
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

/// Guarded invocation facade.
///
/// Wraps a backing call with a deadline and per-operation circuit
/// breaking. A successful result passes through unmodified; failures
/// come back as [`GuardError`].
pub struct Guard {
    timeout: Duration,
    registry: BreakerRegistry,
}

impl Guard {
    /// Create a new guard with the specified configuration.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            timeout: config.timeout,
            registry: BreakerRegistry::new(config.breaker),
        }
    }

    /// The breaker registry backing this guard.
    pub fn registry(&self) -> &BreakerRegistry {
        &self.registry
    }

    /// Execute a backing operation under the guard.
    ///
    /// The circuit for `operation` is consulted first; when open the
    /// future is never polled. Otherwise the call runs under the
    /// configured timeout and its outcome is recorded on the breaker.
    /// Failures whose [`FailureClass::trips_breaker`] is false count
    /// as completed calls rather than breaker failures.
    pub async fn call<T, E, F>(&self, operation: &str, fut: F) -> Result<T, GuardError<E>>
    where
        E: std::error::Error + FailureClass + Send + Sync + 'static,
        F: Future<Output = Result<T, E>>,
    {
        let breaker = self.registry.breaker(operation);

        if let Err(rejected) = breaker.check() {
            let retry_in_ms = rejected.retry_in.as_millis() as u64;
            tracing::warn!(operation, retry_in_ms, "circuit open, rejecting call");
            return Err(GuardError::CircuitOpen {
                operation: operation.to_string(),
                retry_in_ms,
            });
        }

        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => {
                breaker.record_success();
                Ok(value)
            }
            Ok(Err(err)) => {
                if err.trips_breaker() {
                    breaker.record_failure();
                } else {
                    breaker.record_success();
                }
                Err(GuardError::Underlying(err))
            }
            Err(_elapsed) => {
                // The future is dropped here; a late result from the
                // backing operation can never be delivered.
                breaker.record_failure();
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::warn!(operation, timeout_ms, "guarded call timed out");
                Err(GuardError::Timeout {
                    operation: operation.to_string(),
                    timeout_ms,
                })
            }
        }
    }
}
