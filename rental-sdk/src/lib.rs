//! # Rental SDK
//!
//! Resilience primitives shared by the rental services.
//!
//! This crate provides:
//!
//! - A circuit breaker with rolling-window failure-rate tripping
//! - A guarded invocation facade (`Guard`) combining a call timeout
//!   with per-operation circuit breaking
//! - A process-wide breaker registry keyed by backing operation name
//! - The guard-level error taxonomy (`GuardError`)
//!
//! The crate is transport-agnostic: it knows nothing about HTTP,
//! status codes, or any particular backing store. Services wrap their
//! backing calls in [`Guard::call`] and classify the resulting
//! failures at their own boundary.

pub mod error;
pub mod resilience;

pub use error::{FailureClass, GuardError};
pub use resilience::{
    BreakerRegistry, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitStatus,
    Guard, GuardConfig,
};

#[cfg(test)]
mod tests;
