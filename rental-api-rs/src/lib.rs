//! # Rental API
//!
//! Read-only HTTP API over the car-rental dataset.
//!
//! Two endpoints are exposed: one returning the set of valid values
//! for a named filter dimension, one returning the cars matching a
//! composite filter for a country/city pair. Every backing lookup
//! runs through the guarded invoker from `rental-sdk`, so a slow or
//! failing store trips a shared circuit breaker instead of cascading
//! into the rest of the service.
//!
//! ## Architecture
//!
//! - `filters` — normalization of raw query parameters into typed
//!   filter criteria
//! - `telemetry` — per-request trace handle threaded into the store
//! - `store` — the backing-store trait and the in-memory dataset
//! - `http` — axum router, handlers, and error classification
//! - `config` — environment-driven service configuration

pub mod config;
pub mod filters;
pub mod http;
pub mod store;
pub mod telemetry;

pub use config::ServiceConfig;
pub use filters::{normalize, FilterCriteria, RawFilterQuery};
pub use http::{router, AppState};
pub use store::{CarRecord, CarStore, MemoryStore, StoreError};
pub use telemetry::RequestTrace;
