//! HTTP surface of the rental API
//!
//! Wires the axum router: the two dataset endpoints, health, and the
//! root listing, behind a permissive CORS layer and a request body
//! limit. All shared state lives in [`AppState`].

pub mod error;
pub mod handlers;

pub use error::{ApiError, ErrorBody};

use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use once_cell::sync::Lazy;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::store::CarStore;
use rental_sdk::Guard;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing store for the car-rental dataset
    pub store: Arc<dyn CarStore>,
    /// Guarded invoker shared by every request
    pub guard: Arc<Guard>,
}

impl AppState {
    pub fn new(store: Arc<dyn CarStore>, guard: Arc<Guard>) -> Self {
        Self { store, guard }
    }
}

/// Seconds since the process started serving.
pub(crate) fn uptime_seconds() -> i64 {
    START_TIME.elapsed().as_secs() as i64
}

/// Create the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    // Permissive CORS, the API is read-only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/info/:tag", get(handlers::filter_values))
        .route("/:country/:city", get(handlers::cars))
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(cors)
        .with_state(state)
}
