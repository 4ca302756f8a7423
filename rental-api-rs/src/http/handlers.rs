//! HTTP handlers
//!
//! Each handler builds the request's trace handle, normalizes its
//! parameters, and calls the backing store through the guard. Success
//! passes the store's result through as the JSON body; failures are
//! classified in [`super::error`].

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use super::AppState;
use crate::filters::{normalize, RawFilterQuery};
use crate::store::CarRecord;
use crate::telemetry::RequestTrace;

/// Guard operation name for filter-list lookups.
pub const OP_GET_FILTER_LIST: &str = "get_filter_list";

/// Guard operation name for car lookups.
pub const OP_GET_CARS: &str = "get_cars";

/// GET /info/:tag
///
/// The set of valid values for one filter dimension.
pub async fn filter_values(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let trace = RequestTrace::new("info", "GET", &format!("/info/{tag}"));

    let result = state
        .guard
        .call(OP_GET_FILTER_LIST, state.store.filter_values(&tag, &trace))
        .await;

    finish(trace, result.map(Json))
}

/// GET /:country/:city
///
/// The cars in a country/city matching the composite filter. The path
/// parameters are free-form; validating them is the store's business.
pub async fn cars(
    State(state): State<AppState>,
    Path((country, city)): Path<(String, String)>,
    Query(raw): Query<RawFilterQuery>,
) -> Result<Json<Vec<CarRecord>>, ApiError> {
    let trace = RequestTrace::new("city", "GET", &format!("/{country}/{city}"));
    let criteria = normalize(&raw);

    let result = state
        .guard
        .call(
            OP_GET_CARS,
            state.store.cars(&country, &city, &criteria, &trace),
        )
        .await;

    // No domain-specific status mapping on this endpoint; every
    // failure goes down the generic error path.
    finish(trace, result.map(Json).map_err(ApiError::Guard))
}

/// Record the response status on the trace and classify failures.
fn finish<T, E>(trace: RequestTrace, result: Result<Json<T>, E>) -> Result<Json<T>, ApiError>
where
    E: Into<ApiError>,
{
    match result {
        Ok(body) => {
            trace.record_status(200);
            Ok(body)
        }
        Err(err) => {
            let err = err.into();
            trace.record_status(err.status().as_u16());
            Err(err)
        }
    }
}

/// GET /health
///
/// Liveness plus the current state of every registered breaker.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let breakers: std::collections::BTreeMap<String, String> = state
        .guard
        .registry()
        .statuses()
        .into_iter()
        .map(|(name, status)| (name, status.to_string()))
        .collect();

    let healthy = breakers.values().all(|status| status == "Closed");
    let status = if healthy { "SERVING" } else { "DEGRADED" };

    Json(HealthResponse {
        healthy,
        service_name: "rental-api".to_string(),
        uptime_seconds: super::uptime_seconds(),
        status: status.to_string(),
        breakers,
    })
}

/// GET / - Root endpoint
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "rental-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "GET /info/:tag",
            "GET /:country/:city",
        ]
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: i64,
    pub status: String,
    pub breakers: std::collections::BTreeMap<String, String>,
}
