//! HTTP error classification
//!
//! Only the unknown-filter-tag domain error is surfaced to clients,
//! as a 400 with the error's message. Every other failure (timeout,
//! open circuit, store failure) collapses to an opaque 500; from the
//! outside those cases are indistinguishable, the distinction lives
//! in the logs and traces.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;
use rental_sdk::GuardError;

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Classified failure of a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested filter tag is not a known dimension.
    #[error("{0}")]
    TagNotFound(String),

    /// Guard or store failure, never detailed to the client.
    #[error(transparent)]
    Guard(GuardError<StoreError>),
}

impl ApiError {
    /// The status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::TagNotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Guard(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GuardError<StoreError>> for ApiError {
    fn from(err: GuardError<StoreError>) -> Self {
        match err {
            GuardError::Underlying(err @ StoreError::TagNotFound(_)) => {
                ApiError::TagNotFound(err.to_string())
            }
            other => ApiError::Guard(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::TagNotFound(message) => (StatusCode::BAD_REQUEST, ErrorBody { error: message }),
            ApiError::Guard(err) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal server error".to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
