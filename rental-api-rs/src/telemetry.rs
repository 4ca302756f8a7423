//! Per-request trace context
//!
//! A [`RequestTrace`] is created at request entry and threaded
//! explicitly through the guard into the backing store, so store
//! implementations can open child spans that nest under the request.
//! With no subscriber installed every span operation is a no-op;
//! tracing is best-effort and never fails a request.

use tracing::{field::Empty, Span};
use uuid::Uuid;

/// Correlation handle bound to one inbound request.
///
/// Owned by the handler that created it; everything else only borrows
/// it. The response status is recorded once known.
#[derive(Debug)]
pub struct RequestTrace {
    span: Span,
    request_id: Uuid,
    operation: &'static str,
}

impl RequestTrace {
    /// Create a trace handle for an inbound request.
    ///
    /// `operation` is the endpoint label (`"info"` or `"city"`).
    pub fn new(operation: &'static str, method: &str, path: &str) -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "request",
            operation,
            %request_id,
            http.method = %method,
            http.path = %path,
            http.status = Empty,
        );
        Self {
            span,
            request_id,
            operation,
        }
    }

    /// The request's span, for attaching nested spans.
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Record the response status once it is known.
    pub fn record_status(&self, status: u16) {
        self.span.record("http.status", u64::from(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_is_infallible_without_subscriber() {
        let trace = RequestTrace::new("info", "GET", "/info/company");
        assert_eq!(trace.operation(), "info");
        trace.record_status(200);
    }

    #[test]
    fn request_ids_are_unique() {
        let a = RequestTrace::new("city", "GET", "/usa/new-york");
        let b = RequestTrace::new("city", "GET", "/usa/new-york");
        assert_ne!(a.request_id(), b.request_id());
    }
}
