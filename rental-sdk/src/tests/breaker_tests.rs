//! Tests for the circuit breaker state machine

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitStatus};

    fn config(window: usize, min_samples: usize, cooldown_ms: u64) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            window_size: window,
            min_samples,
            failure_rate_threshold: 0.5,
            cooldown: Duration::from_millis(cooldown_ms),
        }
    }

    #[test]
    fn circuit_closed_initially() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        assert_eq!(cb.status(), CircuitStatus::Closed);
        assert!(cb.check().is_ok());
    }

    #[test]
    fn circuit_opens_when_failure_rate_reached() {
        let cb = CircuitBreaker::new(config(4, 3, 30_000));

        cb.record_failure();
        cb.record_success();
        assert_eq!(cb.status(), CircuitStatus::Closed);

        // Third outcome: 2 failures out of 3 is above the 50% threshold
        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Open);

        let rejected = cb.check().unwrap_err();
        assert!(rejected.retry_in > Duration::ZERO);
    }

    #[test]
    fn circuit_stays_closed_below_min_samples() {
        let cb = CircuitBreaker::new(config(10, 5, 30_000));

        // 100% failure rate but not enough samples yet
        cb.record_failure();
        cb.record_failure();
        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Closed);

        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Open);
    }

    #[test]
    fn window_evicts_old_outcomes() {
        let cb = CircuitBreaker::new(config(3, 3, 30_000));

        // Two early failures scroll out of the window before the
        // later successes could combine with them into a trip.
        cb.record_failure();
        cb.record_success();
        cb.record_success();
        cb.record_success();
        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Closed);

        let metrics = cb.metrics();
        assert_eq!(metrics.window_len, 3);
        assert_eq!(metrics.window_failures, 1);
    }

    #[test]
    fn single_probe_after_cooldown() {
        let cb = CircuitBreaker::new(config(2, 2, 50));

        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Open);
        assert!(cb.check().is_err());

        std::thread::sleep(Duration::from_millis(80));

        // Exactly one probe is admitted
        assert!(cb.check().is_ok());
        assert_eq!(cb.status(), CircuitStatus::HalfOpen);
        assert!(cb.check().is_err());
    }

    #[test]
    fn probe_success_closes_circuit() {
        let cb = CircuitBreaker::new(config(2, 2, 50));

        cb.record_failure();
        cb.record_failure();
        std::thread::sleep(Duration::from_millis(80));
        assert!(cb.check().is_ok());

        cb.record_success();
        assert_eq!(cb.status(), CircuitStatus::Closed);
        assert!(cb.check().is_ok());
    }

    #[test]
    fn probe_failure_reopens_circuit() {
        let cb = CircuitBreaker::new(config(2, 2, 50));

        cb.record_failure();
        cb.record_failure();
        std::thread::sleep(Duration::from_millis(80));
        assert!(cb.check().is_ok());

        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Open);
        // Fresh cooldown, so the next call is rejected again
        assert!(cb.check().is_err());
    }

    #[test]
    fn reset_closes_circuit() {
        let cb = CircuitBreaker::new(config(2, 2, 30_000));

        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.status(), CircuitStatus::Open);

        cb.reset();
        assert_eq!(cb.status(), CircuitStatus::Closed);
        assert!(cb.check().is_ok());

        let metrics = cb.metrics();
        assert_eq!(metrics.window_len, 0);
        assert_eq!(metrics.opened_duration, None);
    }
}
