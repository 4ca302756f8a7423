//! Environment-driven service configuration
//!
//! Every knob has a default; invalid values fall back with a warning
//! instead of refusing to start.

use std::net::SocketAddr;
use std::time::Duration;

use rental_sdk::{CircuitBreakerConfig, GuardConfig};

/// Resolved configuration for the service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Guard configuration (call timeout plus breaker tuning)
    pub guard: GuardConfig,
}

impl ServiceConfig {
    pub const DEFAULT_PORT: u16 = 8000;

    /// Resolve the configuration from the environment.
    ///
    /// Recognized variables: `RENTAL_API_ADDR` (full bind address
    /// override), `RENTAL_API_PORT`, `REQUEST_TIMEOUT_MS`,
    /// `BREAKER_COOLDOWN_MS`, `BREAKER_FAILURE_RATE`,
    /// `BREAKER_WINDOW`, `BREAKER_MIN_SAMPLES`.
    pub fn from_env() -> Self {
        let defaults = CircuitBreakerConfig::default();

        let breaker = CircuitBreakerConfig {
            window_size: env_parsed("BREAKER_WINDOW", defaults.window_size),
            min_samples: env_parsed("BREAKER_MIN_SAMPLES", defaults.min_samples),
            failure_rate_threshold: env_parsed(
                "BREAKER_FAILURE_RATE",
                defaults.failure_rate_threshold,
            ),
            cooldown: Duration::from_millis(env_parsed(
                "BREAKER_COOLDOWN_MS",
                defaults.cooldown.as_millis() as u64,
            )),
        };

        let guard = GuardConfig {
            timeout: Duration::from_millis(env_parsed("REQUEST_TIMEOUT_MS", 15_000)),
            breaker,
        };

        Self {
            bind_addr: bind_address(),
            guard,
        }
    }
}

/// Read and parse an environment variable, warning and falling back
/// to the default when the value is missing or invalid.
fn env_parsed<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid value in {}, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}

fn bind_address() -> SocketAddr {
    if let Ok(addr) = std::env::var("RENTAL_API_ADDR") {
        match addr.parse() {
            Ok(addr) => return addr,
            Err(_) => {
                tracing::warn!("invalid address in RENTAL_API_ADDR, using default");
            }
        }
    }

    let port = env_parsed("RENTAL_API_PORT", ServiceConfig::DEFAULT_PORT);
    SocketAddr::from(([0, 0, 0, 0], port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_policy() {
        let config = ServiceConfig::from_env();
        assert_eq!(config.guard.timeout, Duration::from_millis(15_000));
        assert_eq!(
            config.guard.breaker.cooldown,
            Duration::from_millis(30_000)
        );
        assert_eq!(config.guard.breaker.failure_rate_threshold, 0.5);
        assert_eq!(config.bind_addr.port(), ServiceConfig::DEFAULT_PORT);
    }
}
