//! Circuit breaker implementation for preventing cascading failures
//!
//! The breaker tracks a rolling window of recent call outcomes for one
//! backing operation. Once enough outcomes have accumulated and the
//! failure rate within the window reaches the configured threshold,
//! the circuit opens and calls are refused without reaching the
//! backing operation. After the cooldown a single probe call is
//! admitted; its outcome decides whether the circuit closes again or
//! reopens with a fresh cooldown.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of recent call outcomes kept in the rolling window
    pub window_size: usize,

    /// Minimum number of outcomes in the window before the failure
    /// rate is evaluated at all
    pub min_samples: usize,

    /// Failure rate within the window that opens the circuit (0.0-1.0)
    pub failure_rate_threshold: f64,

    /// Cooldown before a probe call is allowed through an open circuit
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            min_samples: 10,
            failure_rate_threshold: 0.5,
            cooldown: Duration::from_millis(30_000),
        }
    }
}

/// Status of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitStatus {
    /// Circuit is closed, allowing requests
    Closed,

    /// Circuit is open, rejecting requests
    Open,

    /// Circuit is half-open, allowing a single probe request
    HalfOpen,
}

impl std::fmt::Display for CircuitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Open => write!(f, "Open"),
            Self::HalfOpen => write!(f, "HalfOpen"),
        }
    }
}

/// Returned by [`CircuitBreaker::check`] when a call is refused.
#[derive(Debug, Clone, Copy)]
pub struct Rejected {
    /// Time remaining until a probe may be admitted. Zero when the
    /// circuit is half-open and the probe slot is already taken.
    pub retry_in: Duration,
}

/// A thread-safe circuit breaker for one backing operation.
///
/// State is shared across requests for the lifetime of the process;
/// all mutation happens under the internal lock so interleaved
/// requests cannot lose outcome updates.
pub struct CircuitBreaker {
    /// Current circuit status
    status: RwLock<CircuitStatus>,

    /// Time when the circuit was opened
    opened_at: RwLock<Option<Instant>>,

    /// Rolling window of recent outcomes; `true` marks a failure
    window: RwLock<VecDeque<bool>>,

    /// Whether the single half-open probe slot is taken
    probe_in_flight: AtomicBool,

    /// Total number of failures
    total_failures: AtomicUsize,

    /// Total number of successes
    total_successes: AtomicUsize,

    /// Configuration
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the specified configuration
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            status: RwLock::new(CircuitStatus::Closed),
            opened_at: RwLock::new(None),
            window: RwLock::new(VecDeque::with_capacity(config.window_size)),
            probe_in_flight: AtomicBool::new(false),
            total_failures: AtomicUsize::new(0),
            total_successes: AtomicUsize::new(0),
            config,
        }
    }

    /// Check whether the circuit admits a call.
    pub fn check(&self) -> Result<(), Rejected> {
        match self.status() {
            CircuitStatus::Closed => Ok(()),
            CircuitStatus::Open => {
                let remaining = {
                    let opened_at = self.opened_at.read().unwrap();
                    match *opened_at {
                        Some(instant) => self.config.cooldown.saturating_sub(instant.elapsed()),
                        // No opened_at recorded, allow the transition
                        None => Duration::ZERO,
                    }
                };

                if remaining.is_zero() {
                    if self.claim_probe() {
                        Ok(())
                    } else {
                        Err(Rejected {
                            retry_in: Duration::ZERO,
                        })
                    }
                } else {
                    Err(Rejected {
                        retry_in: remaining,
                    })
                }
            }
            CircuitStatus::HalfOpen => {
                if !self.probe_in_flight.swap(true, Ordering::SeqCst) {
                    Ok(())
                } else {
                    Err(Rejected {
                        retry_in: Duration::ZERO,
                    })
                }
            }
        }
    }

    /// Record a successful call.
    pub fn record_success(&self) {
        self.total_successes.fetch_add(1, Ordering::SeqCst);

        match self.status() {
            CircuitStatus::Closed => {
                self.push_outcome(false);
            }
            CircuitStatus::HalfOpen => {
                // The probe succeeded, resume normal calls
                self.close_circuit();
            }
            CircuitStatus::Open => {
                tracing::debug!("success recorded while circuit open, ignoring");
            }
        }
    }

    /// Record a failed call.
    pub fn record_failure(&self) {
        self.total_failures.fetch_add(1, Ordering::SeqCst);

        match self.status() {
            CircuitStatus::Closed => {
                self.push_outcome(true);
                if self.failure_rate_exceeded() {
                    self.open_circuit();
                }
            }
            CircuitStatus::HalfOpen => {
                // The probe failed, restart the cooldown
                self.open_circuit();
            }
            CircuitStatus::Open => {
                tracing::debug!("failure recorded while circuit open, ignoring");
            }
        }
    }

    /// Reset the circuit breaker to closed state
    pub fn reset(&self) {
        self.close_circuit();
    }

    /// Get the current circuit status
    pub fn status(&self) -> CircuitStatus {
        *self.status.read().unwrap()
    }

    /// Get metrics about the circuit breaker
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let (window_len, window_failures) = {
            let window = self.window.read().unwrap();
            (window.len(), window.iter().filter(|f| **f).count())
        };
        let opened_duration = {
            let opened_at = self.opened_at.read().unwrap();
            opened_at.map(|instant| instant.elapsed())
        };

        CircuitBreakerMetrics {
            status: self.status(),
            window_len,
            window_failures,
            total_failures: self.total_failures.load(Ordering::SeqCst),
            total_successes: self.total_successes.load(Ordering::SeqCst),
            opened_duration,
            config: self.config.clone(),
        }
    }

    // Private methods

    /// Append an outcome to the rolling window, evicting the oldest
    /// entry once the window is full.
    fn push_outcome(&self, failed: bool) {
        let mut window = self.window.write().unwrap();
        window.push_back(failed);
        while window.len() > self.config.window_size {
            window.pop_front();
        }
    }

    /// Whether the window holds enough samples and its failure rate
    /// has reached the threshold.
    fn failure_rate_exceeded(&self) -> bool {
        let window = self.window.read().unwrap();
        if window.len() < self.config.min_samples {
            return false;
        }
        let failures = window.iter().filter(|f| **f).count();
        (failures as f64 / window.len() as f64) >= self.config.failure_rate_threshold
    }

    /// Move from open to half-open and claim the probe slot for the
    /// current caller. Returns false if another caller won the race.
    fn claim_probe(&self) -> bool {
        let mut status = self.status.write().unwrap();
        if *status == CircuitStatus::Open {
            tracing::info!("circuit breaker transitioning to HalfOpen");
            *status = CircuitStatus::HalfOpen;
            self.probe_in_flight.store(true, Ordering::SeqCst);
            true
        } else {
            // Another caller transitioned first; try for the probe slot
            !self.probe_in_flight.swap(true, Ordering::SeqCst)
        }
    }

    /// Transition to open state
    fn open_circuit(&self) {
        tracing::warn!("circuit breaker transitioning to Open");
        *self.status.write().unwrap() = CircuitStatus::Open;
        *self.opened_at.write().unwrap() = Some(Instant::now());
        self.window.write().unwrap().clear();
        self.probe_in_flight.store(false, Ordering::SeqCst);
    }

    /// Transition to closed state
    fn close_circuit(&self) {
        tracing::info!("circuit breaker transitioning to Closed");
        *self.status.write().unwrap() = CircuitStatus::Closed;
        *self.opened_at.write().unwrap() = None;
        self.window.write().unwrap().clear();
        self.probe_in_flight.store(false, Ordering::SeqCst);
    }
}

/// Metrics for a circuit breaker
#[derive(Debug)]
pub struct CircuitBreakerMetrics {
    /// Current status
    pub status: CircuitStatus,

    /// Number of outcomes currently in the rolling window
    pub window_len: usize,

    /// Number of failures currently in the rolling window
    pub window_failures: usize,

    /// Total failures seen
    pub total_failures: usize,

    /// Total successes seen
    pub total_successes: usize,

    /// Duration the circuit has been open, if applicable
    pub opened_duration: Option<Duration>,

    /// Current configuration
    pub config: CircuitBreakerConfig,
}
