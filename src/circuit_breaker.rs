//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for external
//! nutrient-tier lookups. It prevents cascading failures by temporarily
//! skipping a tier when its API fails repeatedly, letting resolution fall
//! through to the next tier (or to "unresolved") without paying a network
//! timeout on every request.
//!
//! ## State Machine
//!
//! ```text
//! CLOSED ────failures ≥ threshold────► OPEN
//!    ▲                                   │
//!    └──────────reset timeout────────────┘
//! ```
//!
//! - **CLOSED → OPEN**: when the consecutive-failure count reaches
//!   `threshold`
//! - **OPEN → CLOSED**: after `reset_secs` elapses since the last failure;
//!   the next lookup tests whether the tier has recovered
//!
//! A skipped tier is indistinguishable from a tier miss to the resolver;
//! the breaker only changes how quickly the miss is produced.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Circuit breaker configuration for one external tier
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the tier is skipped
    pub threshold: u32,
    /// Seconds to keep skipping before allowing a test lookup
    pub reset_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            reset_secs: 60,
        }
    }
}

/// Circuit breaker guarding one external nutrient tier
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_count: Mutex<u32>,
    last_failure_time: Mutex<Option<Instant>>,
    config: BreakerConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            failure_count: Mutex::new(0),
            last_failure_time: Mutex::new(None),
            config,
        }
    }

    /// Check if the circuit is open (tier lookups should be skipped).
    ///
    /// Automatically resets to closed once the reset timeout has elapsed
    /// since the last recorded failure, so the next lookup probes the tier.
    pub fn is_open(&self) -> bool {
        let failure_count = *self
            .failure_count
            .lock()
            .expect("Failed to acquire failure count lock");
        let last_failure = *self
            .last_failure_time
            .lock()
            .expect("Failed to acquire last failure time lock");

        if failure_count >= self.config.threshold {
            if let Some(last_time) = last_failure {
                if last_time.elapsed() < Duration::from_secs(self.config.reset_secs) {
                    return true; // Circuit is still open
                }
                // Reset and allow a test lookup
                *self
                    .failure_count
                    .lock()
                    .expect("Failed to acquire failure count lock") = 0;
                *self
                    .last_failure_time
                    .lock()
                    .expect("Failed to acquire last failure time lock") = None;
            }
        }
        false
    }

    /// Record a failed tier lookup.
    pub fn record_failure(&self) {
        *self
            .failure_count
            .lock()
            .expect("Failed to acquire failure count lock") += 1;
        *self
            .last_failure_time
            .lock()
            .expect("Failed to acquire last failure time lock") = Some(Instant::now());
    }

    /// Record a successful tier lookup, resetting the failure counter.
    pub fn record_success(&self) {
        *self
            .failure_count
            .lock()
            .expect("Failed to acquire failure count lock") = 0;
        *self
            .last_failure_time
            .lock()
            .expect("Failed to acquire last failure time lock") = None;
    }
}
