//! Per-source circuit breaker for adaptive fan-out.
//!
//! Tracks success/failure counts per product source and temporarily skips
//! sources that fail repeatedly. After a cooldown period, a tripped source
//! enters a half-open state where a single probe request determines whether
//! to restore or re-trip the circuit.
//!
//! # State Machine
//!
//! ```text
//! ┌────────┐  N failures   ┌────────┐  cooldown   ┌──────────┐
//! │ Closed ├──────────────►│  Open  ├────────────►│ HalfOpen │
//! └───▲────┘               └────────┘             └────┬─────┘
//!     │                         ▲                      │
//!     │  success                │  failure              │
//!     └─────────────────────────┴──────────────────────┘
//! ```

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Circuit breaker state for a single source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Source is healthy — all requests are allowed through.
    Closed,
    /// Source has failed too many times — requests are skipped until cooldown expires.
    Open,
    /// Cooldown has elapsed — one probe request is allowed to test recovery.
    HalfOpen,
}

impl CircuitState {
    /// Wire name of this state for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Health tracking data for a single source.
#[derive(Debug, Clone)]
struct SourceHealth {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure_at: Option<Instant>,
    last_success_at: Option<Instant>,
}

impl Default for SourceHealth {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            last_failure_at: None,
            last_success_at: None,
        }
    }
}

/// Configuration for circuit breaker behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Number of consecutive failures before tripping the circuit to Open.
    pub failure_threshold: u32,
    /// Seconds to wait in Open state before transitioning to HalfOpen.
    pub cooldown_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_secs: 60,
        }
    }
}

/// Per-source circuit breaker that tracks health and controls fan-out.
///
/// Each source has independent health tracking. When a source accumulates
/// enough consecutive failures it is temporarily skipped (Open state).
/// After a cooldown period one probe request is allowed (HalfOpen); success
/// restores the source, failure re-trips the circuit. Owned by the
/// aggregator — there is no process-global instance.
#[derive(Debug)]
pub struct SourceBreaker {
    config: BreakerConfig,
    sources: HashMap<String, SourceHealth>,
}

impl SourceBreaker {
    /// Create a new breaker with the given configuration.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            sources: HashMap::new(),
        }
    }

    /// Record a successful request for the given source.
    ///
    /// Resets the consecutive failure count and transitions the source
    /// to [`CircuitState::Closed`] regardless of previous state.
    pub fn record_success(&mut self, source: &str) {
        let health = self.sources.entry(source.to_owned()).or_default();
        health.state = CircuitState::Closed;
        health.consecutive_failures = 0;
        health.last_success_at = Some(Instant::now());
    }

    /// Record a failed request for the given source.
    ///
    /// Increments the consecutive failure count. If the count reaches
    /// the configured threshold, transitions to [`CircuitState::Open`].
    pub fn record_failure(&mut self, source: &str) {
        let health = self.sources.entry(source.to_owned()).or_default();
        health.consecutive_failures += 1;
        health.last_failure_at = Some(Instant::now());

        if health.consecutive_failures >= self.config.failure_threshold {
            health.state = CircuitState::Open;
        }
    }

    /// Check whether a request to the given source should be attempted.
    ///
    /// - [`CircuitState::Closed`]: always returns `true`
    /// - [`CircuitState::Open`]: returns `true` only if the cooldown has elapsed
    ///   (transitions to [`CircuitState::HalfOpen`])
    /// - [`CircuitState::HalfOpen`]: returns `true` (one probe allowed)
    pub fn should_attempt(&mut self, source: &str) -> bool {
        let health = self.sources.entry(source.to_owned()).or_default();

        match health.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let cooldown_elapsed = health
                    .last_failure_at
                    .is_none_or(|t| t.elapsed().as_secs() >= self.config.cooldown_secs);

                if cooldown_elapsed {
                    health.state = CircuitState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Get the current circuit state for a specific source.
    pub fn status(&self, source: &str) -> CircuitState {
        self.sources
            .get(source)
            .map_or(CircuitState::Closed, |h| h.state)
    }

    /// Health report for every source the breaker has seen:
    /// `(source, state, consecutive_failures)` tuples.
    pub fn report(&self) -> Vec<(String, CircuitState, u32)> {
        self.sources
            .iter()
            .map(|(source, health)| (source.clone(), health.state, health.consecutive_failures))
            .collect()
    }

    /// Reset all source states to healthy (Closed with zero failures).
    pub fn reset(&mut self) {
        self.sources.clear();
    }
}
