//! Circuit breaker over a shared TTL counter.
//!
//! # States
//! - Closed: counter below threshold, calls pass through
//! - Open: counter reached threshold; marks the crossing instant
//! - Probing: counter holds the opened marker, a sampled fraction of calls pass as probes
//!
//! # State Transitions
//! ```text
//! Closed → Open: server failure brings counter to threshold
//! Open → Probing: next decide() writes the opened marker (that call is denied)
//! Probing → Closed: probe call succeeds (counter reset to 0)
//! any → Closed: counter expires after TTL of inactivity
//! ```
//!
//! # Design Decisions
//! - Per (endpoint, method) key, state lives in the store, not in this struct
//! - Probing is probabilistic so recovery detection is spread over time
//! - Counter updates are read-modify-write; concurrent failures on one key may
//!   lose increments, so the count is an approximate signal
//! - Store errors fail open: the breaker never becomes the outage

use std::sync::Arc;
use std::time::Duration;

use crate::config::{validate_breaker, BreakerConfig, ConfigError};
use crate::observability::metrics;
use crate::resilience::key::BreakerKey;
use crate::resilience::sampler::{ProbeSampler, RandomSampler};
use crate::store::{BreakerStore, StoreError};

/// Admission decision for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Breaker closed, call proceeds.
    Allow,
    /// Breaker tripped, call proceeds as a recovery probe.
    AllowProbe,
    /// Breaker tripped, call must fail fast.
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Decision::Deny)
    }
}

/// Breaker state derived from a counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    Probing,
}

/// Counter-based circuit breaker.
#[derive(Clone)]
pub struct CircuitBreaker {
    store: Arc<dyn BreakerStore>,
    sampler: Arc<dyn ProbeSampler>,
    threshold: i64,
    opened_marker: i64,
    probe_probability: f64,
    ttl: Duration,
    metrics_enabled: bool,
}

impl CircuitBreaker {
    /// Create a breaker using uniform random probe sampling.
    pub fn new(config: &BreakerConfig, store: Arc<dyn BreakerStore>) -> Result<Self, ConfigError> {
        Self::with_sampler(config, store, Arc::new(RandomSampler))
    }

    /// Create a breaker with a custom probe sampler.
    ///
    /// Rejects configs that would leave a key denied forever, such as an
    /// opened marker equal to the threshold.
    pub fn with_sampler(
        config: &BreakerConfig,
        store: Arc<dyn BreakerStore>,
        sampler: Arc<dyn ProbeSampler>,
    ) -> Result<Self, ConfigError> {
        validate_breaker(config).map_err(ConfigError::Validation)?;
        Ok(Self {
            store,
            sampler,
            threshold: config.threshold,
            opened_marker: config.opened_marker,
            probe_probability: config.probe_probability,
            ttl: config.counter_ttl(),
            metrics_enabled: true,
        })
    }

    /// Toggle trip and store-error metrics.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Classify a counter value.
    pub fn state_of(&self, counter: i64) -> BreakerState {
        if counter < self.threshold {
            BreakerState::Closed
        } else if counter == self.threshold {
            BreakerState::Open
        } else {
            BreakerState::Probing
        }
    }

    /// Current state of `key`. Store errors read as closed.
    pub async fn state(&self, key: &BreakerKey) -> BreakerState {
        match self.store.get(key.as_str()).await {
            Ok(value) => self.state_of(value.unwrap_or(0)),
            Err(e) => {
                self.store_error("get", key, &e);
                BreakerState::Closed
            }
        }
    }

    /// Decide whether a call for `key` may proceed.
    pub async fn decide(&self, key: &BreakerKey) -> Decision {
        let counter = match self.counter(key).await {
            Ok(counter) => counter,
            Err(e) => {
                self.store_error("get", key, &e);
                return Decision::Allow;
            }
        };

        match self.state_of(counter) {
            BreakerState::Closed => Decision::Allow,
            BreakerState::Open => {
                if let Err(e) = self.write(key, self.opened_marker).await {
                    self.store_error("set", key, &e);
                }
                if self.metrics_enabled {
                    metrics::record_trip();
                }
                tracing::warn!(
                    key = %key,
                    threshold = self.threshold,
                    "Circuit breaker opened"
                );
                Decision::Deny
            }
            BreakerState::Probing => {
                if self.sampler.sample(self.probe_probability) {
                    tracing::debug!(key = %key, "Circuit open, letting probe through");
                    Decision::AllowProbe
                } else {
                    Decision::Deny
                }
            }
        }
    }

    /// Count a server-side failure for `key`. No-op once tripped.
    pub async fn record_failure(&self, key: &BreakerKey) {
        let counter = match self.counter(key).await {
            Ok(counter) => counter,
            Err(e) => {
                self.store_error("get", key, &e);
                return;
            }
        };
        if counter >= self.threshold {
            return;
        }

        let next = counter + 1;
        if let Err(e) = self.write(key, next).await {
            self.store_error("set", key, &e);
            return;
        }
        tracing::debug!(key = %key, failures = next, threshold = self.threshold, "Recorded failure");
    }

    /// Close the breaker for `key` after a successful probe.
    pub async fn record_probe_success(&self, key: &BreakerKey) {
        if let Err(e) = self.write(key, 0).await {
            self.store_error("set", key, &e);
            return;
        }
        tracing::info!(key = %key, "Probe succeeded, circuit breaker closed");
    }

    /// Read the counter, lazily creating it at 0.
    async fn counter(&self, key: &BreakerKey) -> Result<i64, StoreError> {
        match self.store.get(key.as_str()).await? {
            Some(value) => Ok(value.max(0)),
            None => {
                self.write(key, 0).await?;
                Ok(0)
            }
        }
    }

    async fn write(&self, key: &BreakerKey, value: i64) -> Result<(), StoreError> {
        self.store.set(key.as_str(), value, self.ttl).await
    }

    fn store_error(&self, op: &'static str, key: &BreakerKey, error: &StoreError) {
        if self.metrics_enabled {
            metrics::record_store_error(op);
        }
        tracing::warn!(key = %key, op, error = %error, "Breaker store error, failing open");
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("threshold", &self.threshold)
            .field("opened_marker", &self.opened_marker)
            .field("probe_probability", &self.probe_probability)
            .field("ttl", &self.ttl)
            .finish()
    }
}
