//! Breaker state store.
//!
//! # Responsibilities
//! - Persist one integer counter per breaker key
//! - Expire counters after a period of inactivity (every `set` refreshes the TTL)
//!
//! # Design Decisions
//! - Injectable trait so the backing store can be in-process or distributed
//! - Plain get/set, no compare-and-swap: callers do read-modify-write and
//!   concurrent writers on one key may lose updates
//! - Errors are surfaced; the breaker decides how to degrade

pub mod memory;

use async_trait::async_trait;
use std::time::Duration;

pub use memory::MemoryStore;

/// Errors raised by a breaker store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend returned something that is not a counter.
    #[error("invalid value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// TTL key-value store used to persist breaker counters.
#[async_trait]
pub trait BreakerStore: Send + Sync {
    /// Current value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Store `value` under `key`, expiring after `ttl` without further writes.
    async fn set(&self, key: &str, value: i64, ttl: Duration) -> Result<(), StoreError>;
}
