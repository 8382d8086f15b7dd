//! Timeout enforcement.
//!
//! # Responsibilities
//! - Derive the effective deadline of a call from config and caller deadline
//!
//! # Design Decisions
//! - The configured request timeout is an upper bound; a caller deadline can only shorten it
//! - Timeout errors are distinct from other errors

use std::time::{Duration, Instant};

/// Time left for a call given the configured bound and an optional caller deadline.
///
/// Returns `Duration::ZERO` when the caller deadline already passed.
pub fn effective_timeout(configured: Duration, deadline: Option<Instant>) -> Duration {
    match deadline {
        Some(deadline) => configured.min(deadline.saturating_duration_since(Instant::now())),
        None => configured,
    }
}
