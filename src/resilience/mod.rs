//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to endpoint:
//!     → circuit_breaker.rs (decide: allow / probe / deny, keyed by key.rs)
//!     → timeouts.rs (effective deadline for the network race)
//!     → On outcome: circuit_breaker.rs (record failure / probe success)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every network call has a deadline
//! - No retries at this layer; callers own retry policy
//! - Circuit breaker prevents cascading failures and fails fast when open

pub mod circuit_breaker;
pub mod key;
pub mod sampler;
pub mod timeouts;

pub use circuit_breaker::{BreakerState, CircuitBreaker, Decision};
pub use key::BreakerKey;
pub use sampler::{ProbeSampler, RandomSampler};
