//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! breaker + invoker produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Breaker key, endpoint and method are attached as fields to every event
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
