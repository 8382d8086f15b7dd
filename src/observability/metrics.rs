//! Metrics collection.
//!
//! # Metrics
//! - `jsonrpc_client_calls_total` (counter): calls by outcome
//! - `jsonrpc_client_call_duration_seconds` (histogram): latency of calls that hit the network
//! - `jsonrpc_breaker_trips_total` (counter): threshold crossings
//! - `jsonrpc_breaker_probes_total` (counter): probe calls by result
//! - `jsonrpc_breaker_store_errors_total` (counter): store failures by operation
//!
//! # Design Decisions
//! - Facade only; installing an exporter is up to the embedding application
//! - Low-overhead metric updates (no-op when no recorder is installed)

use std::time::Instant;

/// Record a finished call.
pub fn record_call(outcome: &'static str, start: Option<Instant>) {
    metrics::counter!("jsonrpc_client_calls_total", "outcome" => outcome).increment(1);
    if let Some(start) = start {
        metrics::histogram!("jsonrpc_client_call_duration_seconds", "outcome" => outcome)
            .record(start.elapsed().as_secs_f64());
    }
}

/// Record a key tripping open.
pub fn record_trip() {
    metrics::counter!("jsonrpc_breaker_trips_total").increment(1);
}

/// Record a probe and whether it closed the breaker.
pub fn record_probe(result: &'static str) {
    metrics::counter!("jsonrpc_breaker_probes_total", "result" => result).increment(1);
}

/// Record a breaker store failure.
pub fn record_store_error(op: &'static str) {
    metrics::counter!("jsonrpc_breaker_store_errors_total", "op" => op).increment(1);
}
