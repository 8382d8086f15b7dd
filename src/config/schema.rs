//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the JSON-RPC client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Circuit breaker policy.
    pub breaker: BreakerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// HTTP transport settings.
    pub transport: TransportConfig,

    /// Object pool sizing.
    pub pool: PoolConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Number of server failures that trips a key.
    pub threshold: i64,

    /// Counter value written when a key trips. Must exceed `threshold`.
    pub opened_marker: i64,

    /// Probability that a call against a tripped key runs as a probe.
    pub probe_probability: f64,

    /// Inactivity window after which a stored counter is forgotten.
    pub counter_ttl_secs: u64,

    /// Prefix of every store key.
    pub key_prefix: String,

    /// Count transport errors (no status received) as failures.
    pub count_transport_errors: bool,

    /// Count timeouts as failures.
    pub count_timeouts: bool,
}

impl BreakerConfig {
    pub fn counter_ttl(&self) -> Duration {
        Duration::from_secs(self.counter_ttl_secs)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 500,
            opened_marker: 999_999,
            probe_probability: 0.01,
            counter_ttl_secs: 300,
            key_prefix: "jsonrpcBreak".to_string(),
            count_transport_errors: false,
            count_timeouts: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on a single call (request + response) in milliseconds.
    pub request_ms: u64,

    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: 5_000,
            connect_ms: 2_000,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Content-Type header sent with every POST.
    pub content_type: String,

    /// User-Agent header sent with every POST.
    pub user_agent: String,

    /// Idle keep-alive connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
            user_agent: concat!("jsonrpc-breaker/", env!("CARGO_PKG_VERSION")).to_string(),
            pool_max_idle_per_host: 32,
        }
    }
}

/// Request/response object pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of idle objects retained per pool.
    pub max_idle: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_idle: 256 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Emit per-call metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}
