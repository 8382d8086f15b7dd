//! Errors surfaced by [`RpcClient`](crate::rpc::RpcClient) construction and calls.

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;
use crate::rpc::transport::TransportError;

/// Errors that can occur during a JSON-RPC call.
///
/// A breaker short-circuit is not an error; see
/// [`CallOutcome::BreakerOpen`](crate::rpc::CallOutcome::BreakerOpen).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client built from a config that fails validation.
    #[error("invalid client config: {0}")]
    Config(#[from] ConfigError),

    /// Request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encoding(#[source] serde_json::Error),

    /// Network failure before a status was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Remote service answered with a server-side error status.
    #[error("server error: HTTP {status}")]
    Server { status: u16 },

    /// Deadline exceeded before the remote service answered.
    #[error("jsonrpc timeout after {after:?}: url: {endpoint}, method: {method}")]
    Timeout {
        endpoint: String,
        method: String,
        after: Duration,
    },

    /// Caller cancelled the call.
    #[error("call cancelled")]
    Cancelled,

    /// Response body is not a JSON-RPC response.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Config(_) => "config_error",
            ClientError::Encoding(_) => "encoding_error",
            ClientError::Transport(_) => "transport_error",
            ClientError::Server { .. } => "server_error",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Cancelled => "cancelled",
            ClientError::Decode(_) => "decode_error",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
