//! JSON-RPC 2.0 wire types.
//!
//! - Request format: `{"jsonrpc": "2.0", "method": "...", "params": ..., "id": <int64>}`
//! - Response format: `{"jsonrpc": "2.0", "result": ..., "error": {...}?, "id": <int64>}`
//! - Error format: `{"code": <int64>, "message": "...", "data": ...}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Result value of the legacy sentinel response for a short-circuited call.
pub const BREAKER_OPEN_SENTINEL: &str = "breakerIsOpened";

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: i64,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

impl Default for RpcRequest {
    fn default() -> Self {
        Self::new(String::new(), Value::Null, 0)
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: i64,
}

impl RpcResponse {
    /// The legacy placeholder returned when a breaker short-circuits a call.
    pub fn breaker_open_sentinel() -> Self {
        Self {
            result: Value::String(BREAKER_OPEN_SENTINEL.to_string()),
            ..Self::default()
        }
    }

    /// True if this is the legacy breaker-open placeholder.
    pub fn is_breaker_open_sentinel(&self) -> bool {
        self.error.is_none() && self.result.as_str() == Some(BREAKER_OPEN_SENTINEL)
    }
}

impl Default for RpcResponse {
    fn default() -> Self {
        Self {
            jsonrpc: default_version(),
            result: Value::Null,
            error: None,
            id: 0,
        }
    }
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// Result of a call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// The remote service answered.
    Response(RpcResponse),
    /// The breaker short-circuited the call; no network I/O happened.
    BreakerOpen,
}

impl CallOutcome {
    pub fn is_breaker_open(&self) -> bool {
        matches!(self, CallOutcome::BreakerOpen)
    }

    pub fn response(&self) -> Option<&RpcResponse> {
        match self {
            CallOutcome::Response(response) => Some(response),
            CallOutcome::BreakerOpen => None,
        }
    }

    /// Collapse into a response, mapping `BreakerOpen` to the legacy sentinel.
    pub fn into_response(self) -> RpcResponse {
        match self {
            CallOutcome::Response(response) => response,
            CallOutcome::BreakerOpen => RpcResponse::breaker_open_sentinel(),
        }
    }
}
