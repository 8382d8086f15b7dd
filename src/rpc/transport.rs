//! HTTP transport for JSON-RPC calls.
//!
//! # Responsibilities
//! - Send one POST per call with the encoded request as body
//! - Return the status and the full body without interpreting either
//!
//! # Design Decisions
//! - Trait seam so the invoker can be exercised without a network
//! - Dropping the returned future aborts the request in flight
//! - The transport does not enforce the call timeout; the invoker races it

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};

use crate::config::{TimeoutConfig, TransportConfig};

/// Errors raised before a status was obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid transport configuration: {0}")]
    Config(String),

    #[error("call task failed: {0}")]
    Task(String),
}

/// Raw result of a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// True for statuses that signal server-side overload or failure.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Outbound POST capability.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    content_type: HeaderValue,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig, timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        let content_type = HeaderValue::from_str(&config.content_type).map_err(|e| {
            TransportError::Config(format!("content_type '{}': {}", config.content_type, e))
        })?;
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            content_type,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, self.content_type.clone())
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(TransportResponse { status, body })
    }
}
