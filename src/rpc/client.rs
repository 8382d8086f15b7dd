//! JSON-RPC invoker with breaker admission and deadline racing.
//!
//! # Responsibilities
//! - Ask the breaker whether a call may proceed
//! - Race the transport call against the effective deadline
//! - Classify the outcome and feed it back into the breaker
//!
//! # Design Decisions
//! - Denied calls return `CallOutcome::BreakerOpen` with zero network cost
//! - The transport call runs in its own task; on timeout, on caller
//!   cancellation and when the `call` future itself is dropped, the task's
//!   token is cancelled and the task aborted, which drops the in-flight request
//! - Construction validates the whole config
//! - Only `>= 500` counts as a failure by default; transport errors and
//!   timeouts are opt-in (`count_transport_errors`, `count_timeouts`)
//! - No retries; every error is surfaced

use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::config::{validate_config, ClientConfig, ConfigError};
use crate::error::{ClientError, ClientResult};
use crate::observability::metrics;
use crate::resilience::timeouts::effective_timeout;
use crate::resilience::{BreakerKey, CircuitBreaker, Decision};
use crate::rpc::context::CallContext;
use crate::rpc::pool::ObjectPool;
use crate::rpc::transport::{HttpTransport, Transport, TransportError, TransportResponse};
use crate::rpc::types::{CallOutcome, RpcRequest, RpcResponse};
use crate::store::BreakerStore;

/// Fault-tolerant JSON-RPC client.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct RpcClient {
    breaker: CircuitBreaker,
    transport: Arc<dyn Transport>,
    requests: ObjectPool<RpcRequest>,
    next_id: AtomicI64,
    config: ClientConfig,
}

impl RpcClient {
    /// Create a client with the HTTP transport and a breaker over `store`.
    pub fn new(config: ClientConfig, store: Arc<dyn BreakerStore>) -> ClientResult<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let transport = HttpTransport::new(&config.transport, &config.timeouts)?;
        let breaker = CircuitBreaker::new(&config.breaker, store)?
            .with_metrics(config.observability.metrics_enabled);
        Self::with_parts(config, breaker, Arc::new(transport))
    }

    /// Create a client from an existing breaker and transport.
    ///
    /// The breaker keeps its own metrics setting.
    pub fn with_parts(
        config: ClientConfig,
        breaker: CircuitBreaker,
        transport: Arc<dyn Transport>,
    ) -> ClientResult<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(Self {
            breaker,
            transport,
            requests: ObjectPool::new(config.pool.max_idle),
            next_id: AtomicI64::new(1),
            config,
        })
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Breaker key for an (endpoint, method) pair.
    pub fn key_for(&self, endpoint: &str, method: &str) -> BreakerKey {
        BreakerKey::new(&self.config.breaker.key_prefix, endpoint, method)
    }

    /// Call `method` on `endpoint`.
    ///
    /// # Returns
    /// - `Ok(CallOutcome::Response)` when the service answered with a non-5xx status
    /// - `Ok(CallOutcome::BreakerOpen)` when the breaker short-circuited the call
    /// - `Err(..)` for encoding, transport, server, timeout, cancellation and decode failures
    pub async fn call<P>(
        &self,
        ctx: &CallContext,
        endpoint: &str,
        method: &str,
        params: P,
    ) -> ClientResult<CallOutcome>
    where
        P: Serialize,
    {
        let key = self.key_for(endpoint, method);
        let decision = self.breaker.decide(&key).await;

        if !decision.is_allowed() {
            tracing::debug!(key = %key, "Circuit open, failing fast");
            self.record_call("breaker_open", None);
            return Ok(CallOutcome::BreakerOpen);
        }

        let start = Instant::now();
        let result = self.invoke(ctx, &key, decision, params).await;

        match &result {
            Ok(_) => self.record_call("ok", Some(start)),
            Err(e) => self.record_call(e.kind(), Some(start)),
        }
        if decision == Decision::AllowProbe && self.config.observability.metrics_enabled {
            metrics::record_probe(if result.is_ok() { "success" } else { "failure" });
        }
        result
    }

    async fn invoke<P>(
        &self,
        ctx: &CallContext,
        key: &BreakerKey,
        decision: Decision,
        params: P,
    ) -> ClientResult<CallOutcome>
    where
        P: Serialize,
    {
        let body = self.encode(key.method(), params)?;
        let response = self.race(ctx, key, body).await?;

        if response.is_server_error() {
            self.breaker.record_failure(key).await;
            tracing::warn!(key = %key, status = response.status, "Server error");
            return Err(ClientError::Server {
                status: response.status,
            });
        }

        let decoded: RpcResponse =
            serde_json::from_slice(&response.body).map_err(ClientError::Decode)?;

        if decision == Decision::AllowProbe {
            self.breaker.record_probe_success(key).await;
        }
        Ok(CallOutcome::Response(decoded))
    }

    /// Run the transport call in its own task, racing it against the deadline.
    ///
    /// The task never outlives this future.
    async fn race(
        &self,
        ctx: &CallContext,
        key: &BreakerKey,
        body: Vec<u8>,
    ) -> ClientResult<TransportResponse> {
        let timeout = effective_timeout(self.config.timeouts.request(), ctx.deadline());
        let token = ctx.cancellation().child_token();

        let _cancel_on_drop = token.clone().drop_guard();

        let task_token = token.clone();
        let transport = Arc::clone(&self.transport);
        let endpoint = key.endpoint().to_string();
        let mut task = AbortOnDrop(tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => None,
                res = transport.post(&endpoint, body) => Some(res),
            }
        }));

        let joined = tokio::select! {
            joined = &mut task.0 => joined,
            _ = tokio::time::sleep(timeout) => {
                token.cancel();
                task.0.abort();
                tracing::warn!(key = %key, timeout = ?timeout, "Call timed out");
                if self.config.breaker.count_timeouts {
                    self.breaker.record_failure(key).await;
                }
                return Err(ClientError::Timeout {
                    endpoint: key.endpoint().to_string(),
                    method: key.method().to_string(),
                    after: timeout,
                });
            }
        };

        match joined {
            Ok(Some(Ok(response))) => Ok(response),
            Ok(Some(Err(e))) => {
                tracing::warn!(key = %key, error = %e, "Transport error");
                if self.config.breaker.count_transport_errors {
                    self.breaker.record_failure(key).await;
                }
                Err(e.into())
            }
            Ok(None) => {
                tracing::debug!(key = %key, "Call cancelled by caller");
                Err(ClientError::Cancelled)
            }
            Err(e) => Err(TransportError::Task(e.to_string()).into()),
        }
    }

    fn encode<P: Serialize>(&self, method: &str, params: P) -> ClientResult<Vec<u8>> {
        let params = serde_json::to_value(params).map_err(ClientError::Encoding)?;

        let mut request = self.requests.acquire();
        request.method.push_str(method);
        request.params = params;
        request.id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let encoded = serde_json::to_vec(&request).map_err(ClientError::Encoding);
        request.params = Value::Null;
        self.requests.release(request);
        encoded
    }

    fn record_call(&self, outcome: &'static str, start: Option<Instant>) {
        if self.config.observability.metrics_enabled {
            metrics::record_call(outcome, start);
        }
    }
}

/// Aborts the spawned transport task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("breaker", &self.breaker)
            .field("request_timeout", &self.config.timeouts.request())
            .field("idle_requests", &self.requests.idle())
            .finish()
    }
}
