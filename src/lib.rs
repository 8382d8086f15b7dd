//! Fault-tolerant JSON-RPC over HTTP client.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ RpcClient::call(ctx, endpoint, method, params)
//!                 │
//!                 ▼
//!          CircuitBreaker::decide(key) ◀──▶ BreakerStore (TTL counters)
//!                 │
//!        ┌────────┼──────────────┐
//!      Deny     Allow        AllowProbe
//!        │        └──────┬───────┘
//!        ▼               ▼
//!   BreakerOpen   spawn transport task ──race── deadline timer
//!                        │
//!                        ▼
//!              classify: 5xx → record_failure
//!                        ok + probe → record_probe_success
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod resilience;
pub mod rpc;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use resilience::{BreakerKey, BreakerState, CircuitBreaker, Decision, ProbeSampler};
pub use rpc::{CallContext, CallOutcome, RpcClient, RpcError, RpcRequest, RpcResponse};
pub use store::{BreakerStore, MemoryStore, StoreError};
