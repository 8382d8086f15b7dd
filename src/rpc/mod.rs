//! JSON-RPC call subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → client.rs (RpcClient::call: breaker decision, deadline race, classification)
//!     → pool.rs (recycled RpcRequest, reset on acquire)
//!     → transport.rs (POST encoded request, return status + body)
//!     → types.rs (decode RpcResponse, tag outcome)
//! ```

pub mod client;
pub mod context;
pub mod pool;
pub mod transport;
pub mod types;

pub use client::RpcClient;
pub use context::CallContext;
pub use pool::{ObjectPool, Poolable};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use types::{CallOutcome, RpcError, RpcRequest, RpcResponse, BREAKER_OPEN_SENTINEL};
