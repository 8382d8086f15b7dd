//! Object pool for request/response structures.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::rpc::types::{RpcRequest, RpcResponse, JSONRPC_VERSION};

/// Types that can be recycled through an [`ObjectPool`].
pub trait Poolable: Default {
    /// Clear every field a call populates, keeping allocations where possible.
    fn reset(&mut self);
}

fn reset_version(version: &mut String) {
    if version.as_str() != JSONRPC_VERSION {
        version.clear();
        version.push_str(JSONRPC_VERSION);
    }
}

impl Poolable for RpcRequest {
    fn reset(&mut self) {
        reset_version(&mut self.jsonrpc);
        self.method.clear();
        self.params = Value::Null;
        self.id = 0;
    }
}

impl Poolable for RpcResponse {
    fn reset(&mut self) {
        reset_version(&mut self.jsonrpc);
        self.result = Value::Null;
        self.error = None;
        self.id = 0;
    }
}

/// A bounded free list.
///
/// Objects are reset on `acquire`, not on `release`, so whatever a released
/// instance still carries never leaks into the next call.
pub struct ObjectPool<T> {
    idle: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T: Poolable> ObjectPool<T> {
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(max_idle.min(64))),
            max_idle,
        }
    }

    /// Take an instance with every field cleared.
    pub fn acquire(&self) -> T {
        let recycled = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();
        match recycled {
            Some(mut item) => {
                item.reset();
                item
            }
            None => T::default(),
        }
    }

    /// Hand an instance back. Dropped if the pool is full.
    pub fn release(&self, item: T) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(item);
        }
    }

    /// Number of idle instances.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<T> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("max_idle", &self.max_idle)
            .finish()
    }
}
