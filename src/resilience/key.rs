//! Breaker key addressing.

use std::fmt;

/// Identifies one (endpoint, method) pair in the breaker store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreakerKey {
    endpoint: String,
    method: String,
    rendered: String,
}

impl BreakerKey {
    /// Build a key rendered as `{prefix}#{endpoint}#{method}`.
    pub fn new(prefix: &str, endpoint: &str, method: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            rendered: format!("{prefix}#{endpoint}#{method}"),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The store address of this key.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for BreakerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering() {
        let key = BreakerKey::new("jsonrpcBreak", "http://test.com/rpc/user", "test-rpc");
        assert_eq!(key.as_str(), "jsonrpcBreak#http://test.com/rpc/user#test-rpc");
        assert_eq!(key.to_string(), key.as_str());
        assert_eq!(key.endpoint(), "http://test.com/rpc/user");
        assert_eq!(key.method(), "test-rpc");
    }

    #[test]
    fn test_distinct_methods_distinct_keys() {
        let a = BreakerKey::new("p", "http://h", "a");
        let b = BreakerKey::new("p", "http://h", "b");
        assert_ne!(a, b);
    }
}
