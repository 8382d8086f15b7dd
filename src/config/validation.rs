//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (threshold > 0, probability in (0, 1], timeouts > 0)
//! - Check the opened marker sits above the healthy band
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::{BreakerConfig, ClientConfig};

/// A single semantic violation in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_breaker(&config.breaker, &mut errors);

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::new("timeouts.request_ms", "must be greater than 0"));
    }
    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::new("timeouts.connect_ms", "must be greater than 0"));
    }
    if config.transport.content_type.trim().is_empty() {
        errors.push(ValidationError::new("transport.content_type", "must not be empty"));
    }

    finish(errors)
}

/// Validate only the breaker section.
pub fn validate_breaker(breaker: &BreakerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_breaker(breaker, &mut errors);
    finish(errors)
}

fn check_breaker(breaker: &BreakerConfig, errors: &mut Vec<ValidationError>) {
    if breaker.threshold <= 0 {
        errors.push(ValidationError::new("breaker.threshold", "must be greater than 0"));
    }
    if breaker.opened_marker <= breaker.threshold {
        errors.push(ValidationError::new(
            "breaker.opened_marker",
            format!("must be greater than threshold ({})", breaker.threshold),
        ));
    }
    if !(breaker.probe_probability > 0.0 && breaker.probe_probability <= 1.0) {
        errors.push(ValidationError::new(
            "breaker.probe_probability",
            format!("must be in (0, 1], got {}", breaker.probe_probability),
        ));
    }
    if breaker.counter_ttl_secs == 0 {
        errors.push(ValidationError::new("breaker.counter_ttl_secs", "must be greater than 0"));
    }
    if breaker.key_prefix.is_empty() {
        errors.push(ValidationError::new("breaker.key_prefix", "must not be empty"));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.breaker.threshold = 0;
        config.breaker.opened_marker = 0;
        config.breaker.probe_probability = 1.5;
        config.timeouts.request_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "breaker.threshold",
                "breaker.opened_marker",
                "breaker.probe_probability",
                "timeouts.request_ms",
            ]
        );
    }

    #[test]
    fn test_marker_must_exceed_threshold() {
        let mut config = ClientConfig::default();
        config.breaker.threshold = 10;
        config.breaker.opened_marker = 10;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("threshold (10)"));
    }

    #[test]
    fn test_nan_probability_rejected() {
        let breaker = BreakerConfig {
            probe_probability: f64::NAN,
            ..BreakerConfig::default()
        };
        let errors = validate_breaker(&breaker).unwrap_err();
        assert_eq!(errors[0].field, "breaker.probe_probability");
    }

    #[test]
    fn test_zero_probability_rejected() {
        let mut config = ClientConfig::default();
        config.breaker.probe_probability = 0.0;
        assert!(validate_config(&config).is_err());
    }
}
