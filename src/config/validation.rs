//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route pattern compiles
//! - Validate value ranges (status codes, timeouts, addresses)
//! - Detect duplicate patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{ResponseConfig, RouterConfig};
use crate::routing::Pattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("route #{index} has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("route pattern {pattern:?} does not compile: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("route pattern {0:?} is defined more than once")]
    DuplicatePattern(String),

    #[error("{context}: status {status} is outside 100..=599")]
    InvalidStatus { context: String, status: u16 },

    #[error("{context}: invalid header {name:?}")]
    InvalidHeader { context: String, name: String },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern { index });
            continue;
        }
        if !seen.insert(route.pattern.as_str()) {
            errors.push(ValidationError::DuplicatePattern(route.pattern.clone()));
        }
        if let Err(e) = Pattern::compile(route.pattern.as_str()) {
            let message = match std::error::Error::source(&e) {
                Some(source) => source.to_string(),
                None => e.to_string(),
            };
            errors.push(ValidationError::InvalidPattern {
                pattern: route.pattern.clone(),
                message,
            });
        }
        validate_response(&format!("route {:?}", route.pattern), &route.response, &mut errors);
    }

    if let Some(not_found) = &config.not_found {
        validate_response("not_found", not_found, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_response(context: &str, response: &ResponseConfig, errors: &mut Vec<ValidationError>) {
    if let Some(status) = response.status {
        if !(100..=599).contains(&status) {
            errors.push(ValidationError::InvalidStatus {
                context: context.to_string(),
                status,
            });
        }
    }

    let content_type = std::iter::once(("Content-Type", response.content_type.as_str()));
    let extra = response.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    for (name, value) in content_type.chain(extra) {
        if HeaderName::try_from(name).is_err() || HeaderValue::try_from(value).is_err() {
            errors.push(ValidationError::InvalidHeader {
                context: context.to_string(),
                name: name.to_string(),
            });
        }
    }
}
