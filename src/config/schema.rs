//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Route table, in precedence order (later entries win ties).
    pub routes: Vec<RouteConfig>,

    /// Custom fallback response. The built-in `404 Not found` is used when absent.
    pub not_found: Option<ResponseConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Time allowed to produce a response head, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// A pattern and the fixed response served for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Regular expression matched against `path[?query]`.
    pub pattern: String,

    #[serde(flatten)]
    pub response: ResponseConfig,
}

/// Fixed response definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Status code. Routes default to 200, the not-found response to 404.
    pub status: Option<u16>,

    /// Reason phrase. Defaults to the canonical phrase for the status.
    pub reason: Option<String>,

    /// Content type of the body.
    pub content_type: String,

    /// Response body.
    pub body: String,

    /// Extra response headers.
    pub headers: BTreeMap<String, String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            status: None,
            reason: None,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: String::new(),
            headers: BTreeMap::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
