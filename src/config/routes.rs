//! Applying a route table to a live router.
//!
//! # Responsibilities
//! - Turn configured responses into handlers
//! - Register configured routes in file order, dropping any that
//!   disappeared from the config
//! - Install the configured (or built-in) not-found handler
//!
//! # Design Decisions
//! - Every pattern is compiled before the router is touched, so a bad
//!   table never leaves the router half-updated
//! - The table is swapped in one step, so registry order always follows the
//!   file regardless of earlier reloads

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::schema::{ResponseConfig, RouterConfig};
use crate::handler::{DataResponse, Handler};
use crate::observability::metrics;
use crate::routing::{Pattern, Router, RouterError};

/// Outcome of [`apply_config`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Routes registered or replaced.
    pub registered: usize,
    /// Previously registered routes no longer in the config.
    pub removed: usize,
}

/// Build the handler serving a configured response.
pub fn build_response(response: &ResponseConfig, default_status: u16) -> DataResponse {
    let status = response.status.unwrap_or(default_status);
    let reason = match &response.reason {
        Some(reason) => reason.clone(),
        None => StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string(),
    };

    response.headers.iter().fold(
        DataResponse::fixed(status, reason, response.body.clone())
            .with_content_type(response.content_type.as_str()),
        |handler, (name, value)| handler.with_header(name.as_str(), value.as_str()),
    )
}

/// Make `router` serve exactly the routes in `config`, in file order.
pub fn apply_config(router: &Router, config: &RouterConfig) -> Result<ApplySummary, RouterError> {
    let mut table = Vec::with_capacity(config.routes.len());
    for route in &config.routes {
        let handler: Arc<dyn Handler> = Arc::new(build_response(&route.response, 200));
        table.push((Pattern::compile(route.pattern.as_str())?, handler));
    }

    let wanted: HashSet<&str> = config.routes.iter().map(|r| r.pattern.as_str()).collect();
    let previous = router.replace_routes(table);
    let summary = ApplySummary {
        registered: config.routes.len(),
        removed: previous
            .iter()
            .filter(|p| !wanted.contains(p.as_str()))
            .count(),
    };

    let not_found = match &config.not_found {
        Some(response) => build_response(response, 404),
        None => DataResponse::not_found(),
    };
    router.set_not_found(Arc::new(not_found));

    metrics::record_route_count(router.len());
    tracing::info!(
        registered = summary.registered,
        removed = summary.removed,
        total = router.len(),
        "Route table applied"
    );
    Ok(summary)
}
