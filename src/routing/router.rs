//! Route registry and dispatch.
//!
//! # Responsibilities
//! - Store compiled patterns with their handlers
//! - Resolve a search string (path + optional query) to one handler
//! - Inject captures into the request context and invoke the handler
//! - Fall back to the not-found handler
//!
//! # Design Decisions
//! - Registry is an ordered list behind a single `RwLock`; the lock is never
//!   held while a handler runs
//! - Of several matching patterns the one registered last wins; replacing a
//!   pattern keeps its original position
//! - Invalid patterns are rejected at registration, match-time regex failures
//!   skip the pattern

use std::sync::{Arc, PoisonError, RwLock};

use arc_swap::ArcSwap;

use crate::environ::{Environ, ROUTER_CAPTURES};
use crate::handler::{DataResponse, Handler, SendBody, StartResponse};
use crate::routing::matcher::Pattern;
use crate::routing::RouterError;

#[derive(Clone)]
struct Route {
    pattern: Arc<Pattern>,
    handler: Arc<dyn Handler>,
}

/// Result of resolving a search string.
#[derive(Clone)]
pub struct RouteMatch {
    /// Pattern string of the winning route.
    pub pattern: String,
    pub handler: Arc<dyn Handler>,
    /// Capturing-group results, in group order.
    pub captures: Vec<String>,
}

impl std::fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// Regex router dispatching requests to registered handlers.
pub struct Router {
    routes: RwLock<Vec<Route>>,
    not_found: ArcSwap<Arc<dyn Handler>>,
}

impl Router {
    /// Create an empty router with the default `404 Not found` fallback.
    pub fn new() -> Self {
        let not_found: Arc<dyn Handler> = Arc::new(DataResponse::not_found());
        Self {
            routes: RwLock::new(Vec::new()),
            not_found: ArcSwap::from_pointee(not_found),
        }
    }

    /// Register `handler` for `pattern`, replacing any handler already
    /// registered for the same pattern string.
    ///
    /// Returns the replaced handler. The registry is left untouched when the
    /// pattern does not compile.
    pub fn set(
        &self,
        pattern: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<Option<Arc<dyn Handler>>, RouterError> {
        let pattern = Arc::new(Pattern::compile(pattern)?);

        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.pattern.as_str() == pattern.as_str())
        {
            tracing::debug!(pattern = %pattern.as_str(), "Route replaced");
            return Ok(Some(std::mem::replace(&mut route.handler, handler)));
        }

        tracing::debug!(
            pattern = %pattern.as_str(),
            captures = pattern.capture_count(),
            "Route registered"
        );
        routes.push(Route { pattern, handler });
        Ok(None)
    }

    /// Handler registered for exactly this pattern string.
    pub fn get(&self, pattern: &str) -> Option<Arc<dyn Handler>> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.pattern.as_str() == pattern)
            .map(|r| r.handler.clone())
    }

    /// Unregister `pattern`, returning its handler.
    pub fn remove(&self, pattern: &str) -> Option<Arc<dyn Handler>> {
        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        let index = routes.iter().position(|r| r.pattern.as_str() == pattern)?;
        tracing::debug!(pattern = %pattern, "Route removed");
        Some(routes.remove(index).handler)
    }

    /// Swap the whole registry for `routes`, in the given precedence order.
    ///
    /// Happens under one write lock, so a concurrent dispatch sees either the
    /// old table or the new one. A pattern listed twice keeps its first
    /// position and its last handler, as repeated [`Router::set`] calls would.
    /// Returns the pattern strings that were registered before.
    pub fn replace_routes(
        &self,
        routes: impl IntoIterator<Item = (Pattern, Arc<dyn Handler>)>,
    ) -> Vec<String> {
        let mut table: Vec<Route> = Vec::new();
        for (pattern, handler) in routes {
            match table.iter_mut().find(|r| r.pattern.as_str() == pattern.as_str()) {
                Some(route) => route.handler = handler,
                None => table.push(Route {
                    pattern: Arc::new(pattern),
                    handler,
                }),
            }
        }

        let mut current = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, table);
        tracing::debug!(routes = current.len(), previous = previous.len(), "Route table replaced");
        previous
            .into_iter()
            .map(|r| r.pattern.as_str().to_string())
            .collect()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.get(pattern).is_some()
    }

    /// Registered pattern strings in precedence order (lowest first).
    pub fn patterns(&self) -> Vec<String> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| r.pattern.as_str().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current fallback handler.
    pub fn not_found(&self) -> Arc<dyn Handler> {
        Arc::clone(&*self.not_found.load_full())
    }

    /// Replace the fallback handler. Last write wins.
    pub fn set_not_found(&self, handler: Arc<dyn Handler>) {
        self.not_found.store(Arc::new(handler));
    }

    /// Find the handler for `search` (path, plus `?query` if any).
    ///
    /// Every pattern whose first match spans all of `search` is a candidate;
    /// the candidate registered last wins.
    pub fn resolve(&self, search: &str) -> Option<RouteMatch> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);

        for route in routes.iter().rev() {
            match route.pattern.match_full(search) {
                Ok(Some(captures)) => {
                    return Some(RouteMatch {
                        pattern: route.pattern.as_str().to_string(),
                        handler: route.handler.clone(),
                        captures,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        pattern = %route.pattern.as_str(),
                        search = %search,
                        error = %e,
                        "Route pattern failed to evaluate, skipping"
                    );
                }
            }
        }
        None
    }

    /// Route one request.
    ///
    /// Exactly one handler is invoked: the matched route's, with captures
    /// stored under [`ROUTER_CAPTURES`], or the not-found handler with the
    /// context unchanged.
    pub fn dispatch(&self, mut environ: Environ, start_response: StartResponse<'_>, send_body: SendBody<'_>) {
        let Some(search) = search_target(&environ) else {
            tracing::debug!("Request has no path, using not-found handler");
            return self.not_found().call(environ, start_response, send_body);
        };

        // Registry lock is released inside resolve().
        match self.resolve(&search) {
            Some(matched) => {
                tracing::debug!(
                    search = %search,
                    pattern = %matched.pattern,
                    captures = ?matched.captures,
                    "Route matched"
                );
                environ.insert(ROUTER_CAPTURES, matched.captures);
                matched.handler.call(environ, start_response, send_body);
            }
            None => {
                tracing::debug!(search = %search, "No route matched");
                self.not_found().call(environ, start_response, send_body);
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns())
            .finish_non_exhaustive()
    }
}

impl Handler for Router {
    fn call(&self, environ: Environ, start_response: StartResponse<'_>, send_body: SendBody<'_>) {
        self.dispatch(environ, start_response, send_body);
    }
}

/// Build the string patterns are matched against: `PATH_INFO`, plus
/// `?QUERY_STRING` when a query string is present.
pub fn search_target(environ: &Environ) -> Option<String> {
    let path = environ.path_info()?;
    Some(match environ.query_string() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    })
}
