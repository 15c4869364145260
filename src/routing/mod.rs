//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Environ (PATH_INFO, QUERY_STRING)
//!     → router.rs (build search string, scan registry)
//!     → matcher.rs (full-string regex match, capture extraction)
//!     → matched handler with `router.captures`, or not-found handler
//!
//! Route Registration (any time):
//!     pattern string
//!     → matcher.rs (compile once)
//!     → router.rs (insert or replace under write lock)
//! ```
//!
//! # Design Decisions
//! - Linear scan over general regular expressions, no trie
//! - Deterministic precedence: last registered candidate wins
//! - Bad patterns are rejected at registration, never at dispatch

pub mod matcher;
pub mod router;

pub use matcher::Pattern;
pub use router::{search_target, RouteMatch, Router};

use thiserror::Error;

/// Errors raised by route registration.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: fancy_regex::Error,
    },
}
