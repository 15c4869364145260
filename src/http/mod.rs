//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request head → Environ)
//!     → routing::Router::dispatch on a blocking worker
//!     → response.rs (status line + headers + streamed chunks → Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::environ_from_parts;
pub use response::parse_status_line;
pub use server::{build_app, AppState, HttpServer};
