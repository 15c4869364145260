//! Handler capability.
//!
//! # Data Flow
//! ```text
//! Environ (request context)
//!     → Handler::call
//!     → start_response("200 OK", headers)   exactly once
//!     → send_body(chunk) ...                zero or more chunks
//!     → send_body(&[])                      end of stream
//! ```
//!
//! # Design Decisions
//! - Synchronous: a handler may block while streaming; callers run it on a
//!   worker that is allowed to block
//! - Callbacks are borrowed `FnMut` trait objects so the caller decides where
//!   status and body bytes go (buffer, channel, socket)

pub mod data;

pub use data::DataResponse;

use crate::environ::Environ;

/// A response header as `(name, value)`.
pub type Header = (String, String);

/// Callback receiving the status line and headers.
pub type StartResponse<'a> = &'a mut dyn FnMut(&str, &[Header]);

/// Callback receiving body chunks. An empty chunk marks the end of the body.
pub type SendBody<'a> = &'a mut dyn FnMut(&[u8]);

/// A unit of request processing.
pub trait Handler: Send + Sync {
    /// Handle one request.
    fn call(&self, environ: Environ, start_response: StartResponse<'_>, send_body: SendBody<'_>);
}
