//! Request handling and transformation.
//!
//! # Responsibilities
//! - Translate an HTTP request head into a CGI-style [`Environ`]
//!
//! # Design Decisions
//! - `PATH_INFO` is the raw (still percent-encoded) path so patterns see
//!   exactly what the client sent
//! - `QUERY_STRING` is only set when the URI carries a `?`
//! - Request bodies are not exposed to handlers

use std::net::SocketAddr;

use axum::http::{header, request::Parts};

use crate::environ::{
    Environ, CONTENT_LENGTH, CONTENT_TYPE, PATH_INFO, QUERY_STRING, REMOTE_ADDR, REQUEST_METHOD,
    SCRIPT_NAME, SERVER_PROTOCOL,
};

/// Build the request context for `parts`.
pub fn environ_from_parts(parts: &Parts, remote: Option<SocketAddr>) -> Environ {
    let mut environ = Environ::new()
        .with(REQUEST_METHOD, parts.method.as_str())
        .with(SCRIPT_NAME, "")
        .with(PATH_INFO, parts.uri.path())
        .with(SERVER_PROTOCOL, format!("{:?}", parts.version));

    if let Some(query) = parts.uri.query() {
        environ.insert(QUERY_STRING, query);
    }
    if let Some(addr) = remote {
        environ.insert(REMOTE_ADDR, addr.ip().to_string());
    }

    for (name, value) in parts.headers.iter() {
        let Ok(value) = value.to_str() else {
            tracing::debug!(header = %name, "Skipping non-ASCII header value");
            continue;
        };
        let key = if name == header::CONTENT_TYPE {
            CONTENT_TYPE.to_string()
        } else if name == header::CONTENT_LENGTH {
            CONTENT_LENGTH.to_string()
        } else {
            format!("HTTP_{}", name.as_str().to_ascii_uppercase().replace('-', "_"))
        };
        // Repeated headers are folded into one comma-separated value
        let value = match environ.get_str(&key) {
            Some(earlier) => format!("{earlier}, {value}"),
            None => value.to_string(),
        };
        environ.insert(key, value);
    }

    environ
}
