//! Response handling and transformation.
//!
//! # Responsibilities
//! - Parse the handler's status line into an HTTP status
//! - Convert handler headers, dropping invalid ones
//! - Stream body chunks received from the handler into the response body
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the entire body
//! - A status line that cannot be parsed is a server error (500)

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;

use crate::handler::Header;

/// Parse `"404 Not found"` (or a bare `"404"`) into a status code.
pub fn parse_status_line(line: &str) -> Option<StatusCode> {
    let code = line.split_whitespace().next()?;
    if code.len() != 3 {
        return None;
    }
    StatusCode::from_bytes(code.as_bytes()).ok()
}

/// Assemble the response for a handler's status, headers and body stream.
pub fn build_response(status_line: &str, headers: &[Header], body: mpsc::Receiver<Bytes>) -> Response {
    let Some(status) = parse_status_line(status_line) else {
        tracing::error!(status = %status_line, "Handler produced an invalid status line");
        return (StatusCode::INTERNAL_SERVER_ERROR, "invalid status line").into_response();
    };

    let stream = futures_util::stream::unfold(body, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    for (name, value) in headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                response_headers.append(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }
    response
}
