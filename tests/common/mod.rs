//! Shared utilities for integration tests.

use pattern_router::environ::{PATH_INFO, QUERY_STRING, REQUEST_METHOD, SCRIPT_NAME};
use pattern_router::handler::Header;
use pattern_router::{Environ, Handler};

/// Everything a handler emitted across one or more calls.
#[derive(Debug, Default)]
pub struct Exchange {
    pub statuses: Vec<String>,
    pub headers: Vec<Vec<Header>>,
    pub chunks: Vec<Vec<u8>>,
}

impl Exchange {
    /// Last non-empty chunk as UTF-8.
    #[allow(dead_code)]
    pub fn last_body(&self) -> Option<String> {
        self.chunks
            .iter()
            .rev()
            .find(|c| !c.is_empty())
            .map(|c| String::from_utf8_lossy(c).into_owned())
    }
}

/// Invoke `handler`, appending its output to `exchange`.
pub fn call(handler: &dyn Handler, environ: Environ, exchange: &mut Exchange) {
    let Exchange {
        statuses,
        headers,
        chunks,
    } = exchange;
    handler.call(
        environ,
        &mut |status, h| {
            statuses.push(status.to_string());
            headers.push(h.to_vec());
        },
        &mut |chunk| chunks.push(chunk.to_vec()),
    );
}

/// A GET request context for `path`.
pub fn get(path: &str) -> Environ {
    Environ::new()
        .with(REQUEST_METHOD, "GET")
        .with(SCRIPT_NAME, "")
        .with(PATH_INFO, path)
}

/// A GET request context for `path` with a query string.
#[allow(dead_code)]
pub fn get_with_query(path: &str, query: &str) -> Environ {
    get(path).with(QUERY_STRING, query)
}
