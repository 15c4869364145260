//! Fixed-data response handler.

use crate::environ::Environ;
use crate::handler::{Handler, Header, SendBody, StartResponse};

type BodyFn = dyn Fn(&Environ) -> Vec<u8> + Send + Sync;

/// Responds with a status, a content type and a body computed from the request.
///
/// The whole body is sent as a single chunk followed by the empty end-of-stream
/// chunk. An empty body sends only the end-of-stream chunk.
pub struct DataResponse {
    status_code: u16,
    status_message: String,
    content_type: String,
    headers: Vec<Header>,
    body: Box<BodyFn>,
}

impl DataResponse {
    /// `200 OK` with a body produced per request.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Environ) -> Vec<u8> + Send + Sync + 'static,
    {
        Self {
            status_code: 200,
            status_message: "OK".to_string(),
            content_type: "application/octet-stream".to_string(),
            headers: Vec::new(),
            body: Box::new(body),
        }
    }

    /// A response whose body never changes.
    pub fn fixed(status_code: u16, status_message: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::new(move |_| body.clone()).with_status(status_code, status_message)
    }

    /// The default fallback: `404 Not found`, empty body.
    pub fn not_found() -> Self {
        Self::fixed(404, "Not found", Vec::new())
    }

    pub fn with_status(mut self, status_code: u16, status_message: impl Into<String>) -> Self {
        self.status_code = status_code;
        self.status_message = status_message.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Status line as sent to `start_response`, e.g. `"404 Not found"`.
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status_code, self.status_message)
    }
}

impl std::fmt::Debug for DataResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataResponse")
            .field("status", &self.status_line())
            .field("content_type", &self.content_type)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl Handler for DataResponse {
    fn call(&self, environ: Environ, start_response: StartResponse<'_>, send_body: SendBody<'_>) {
        let data = (self.body)(&environ);

        let mut headers = Vec::with_capacity(self.headers.len() + 2);
        headers.push(("Content-Type".to_string(), self.content_type.clone()));
        headers.push(("Content-Length".to_string(), data.len().to_string()));
        headers.extend(self.headers.iter().cloned());

        start_response(&self.status_line(), &headers);
        if !data.is_empty() {
            send_body(&data);
        }
        send_body(&[]);
    }
}
