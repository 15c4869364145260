//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app sending every request to the pattern router
//! - Wire up middleware (tracing, timeout)
//! - Run the synchronous handler interface on blocking workers
//! - Bind server to listener with graceful shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::handler::Header;
use crate::http::request::environ_from_parts;
use crate::http::response::build_response;
use crate::observability::metrics;
use crate::routing::Router;

/// Body chunks buffered between a handler and the client.
const BODY_CHANNEL_CAPACITY: usize = 16;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
}

/// HTTP front end for a [`Router`].
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(router: Arc<Router>, config: ServerConfig) -> Self {
        let app = build_app(router, &config);
        Self { app, config }
    }

    /// Run the server until `shutdown` completes.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.request_timeout_secs,
            "HTTP server starting"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum app with all middleware layers.
#[allow(deprecated)]
pub fn build_app(router: Arc<Router>, config: &ServerConfig) -> axum::Router {
    axum::Router::new()
        .fallback(dispatch_handler)
        .with_state(AppState { router })
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
}

/// Route a request through the pattern router.
///
/// The router runs on a blocking worker; its status line arrives over a
/// oneshot channel and body chunks stream over a bounded channel.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let remote = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let environ = environ_from_parts(&parts, remote);
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let (head_tx, head_rx) = oneshot::channel::<(String, Vec<Header>)>();
    let (body_tx, body_rx) = mpsc::channel::<Bytes>(BODY_CHANNEL_CAPACITY);
    let router = state.router.clone();

    tokio::task::spawn_blocking(move || {
        let mut head_tx = Some(head_tx);
        let mut body_tx = Some(body_tx);
        router.dispatch(
            environ,
            &mut |status, headers| match head_tx.take() {
                Some(tx) => {
                    let _ = tx.send((status.to_string(), headers.to_vec()));
                }
                None => tracing::warn!(status = %status, "Handler started response twice, ignoring"),
            },
            &mut |chunk| {
                if chunk.is_empty() {
                    // End of stream
                    body_tx = None;
                    return;
                }
                if let Some(tx) = &body_tx {
                    if tx.blocking_send(Bytes::copy_from_slice(chunk)).is_err() {
                        // Client went away
                        body_tx = None;
                    }
                }
            },
        );
    });

    let response = match head_rx.await {
        Ok((status, headers)) => build_response(&status, &headers, body_rx),
        Err(_) => {
            tracing::error!(method = %method, path = %path, "Handler finished without a response");
            (StatusCode::INTERNAL_SERVER_ERROR, "handler produced no response").into_response()
        }
    };

    tracing::debug!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "Request dispatched"
    );
    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
