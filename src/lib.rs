//! Regex request router with a synchronous streaming handler interface.

pub mod config;
pub mod environ;
pub mod handler;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use environ::{EnvValue, Environ};
pub use handler::{DataResponse, Handler};
pub use http::HttpServer;
pub use routing::{Router, RouterError};
