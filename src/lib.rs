//! Route trie: an HTTP request router built on per-method tries.
//!
//! The [`routing`] module is the library proper. The remaining modules wrap
//! it in a config-driven HTTP server (`route-server`) and its companion CLI
//! (`route-cli`).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Params, RouteError, RouteMatch, Router, SharedRouter};
