//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (add / propagate request ID)
//!     → routing::SharedRouter snapshot (method + path → handler chain)
//!     → handler.rs (run the chain, produce the response)
//!     → Send to client
//!
//! Startup and reload:
//!     ServerConfig → routes.rs (build the route table) → SharedRouter
//! ```

pub mod handler;
pub mod request;
pub mod routes;
pub mod server;

pub use handler::{Handler, HandlerError};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use routes::{build_router, BuildError};
pub use server::{HttpServer, X_MATCHED_ROUTE};
