//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, pattern, handlers)
//!     → pattern.rs (validate, split into typed segments, compile regexes)
//!     → registrar.rs (conflict check against the method's tree, insert)
//!     → node.rs (one trie per method)
//!
//! Incoming Request (method, path)
//!     → router.rs (pick the method's tree)
//!     → matcher.rs (static → regex → param → wildcard, with backtracking)
//!     → Return: handlers + params + registered pattern, or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Ambiguous routes rejected at registration, never resolved at match time
//! - Deterministic: same input always matches same route
//! - Runtime changes go through `shared.rs` snapshots, never in-place edits

pub mod error;
pub mod group;
pub mod matcher;
mod node;
mod pattern;
mod registrar;
pub mod router;
pub mod shared;

pub use error::RouteError;
pub use group::Group;
pub use matcher::{Params, RouteMatch};
pub use router::{RouteDescriptor, Router};
pub use shared::SharedRouter;
