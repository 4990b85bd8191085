//! Prefix-scoped registration.
//!
//! A group registers every route under a shared prefix and runs a shared
//! middleware chain before each route's own handlers:
//!
//! ```text
//! router.group("/api")            prefix "/api",    middleware []
//!   .with(auth)                   prefix "/api",    middleware [auth]
//!   .group("/v1")                 prefix "/api/v1", middleware [auth]
//!   .get("/users/:id", [show])    GET /api/v1/users/:id → [auth, show]
//! ```

use axum::http::Method;

use crate::routing::error::RouteError;
use crate::routing::pattern;
use crate::routing::router::Router;

/// Registration view over a [`Router`] scoped to a prefix.
pub struct Group<'r, H> {
    router: &'r mut Router<H>,
    prefix: String,
    middleware: Vec<H>,
}

impl<'r, H> Group<'r, H> {
    pub(crate) fn new(router: &'r mut Router<H>, prefix: String, middleware: Vec<H>) -> Self {
        Self {
            router,
            prefix,
            middleware,
        }
    }

    /// Full prefix of this group, including all parent prefixes.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<'r, H: Clone> Group<'r, H> {
    /// Add middleware run before the handlers of every route registered
    /// from here on.
    pub fn with(mut self, middleware: H) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Open a nested group. It inherits this group's middleware.
    pub fn group(&mut self, prefix: &str) -> Result<Group<'_, H>, RouteError> {
        pattern::validate_group(prefix)?;
        Ok(Group::new(
            &mut *self.router,
            format!("{}{}", self.prefix, prefix),
            self.middleware.clone(),
        ))
    }

    /// Register `pattern` relative to the group prefix. `/` registers the
    /// prefix itself.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<(), RouteError> {
        pattern::validate_route(pattern)?;
        let full = pattern::join(&self.prefix, pattern);

        let handlers: Vec<H> = handlers.into_iter().collect();
        if handlers.is_empty() {
            return Err(RouteError::NoHandlers {
                method: method.to_string(),
                pattern: full,
            });
        }

        let chain: Vec<H> = self.middleware.iter().cloned().chain(handlers).collect();
        self.router.register(method, &full, chain)
    }

    pub fn get(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::GET, pattern, handlers) }
    pub fn post(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::POST, pattern, handlers) }
    pub fn put(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::PUT, pattern, handlers) }
    pub fn delete(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::DELETE, pattern, handlers) }
    pub fn patch(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::PATCH, pattern, handlers) }
}
