//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Keep one trie per HTTP method
//! - Register routes into the right trie
//! - Look up a (method, path) pair
//! - Enumerate registered routes for documentation tooling
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Explicit `None` on no match rather than a silent default
//! - Method-not-allowed is left to the caller; [`Router::allowed_methods`]
//!   gives it what it needs

use std::collections::HashMap;

use axum::http::Method;
use serde::Serialize;

use crate::routing::error::RouteError;
use crate::routing::group::Group;
use crate::routing::matcher::RouteMatch;
use crate::routing::node::MethodTree;
use crate::routing::pattern;

/// A registered route as reported by [`Router::routes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub method: String,
    pub pattern: String,
    /// Names bound by the pattern, in path order.
    pub params: Vec<String>,
    /// Length of the handler chain, middleware included.
    pub handlers: usize,
}

/// Maps (method, path) to a handler chain.
///
/// `H` is whatever the embedding server calls a handler; the router only
/// stores and returns it.
#[derive(Debug, Clone)]
pub struct Router<H> {
    trees: HashMap<Method, MethodTree<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
        }
    }

    /// Register a handler chain for `method` and `pattern`.
    ///
    /// Nothing is installed when an error is returned.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<(), RouteError> {
        let handlers: Vec<H> = handlers.into_iter().collect();
        let chain_len = handlers.len();

        let result = match self.trees.get_mut(&method) {
            Some(tree) => tree.insert(&method, pattern, handlers),
            None => {
                let mut tree = MethodTree::new();
                tree.insert(&method, pattern, handlers).map(|()| {
                    self.trees.insert(method.clone(), tree);
                })
            }
        };

        match &result {
            Ok(()) => tracing::debug!(method = %method, pattern, handlers = chain_len, "Route registered"),
            Err(e) => tracing::warn!(method = %method, pattern, error = %e, "Route rejected"),
        }
        result
    }

    /// Find the route serving `path` under `method`.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.trees.get(method)?.lookup(path)
    }

    /// Methods with a route matching `path`, sorted by name. Empty when no
    /// method matches, which callers report as 404 rather than 405.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .trees
            .iter()
            .filter(|(_, tree)| tree.lookup(path).is_some())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Every registered route, sorted by method then pattern.
    pub fn routes(&self) -> Vec<RouteDescriptor> {
        let mut routes: Vec<RouteDescriptor> = self
            .trees
            .iter()
            .flat_map(|(method, tree)| {
                tree.endpoints().into_iter().map(move |endpoint| RouteDescriptor {
                    method: method.to_string(),
                    pattern: endpoint.pattern.clone(),
                    params: endpoint.params.clone(),
                    handlers: endpoint.handlers.len(),
                })
            })
            .collect();
        routes.sort_by(|a, b| (&a.method, &a.pattern).cmp(&(&b.method, &b.pattern)));
        routes
    }

    /// Number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.trees.values().map(|tree| tree.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a registration scope under `prefix`.
    pub fn group(&mut self, prefix: &str) -> Result<Group<'_, H>, RouteError> {
        pattern::validate_group(prefix)?;
        Ok(Group::new(self, prefix.to_string(), Vec::new()))
    }

    // Convenience methods
    pub fn get(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::GET, pattern, handlers) }
    pub fn post(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::POST, pattern, handlers) }
    pub fn put(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::PUT, pattern, handlers) }
    pub fn delete(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::DELETE, pattern, handlers) }
    pub fn patch(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::PATCH, pattern, handlers) }
    pub fn head(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::HEAD, pattern, handlers) }
    pub fn options(&mut self, pattern: &str, handlers: impl IntoIterator<Item = H>) -> Result<(), RouteError> { self.register(Method::OPTIONS, pattern, handlers) }
}
