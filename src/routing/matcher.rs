//! Route matching logic.
//!
//! # Responsibilities
//! - Walk one method's tree segment by segment
//! - Bind parameter, regex and wildcard captures
//! - Report the registered pattern of the matched route
//!
//! # Design Decisions
//! - Precedence per position: static, then regex, then parameter, then
//!   wildcard. Most specific wins; the wildcard is the catch-all.
//! - Backtracking: when a more specific branch dead-ends deeper down, the
//!   next candidate at that position is tried and bindings made along the
//!   abandoned branch are dropped.
//! - Parameters never bind an empty segment and a wildcard needs at least
//!   one segment, so `/users/` does not match `/users/:id`.
//! - Read-only: safe to run concurrently from any number of threads.

use std::collections::HashMap;

use serde::Serialize;

use crate::routing::node::{Endpoint, MethodTree, Node, NodeKind};

/// Path parameters bound by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl<'a> FromIterator<(&'a str, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, String)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'r, H> {
    /// Middleware plus terminal handler, in registration order.
    pub handlers: &'r [H],
    /// Captured path parameters.
    pub params: Params,
    /// The pattern the route was registered with, not the request path.
    pub pattern: &'r str,
}

impl<H> MethodTree<H> {
    /// Find the endpoint serving `path`, with its bound parameters.
    pub(crate) fn lookup<'t>(&'t self, path: &str) -> Option<RouteMatch<'t, H>> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let mut bindings = Vec::new();
        let endpoint = find(&self.root, &segments, &mut bindings)?;

        Some(RouteMatch {
            handlers: &endpoint.handlers,
            params: bindings.into_iter().collect(),
            pattern: &endpoint.pattern,
        })
    }
}

fn find<'t, H>(
    node: &'t Node<H>,
    segments: &[&str],
    bindings: &mut Vec<(&'t str, String)>,
) -> Option<&'t Endpoint<H>> {
    let Some((&segment, rest)) = segments.split_first() else {
        return node.endpoint.as_ref();
    };

    if let Some(child) = node.statics.get(segment) {
        if let Some(endpoint) = find(child, rest, bindings) {
            return Some(endpoint);
        }
    }

    let child = node.dynamic.as_deref()?;
    match &child.kind {
        NodeKind::Regex { name, regex, .. } => {
            if segment.is_empty() || !regex.is_match(segment) {
                return None;
            }
            descend(child, name, segment, rest, bindings)
        }
        NodeKind::Param { name } => {
            if segment.is_empty() {
                return None;
            }
            descend(child, name, segment, rest, bindings)
        }
        NodeKind::Wildcard { name } => {
            let endpoint = child.endpoint.as_ref()?;
            let remainder = segments.join("/");
            if remainder.is_empty() {
                return None;
            }
            bindings.push((name.as_str(), remainder));
            Some(endpoint)
        }
        NodeKind::Root | NodeKind::Static(_) => None,
    }
}

fn descend<'t, H>(
    child: &'t Node<H>,
    name: &'t str,
    segment: &str,
    rest: &[&str],
    bindings: &mut Vec<(&'t str, String)>,
) -> Option<&'t Endpoint<H>> {
    bindings.push((name, segment.to_string()));
    let found = find(child, rest, bindings);
    if found.is_none() {
        bindings.pop();
    }
    found
}
