//! Trie vertices and per-method trees.
//!
//! # Layout
//! ```text
//! MethodTree (GET)
//!   root
//!    ├── statics["users"]
//!    │     ├── statics["me"]          → endpoint "/users/me"
//!    │     └── dynamic Param(id)      → endpoint "/users/:id"
//!    │           └── statics["photos"]
//!    │                 └── dynamic Wildcard(rest) → endpoint "/users/:id/photos/*rest"
//!    └── statics["year"]
//!          └── dynamic Regex(y, [0-9]{4}) → endpoint "/year/:y([0-9]{4})"
//! ```
//!
//! A node holds any number of static children but at most one dynamic
//! child. The dynamic child's own [`NodeKind`] says whether it is a
//! parameter, regex or wildcard, so two dynamic kinds can never share a
//! position.

use std::collections::HashMap;

use regex::Regex;

use crate::routing::pattern::Segment;

/// What a node matches.
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Root,
    Static(String),
    Param { name: String },
    Regex { name: String, expr: String, regex: Regex },
    Wildcard { name: String },
}

impl From<Segment> for NodeKind {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Static(text) => NodeKind::Static(text),
            Segment::Param(name) => NodeKind::Param { name },
            Segment::Regex { name, expr, regex } => NodeKind::Regex { name, expr, regex },
            Segment::Wildcard(name) => NodeKind::Wildcard { name },
        }
    }
}

/// Data stored on the node where a registered route ends.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint<H> {
    /// Middleware followed by the terminal handler, in registration order.
    pub handlers: Vec<H>,
    /// The pattern as registered, e.g. `/users/:id/photos/*rest`.
    pub pattern: String,
    /// Parameter names bound by the pattern, in path order.
    pub params: Vec<String>,
}

/// A single trie vertex.
#[derive(Debug, Clone)]
pub(crate) struct Node<H> {
    pub kind: NodeKind,
    pub statics: HashMap<String, Node<H>>,
    pub dynamic: Option<Box<Node<H>>>,
    pub endpoint: Option<Endpoint<H>>,
}

impl<H> Node<H> {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            statics: HashMap::new(),
            dynamic: None,
            endpoint: None,
        }
    }

    /// Visit every endpoint below (and including) this node.
    pub(crate) fn for_each_endpoint<'n>(&'n self, f: &mut impl FnMut(&'n Endpoint<H>)) {
        if let Some(endpoint) = &self.endpoint {
            f(endpoint);
        }
        for child in self.statics.values() {
            child.for_each_endpoint(f);
        }
        if let Some(child) = &self.dynamic {
            child.for_each_endpoint(f);
        }
    }
}

/// The trie for one HTTP method.
#[derive(Debug, Clone)]
pub(crate) struct MethodTree<H> {
    pub root: Node<H>,
    pub len: usize,
}

impl<H> MethodTree<H> {
    pub(crate) fn new() -> Self {
        Self {
            root: Node::new(NodeKind::Root),
            len: 0,
        }
    }

    /// All endpoints registered in this tree, in no particular order.
    pub(crate) fn endpoints(&self) -> Vec<&Endpoint<H>> {
        let mut endpoints = Vec::with_capacity(self.len);
        self.root.for_each_endpoint(&mut |endpoint| endpoints.push(endpoint));
        endpoints
    }
}

impl<H> Default for MethodTree<H> {
    fn default() -> Self {
        Self::new()
    }
}
