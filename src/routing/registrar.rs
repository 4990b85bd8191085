//! Route registration.
//!
//! # Responsibilities
//! - Parse and validate a pattern into typed segments
//! - Reject registrations that would make a position ambiguous
//! - Reject duplicate routes
//! - Install the handler chain on the terminal node
//!
//! # Design Decisions
//! - Two passes: a read-only conflict check over the live tree, then the
//!   insertion. A rejected route leaves the tree exactly as it was.
//! - The first dynamic registration at a position decides its kind; the
//!   matcher relies on this and never re-checks it.

use axum::http::Method;

use crate::routing::error::RouteError;
use crate::routing::node::{Endpoint, MethodTree, Node, NodeKind};
use crate::routing::pattern::{self, Segment};

impl<H> MethodTree<H> {
    /// Register `handlers` under `pattern`.
    pub(crate) fn insert(&mut self, method: &Method, pattern: &str, handlers: Vec<H>) -> Result<(), RouteError> {
        let segments = pattern::parse(pattern)?;
        if handlers.is_empty() {
            return Err(RouteError::NoHandlers {
                method: method.to_string(),
                pattern: pattern.to_string(),
            });
        }

        self.check(&segments, method, pattern)?;

        let params = segments
            .iter()
            .filter_map(|segment| segment.param_name().map(str::to_string))
            .collect();

        let mut node = &mut self.root;
        for segment in segments {
            node = node.child_or_insert(segment);
        }
        node.endpoint = Some(Endpoint {
            handlers,
            pattern: pattern.to_string(),
            params,
        });
        self.len += 1;

        Ok(())
    }

    /// Walk the existing tree along `segments` without mutating it.
    /// Once the walk leaves the tree every remaining node would be new and
    /// cannot conflict with anything.
    fn check(&self, segments: &[Segment], method: &Method, pattern: &str) -> Result<(), RouteError> {
        let mut node = &self.root;
        for segment in segments {
            match node.existing_child(segment)? {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }

        if node.endpoint.is_some() {
            return Err(RouteError::Duplicate {
                method: method.to_string(),
                pattern: pattern.to_string(),
            });
        }
        Ok(())
    }
}

impl<H> Node<H> {
    /// The child `segment` would descend into, if it already exists.
    fn existing_child(&self, segment: &Segment) -> Result<Option<&Node<H>>, RouteError> {
        if let Segment::Static(text) = segment {
            return Ok(self.statics.get(text));
        }

        match self.dynamic.as_deref() {
            Some(child) => {
                admit(&child.kind, segment)?;
                Ok(Some(child))
            }
            None => Ok(None),
        }
    }

    fn child_or_insert(&mut self, segment: Segment) -> &mut Node<H> {
        match segment {
            Segment::Static(text) => {
                let key = text.clone();
                self.statics
                    .entry(key)
                    .or_insert_with(|| Node::new(NodeKind::Static(text)))
            }
            dynamic => self
                .dynamic
                .get_or_insert_with(|| Box::new(Node::new(NodeKind::from(dynamic))))
                .as_mut(),
        }
    }
}

/// Decide whether a dynamic `segment` may share the position held by an
/// existing dynamic child of kind `existing`.
fn admit(existing: &NodeKind, segment: &Segment) -> Result<(), RouteError> {
    match (existing, segment) {
        (NodeKind::Param { name }, Segment::Param(new)) => {
            if name == new {
                Ok(())
            } else {
                Err(RouteError::ParamClash {
                    existing: name.clone(),
                    new: new.clone(),
                })
            }
        }
        (NodeKind::Param { .. }, Segment::Wildcard(_)) => Err(RouteError::ParamThenWildcard),
        (NodeKind::Param { .. }, Segment::Regex { .. }) => Err(RouteError::ParamThenRegex),

        (NodeKind::Regex { name, expr, .. }, Segment::Regex { name: new_name, expr: new_expr, .. }) => {
            if name == new_name && expr == new_expr {
                Ok(())
            } else {
                Err(RouteError::RegexClash {
                    existing: format!(":{name}({expr})"),
                    new: format!(":{new_name}({new_expr})"),
                })
            }
        }
        (NodeKind::Regex { .. }, Segment::Wildcard(_)) => Err(RouteError::RegexThenWildcard),
        (NodeKind::Regex { .. }, Segment::Param(_)) => Err(RouteError::RegexThenParam),

        (NodeKind::Wildcard { name }, Segment::Wildcard(new)) => {
            if name == new {
                Ok(())
            } else {
                Err(RouteError::WildcardClash {
                    existing: name.clone(),
                    new: new.clone(),
                })
            }
        }
        (NodeKind::Wildcard { .. }, Segment::Param(_)) => Err(RouteError::WildcardThenParam),
        (NodeKind::Wildcard { .. }, Segment::Regex { .. }) => Err(RouteError::WildcardThenRegex),

        // Static segments never reach the dynamic slot, and root/static
        // nodes never occupy it.
        (NodeKind::Root | NodeKind::Static(_), _) | (_, Segment::Static(_)) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(tree: &mut MethodTree<u8>, pattern: &str) -> Result<(), RouteError> {
        tree.insert(&Method::GET, pattern, vec![1])
    }

    fn node_count<H>(node: &Node<H>) -> usize {
        1 + node.statics.values().map(node_count).sum::<usize>()
            + node.dynamic.as_deref().map(node_count).unwrap_or(0)
    }

    #[test]
    fn test_insert_shares_prefixes() {
        let mut tree = MethodTree::new();
        insert(&mut tree, "/users").unwrap();
        insert(&mut tree, "/users/:id").unwrap();
        insert(&mut tree, "/users/:id/photos").unwrap();
        insert(&mut tree, "/users/me").unwrap();

        assert_eq!(tree.len, 4);
        // root, users, :id, photos, me
        assert_eq!(node_count(&tree.root), 5);
    }

    #[test]
    fn test_conflict_table() {
        let cases: &[(&str, &str, fn(&RouteError) -> bool)] = &[
            ("/a/:id", "/a/*rest", |e| matches!(e, RouteError::ParamThenWildcard)),
            ("/a/:id", "/a/:id([0-9]+)", |e| matches!(e, RouteError::ParamThenRegex)),
            ("/a/:id([0-9]+)", "/a/*rest", |e| matches!(e, RouteError::RegexThenWildcard)),
            ("/a/:id([0-9]+)", "/a/:id", |e| matches!(e, RouteError::RegexThenParam)),
            ("/a/*rest", "/a/:id", |e| matches!(e, RouteError::WildcardThenParam)),
            ("/a/*rest", "/a/:id([0-9]+)", |e| matches!(e, RouteError::WildcardThenRegex)),
            ("/a/:id", "/a/:name/b", |e| matches!(e, RouteError::ParamClash { .. })),
            ("/a/:id([0-9]+)", "/a/:id([a-z]+)", |e| matches!(e, RouteError::RegexClash { .. })),
            ("/a/:id([0-9]+)", "/a/:num([0-9]+)", |e| matches!(e, RouteError::RegexClash { .. })),
            ("/a/*rest", "/a/*path", |e| matches!(e, RouteError::WildcardClash { .. })),
        ];

        for (first, second, expected) in cases {
            let mut tree = MethodTree::new();
            insert(&mut tree, first).unwrap();
            let err = insert(&mut tree, second).unwrap_err();
            assert!(expected(&err), "{first} then {second}: unexpected {err:?}");
            assert!(err.is_conflict());
        }
    }

    #[test]
    fn test_same_dynamic_kind_is_shared() {
        let mut tree = MethodTree::new();
        insert(&mut tree, "/a/:id").unwrap();
        insert(&mut tree, "/a/:id/b").unwrap();
        insert(&mut tree, "/r/:n([0-9]+)").unwrap();
        insert(&mut tree, "/r/:n([0-9]+)/x").unwrap();
        assert_eq!(tree.len, 4);
    }

    #[test]
    fn test_static_and_dynamic_coexist() {
        let mut tree = MethodTree::new();
        insert(&mut tree, "/a/new").unwrap();
        insert(&mut tree, "/a/:id").unwrap();
        insert(&mut tree, "/b/index").unwrap();
        insert(&mut tree, "/b/*rest").unwrap();
        assert_eq!(tree.len, 4);
    }

    #[test]
    fn test_duplicate_route() {
        let mut tree = MethodTree::new();
        insert(&mut tree, "/a/:id").unwrap();
        let err = insert(&mut tree, "/a/:id").unwrap_err();
        assert!(matches!(err, RouteError::Duplicate { ref pattern, .. } if pattern == "/a/:id"));

        insert(&mut tree, "/").unwrap();
        assert!(matches!(insert(&mut tree, "/"), Err(RouteError::Duplicate { .. })));
    }

    #[test]
    fn test_rejected_route_leaves_tree_untouched() {
        let mut tree = MethodTree::new();
        insert(&mut tree, "/items/:id").unwrap();
        let before = node_count(&tree.root);

        assert!(insert(&mut tree, "/items/:id/deep/*rest/x").is_err());
        assert!(insert(&mut tree, "/other/:x/:x").is_err());
        assert!(insert(&mut tree, "/items/:name/more").is_err());

        assert_eq!(node_count(&tree.root), before);
        assert_eq!(tree.len, 1);
    }

    #[test]
    fn test_empty_handler_chain() {
        let mut tree = MethodTree::<u8>::new();
        let err = tree.insert(&Method::GET, "/a", Vec::new()).unwrap_err();
        assert!(matches!(err, RouteError::NoHandlers { .. }));
        assert_eq!(tree.len, 0);
    }

    #[test]
    fn test_endpoint_records_param_names() {
        let mut tree = MethodTree::new();
        insert(&mut tree, "/u/:id/f/:y([0-9]+)/*rest").unwrap();
        let endpoints = tree.endpoints();
        assert_eq!(endpoints[0].params, vec!["id", "y", "rest"]);
    }
}
