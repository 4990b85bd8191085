//! Behavioural properties of the route trie, through the public API only.

use axum::http::Method;
use route_trie::{RouteError, Router, SharedRouter};

fn router(routes: &[(Method, &str)]) -> Router<&'static str> {
    let mut router = Router::new();
    for (method, pattern) in routes {
        router.register(method.clone(), pattern, ["h"]).unwrap();
    }
    router
}

#[test]
fn test_round_trip() {
    let cases = [
        ("/", "/", vec![]),
        ("/users", "/users", vec![]),
        ("/users/:id", "/users/42", vec![("id", "42")]),
        ("/users/:id/posts/:post", "/users/7/posts/hello", vec![("id", "7"), ("post", "hello")]),
        ("/v/:ver([0-9]+)/items", "/v/2/items", vec![("ver", "2")]),
        ("/static/*file", "/static/css/site.css", vec![("file", "css/site.css")]),
        ("/any/*", "/any/thing", vec![("*", "thing")]),
    ];

    let mut router = Router::new();
    for (pattern, _, _) in &cases {
        router.get(pattern, [*pattern]).unwrap();
    }

    for (pattern, path, params) in &cases {
        let matched = router
            .match_route(&Method::GET, path)
            .unwrap_or_else(|| panic!("{path} should match {pattern}"));
        assert_eq!(matched.pattern, *pattern);
        assert_eq!(matched.handlers, &[*pattern]);
        assert_eq!(matched.params.len(), params.len(), "{path}");
        for (name, value) in params {
            assert_eq!(matched.params.get(name), Some(*value), "{path}: {name}");
        }
    }
}

#[test]
fn test_static_beats_param() {
    let router = router(&[(Method::GET, "/users/:id"), (Method::GET, "/users/a")]);

    let matched = router.match_route(&Method::GET, "/users/a").unwrap();
    assert_eq!(matched.pattern, "/users/a");
    assert!(matched.params.is_empty());

    let matched = router.match_route(&Method::GET, "/users/b").unwrap();
    assert_eq!(matched.pattern, "/users/:id");
    assert_eq!(matched.params.get("id"), Some("b"));
}

#[test]
fn test_wildcard_capture() {
    let router = router(&[(Method::GET, "/files/*path")]);

    let matched = router.match_route(&Method::GET, "/files/a/b/c").unwrap();
    assert_eq!(matched.params.get("path"), Some("a/b/c"));

    assert!(router.match_route(&Method::GET, "/files").is_none());
}

#[test]
fn test_conflict_leaves_router_untouched() {
    let mut router = router(&[(Method::GET, "/items/:id")]);

    let err = router.get("/items/*rest", ["h"]).unwrap_err();
    assert!(matches!(err, RouteError::ParamThenWildcard));
    assert!(err.is_conflict());
    assert_eq!(router.len(), 1);

    // Only the rejected wildcard could have served a multi-segment path.
    assert!(router.match_route(&Method::GET, "/items/1/2").is_none());
    assert!(router.match_route(&Method::GET, "/items/1").is_some());
}

#[test]
fn test_regex_segment() {
    let router = router(&[(Method::GET, "/year/:y([0-9]{4})")]);

    let matched = router.match_route(&Method::GET, "/year/2024").unwrap();
    assert_eq!(matched.params.get("y"), Some("2024"));

    assert!(router.match_route(&Method::GET, "/year/abcd").is_none());
    assert!(router.match_route(&Method::GET, "/year/20245").is_none());
}

#[test]
fn test_malformed_patterns_rejected() {
    let mut router: Router<&str> = Router::new();

    assert!(matches!(
        router.get("no-leading-slash", ["h"]),
        Err(RouteError::MissingLeadingSlash)
    ));
    assert!(matches!(router.get("/trailing/", ["h"]), Err(RouteError::TrailingSlash)));
    assert!(matches!(router.get("/a//b", ["h"]), Err(RouteError::EmptySegment)));
    assert!(matches!(router.get("", ["h"]), Err(RouteError::Empty)));

    assert!(router.is_empty());
    assert!(router.routes().is_empty());
}

#[test]
fn test_method_isolation() {
    let router = router(&[(Method::POST, "/orders/:id")]);

    assert!(router.match_route(&Method::GET, "/orders/1").is_none());
    assert!(router.match_route(&Method::POST, "/orders/1").is_some());
    assert_eq!(router.allowed_methods("/orders/1"), vec![Method::POST]);
}

#[test]
fn test_group_chains_middleware() {
    let mut router: Router<&str> = Router::new();
    {
        let mut api = router.group("/api").unwrap().with("auth");
        api.get("/", ["index"]).unwrap();
        let mut v1 = api.group("/v1").unwrap().with("v1");
        v1.get("/users/:id", ["user"]).unwrap();
    }

    let matched = router.match_route(&Method::GET, "/api").unwrap();
    assert_eq!(matched.handlers, &["auth", "index"]);

    let matched = router.match_route(&Method::GET, "/api/v1/users/3").unwrap();
    assert_eq!(matched.pattern, "/api/v1/users/:id");
    assert_eq!(matched.handlers, &["auth", "v1", "user"]);
}

#[test]
fn test_routes_listing_is_sorted() {
    let router = router(&[
        (Method::POST, "/b"),
        (Method::GET, "/b/:id"),
        (Method::GET, "/a"),
    ]);

    let listed: Vec<_> = router
        .routes()
        .into_iter()
        .map(|r| format!("{} {}", r.method, r.pattern))
        .collect();
    assert_eq!(listed, vec!["GET /a", "GET /b/:id", "POST /b"]);
}

#[test]
fn test_shared_router_rejects_without_publishing() {
    let shared = SharedRouter::new(router(&[(Method::GET, "/items/:id")]));
    let before = shared.load();

    assert!(shared.register(Method::GET, "/items/:other", ["h"]).is_err());
    assert!(std::sync::Arc::ptr_eq(&before, &shared.load()));

    shared.register(Method::GET, "/health", ["h"]).unwrap();
    assert_eq!(shared.load().len(), 2);
    assert_eq!(before.len(), 1);
}
