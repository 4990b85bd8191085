//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::response::Response;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use route_trie::config::{parse_config, ServerConfig};
use route_trie::{HttpServer, Shutdown};

pub const CONFIG: &str = r#"
[timeouts]
request_secs = 5

[[routes]]
method = "GET"
pattern = "/users/:id"
handlers = [{ kind = "respond", body = "user {id}", content_type = "text/plain" }]

[[routes]]
method = "GET"
pattern = "/users/me"
handlers = [{ kind = "respond", body = "me" }]

[[routes]]
method = "POST"
pattern = "/users/:id"
handlers = [{ kind = "respond", status = 201, body = "created {id}" }]

[[routes]]
method = "GET"
pattern = "/year/:y([0-9]{4})"
handlers = [{ kind = "echo" }]

[[groups]]
prefix = "/admin"
middleware = [
    { kind = "require_header", name = "authorization" },
    { kind = "set_header", name = "x-area", value = "admin" },
]
routes = [{ method = "GET", pattern = "/files/*path", handlers = [{ kind = "echo" }] }]
"#;

pub fn test_config() -> ServerConfig {
    parse_config(CONFIG).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A server running on an ephemeral local port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<ServerConfig>,
    pub handle: JoinHandle<std::io::Result<()>>,
}

pub async fn spawn_server(config: ServerConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let (updates, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(server.run(listener, rx, shutdown.subscribe()));

    RunningServer {
        addr,
        shutdown,
        updates,
        handle,
    }
}
