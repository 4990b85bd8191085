//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the route
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the route server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Top-level route declarations.
    pub routes: Vec<RouteConfig>,

    /// Prefix groups with shared middleware.
    pub groups: Vec<GroupConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A single route: method, pattern and its handler chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// HTTP method, e.g. "GET". Extension methods are accepted.
    pub method: String,

    /// Route pattern, e.g. "/users/:id".
    pub pattern: String,

    /// Steps run in order; the last one must produce the response.
    pub handlers: Vec<HandlerConfig>,
}

/// Routes sharing a prefix and a middleware chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GroupConfig {
    /// Prefix, e.g. "/api/v1". Must start with '/' and not end with '/'.
    pub prefix: String,

    /// Non-terminal steps run before every route's own handlers.
    #[serde(default)]
    pub middleware: Vec<HandlerConfig>,

    /// Routes relative to the prefix. "/" is the prefix itself.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// One step of a handler chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Add a header to the eventual response and continue.
    SetHeader { name: String, value: String },

    /// Stop with `status` when the request lacks header `name`.
    RequireHeader {
        name: String,
        #[serde(default = "default_reject_status")]
        status: u16,
    },

    /// Produce a response. `{param}` placeholders in the body are replaced
    /// with bound path parameters.
    Respond {
        #[serde(default = "default_status")]
        status: u16,
        #[serde(default)]
        body: String,
        #[serde(default)]
        content_type: Option<String>,
    },

    /// Produce a JSON description of the match (pattern, params, path).
    Echo,
}

impl HandlerConfig {
    /// Whether this step ends the chain.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandlerConfig::Respond { .. } | HandlerConfig::Echo)
    }
}

fn default_status() -> u16 {
    200
}

fn default_reject_status() -> u16 {
    401
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
