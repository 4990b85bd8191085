//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check handler chains are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Pattern shape and route conflicts are left to the router itself, which
//!   reports them when the table is built

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::config::schema::{HandlerConfig, RouteConfig, ServerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("{route}: invalid method '{method}'")]
    Method { route: String, method: String },

    #[error("{route}: handler chain is empty")]
    EmptyChain { route: String },

    #[error("{route}: handler chain must end with 'respond' or 'echo'")]
    MissingTerminal { route: String },

    #[error("{route}: step {index} ends the chain early")]
    TerminalNotLast { route: String, index: usize },

    #[error("{route}: invalid header '{name}'")]
    Header { route: String, name: String },

    #[error("{route}: invalid status code {status}")]
    Status { route: String, status: u16 },

    #[error("group '{prefix}': middleware may not contain 'respond' or 'echo'")]
    TerminalMiddleware { prefix: String },
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(config.observability.metrics_address.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for route in &config.routes {
        validate_route(route, "", &mut errors);
    }

    for group in &config.groups {
        let label = format!("group '{}'", group.prefix);
        if group.middleware.iter().any(HandlerConfig::is_terminal) {
            errors.push(ValidationError::TerminalMiddleware {
                prefix: group.prefix.clone(),
            });
        }
        validate_steps(&label, &group.middleware, &mut errors);
        for route in &group.routes {
            validate_route(route, &group.prefix, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(route: &RouteConfig, prefix: &str, errors: &mut Vec<ValidationError>) {
    let label = format!("{} {}{}", route.method, prefix, route.pattern);

    if Method::from_bytes(route.method.as_bytes()).is_err() {
        errors.push(ValidationError::Method {
            route: label.clone(),
            method: route.method.clone(),
        });
    }

    match route.handlers.iter().position(HandlerConfig::is_terminal) {
        _ if route.handlers.is_empty() => errors.push(ValidationError::EmptyChain { route: label.clone() }),
        None => errors.push(ValidationError::MissingTerminal { route: label.clone() }),
        Some(index) if index + 1 != route.handlers.len() => {
            errors.push(ValidationError::TerminalNotLast {
                route: label.clone(),
                index,
            })
        }
        Some(_) => {}
    }

    validate_steps(&label, &route.handlers, errors);
}

fn validate_steps(label: &str, steps: &[HandlerConfig], errors: &mut Vec<ValidationError>) {
    for step in steps {
        match step {
            HandlerConfig::SetHeader { name, value } => {
                if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err() {
                    errors.push(ValidationError::Header {
                        route: label.to_string(),
                        name: name.clone(),
                    });
                }
            }
            HandlerConfig::RequireHeader { name, status } => {
                if HeaderName::from_bytes(name.as_bytes()).is_err() {
                    errors.push(ValidationError::Header {
                        route: label.to_string(),
                        name: name.clone(),
                    });
                }
                check_status(label, *status, errors);
            }
            HandlerConfig::Respond { status, content_type, .. } => {
                check_status(label, *status, errors);
                if let Some(ct) = content_type {
                    if HeaderValue::from_str(ct).is_err() {
                        errors.push(ValidationError::Header {
                            route: label.to_string(),
                            name: "content-type".to_string(),
                        });
                    }
                }
            }
            HandlerConfig::Echo => {}
        }
    }
}

fn check_status(label: &str, status: u16, errors: &mut Vec<ValidationError>) {
    if StatusCode::from_u16(status).is_err() {
        errors.push(ValidationError::Status {
            route: label.to_string(),
            status,
        });
    }
}
