//! Route table construction from configuration.

use axum::http::Method;
use thiserror::Error;

use crate::config::{HandlerConfig, RouteConfig, ServerConfig};
use crate::http::handler::{Handler, HandlerError};
use crate::routing::{RouteError, Router};

/// Error building a router from a configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{method} {pattern}: {source}")]
    Route {
        method: String,
        pattern: String,
        #[source]
        source: RouteError,
    },

    #[error("group '{prefix}': {source}")]
    Group {
        prefix: String,
        #[source]
        source: RouteError,
    },

    #[error("{method} {pattern}: invalid method")]
    Method { method: String, pattern: String },

    #[error("{context}: {source}")]
    Handler {
        context: String,
        #[source]
        source: HandlerError,
    },
}

/// Build the route table declared in `config`.
///
/// Stops at the first rejected route; the whole table is then unusable,
/// since a partially registered table would silently drop routes.
pub fn build_router(config: &ServerConfig) -> Result<Router<Handler>, BuildError> {
    let mut router = Router::new();

    for route in &config.routes {
        let (method, handlers) = prepare(route)?;
        router
            .register(method, &route.pattern, handlers)
            .map_err(|source| BuildError::Route {
                method: route.method.clone(),
                pattern: route.pattern.clone(),
                source,
            })?;
    }

    for group_config in &config.groups {
        let middleware = convert(&group_config.middleware, &format!("group '{}'", group_config.prefix))?;
        let mut group = router.group(&group_config.prefix).map_err(|source| BuildError::Group {
            prefix: group_config.prefix.clone(),
            source,
        })?;
        for handler in middleware {
            group = group.with(handler);
        }

        for route in &group_config.routes {
            let (method, handlers) = prepare(route)?;
            group
                .register(method, &route.pattern, handlers)
                .map_err(|source| BuildError::Route {
                    method: route.method.clone(),
                    pattern: format!("{}{}", group_config.prefix, route.pattern),
                    source,
                })?;
        }
    }

    tracing::info!(routes = router.len(), "Route table built");
    Ok(router)
}

fn prepare(route: &RouteConfig) -> Result<(Method, Vec<Handler>), BuildError> {
    let method = Method::from_bytes(route.method.as_bytes()).map_err(|_| BuildError::Method {
        method: route.method.clone(),
        pattern: route.pattern.clone(),
    })?;
    let handlers = convert(&route.handlers, &format!("{} {}", route.method, route.pattern))?;
    Ok((method, handlers))
}

fn convert(steps: &[HandlerConfig], context: &str) -> Result<Vec<Handler>, BuildError> {
    steps
        .iter()
        .map(|step| {
            Handler::try_from(step).map_err(|source| BuildError::Handler {
                context: context.to_string(),
                source,
            })
        })
        .collect()
}
