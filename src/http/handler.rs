//! Handler chains for config-declared routes.
//!
//! A chain is the `Vec<H>` the router stores per route. Steps run in
//! order: middleware steps either continue or stop the chain with a
//! response, and the final step produces the response.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::config::HandlerConfig;
use crate::routing::Params;

/// Errors converting a configured step into a runnable handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid header name '{0}'")]
    HeaderName(String),

    #[error("invalid header value for '{0}'")]
    HeaderValue(String),

    #[error("invalid status code {0}")]
    Status(u16),
}

/// One runnable step of a handler chain.
#[derive(Debug, Clone)]
pub enum Handler {
    SetHeader { name: HeaderName, value: HeaderValue },
    RequireHeader { name: HeaderName, status: StatusCode },
    Respond {
        status: StatusCode,
        body: String,
        content_type: Option<HeaderValue>,
    },
    Echo,
}

impl TryFrom<&HandlerConfig> for Handler {
    type Error = HandlerError;

    fn try_from(config: &HandlerConfig) -> Result<Self, Self::Error> {
        Ok(match config {
            HandlerConfig::SetHeader { name, value } => Handler::SetHeader {
                name: header_name(name)?,
                value: HeaderValue::from_str(value).map_err(|_| HandlerError::HeaderValue(name.clone()))?,
            },
            HandlerConfig::RequireHeader { name, status } => Handler::RequireHeader {
                name: header_name(name)?,
                status: status_code(*status)?,
            },
            HandlerConfig::Respond {
                status,
                body,
                content_type,
            } => Handler::Respond {
                status: status_code(*status)?,
                body: body.clone(),
                content_type: content_type
                    .as_deref()
                    .map(|ct| HeaderValue::from_str(ct).map_err(|_| HandlerError::HeaderValue("content-type".into())))
                    .transpose()?,
            },
            HandlerConfig::Echo => Handler::Echo,
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName, HandlerError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| HandlerError::HeaderName(name.to_string()))
}

fn status_code(status: u16) -> Result<StatusCode, HandlerError> {
    StatusCode::from_u16(status).map_err(|_| HandlerError::Status(status))
}

/// What a handler chain gets to see of the request.
#[derive(Debug)]
pub struct RequestInfo<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub pattern: &'a str,
    pub params: &'a Params,
}

/// Run `chain` against `request`.
///
/// A chain that runs out of steps without producing a response answers
/// `204 No Content`; config validation normally rules this out.
pub fn run_chain(chain: &[Handler], request: &RequestInfo<'_>) -> Response {
    let mut extra = HeaderMap::new();

    for step in chain {
        match step {
            Handler::SetHeader { name, value } => {
                extra.append(name.clone(), value.clone());
            }
            Handler::RequireHeader { name, status } => {
                if !request.headers.contains_key(name) {
                    tracing::debug!(pattern = request.pattern, header = %name, "Required header missing");
                    let response = (*status, format!("missing required header: {name}")).into_response();
                    return finish(response, extra);
                }
            }
            Handler::Respond {
                status,
                body,
                content_type,
            } => {
                let mut response = (*status, render(body, request.params)).into_response();
                if let Some(ct) = content_type {
                    response.headers_mut().insert(header::CONTENT_TYPE, ct.clone());
                }
                return finish(response, extra);
            }
            Handler::Echo => {
                let response = Json(serde_json::json!({
                    "method": request.method.as_str(),
                    "path": request.path,
                    "pattern": request.pattern,
                    "params": request.params,
                }))
                .into_response();
                return finish(response, extra);
            }
        }
    }

    finish(StatusCode::NO_CONTENT.into_response(), extra)
}

fn finish(mut response: Response, extra: HeaderMap) -> Response {
    response.headers_mut().extend(extra);
    response
}

/// Replace `{name}` placeholders with bound parameters.
fn render(body: &str, params: &Params) -> String {
    params
        .iter()
        .fold(body.to_string(), |acc, (name, value)| acc.replace(&format!("{{{name}}}"), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    static GET: Method = Method::GET;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request<'a>(headers: &'a HeaderMap, params: &'a Params) -> RequestInfo<'a> {
        RequestInfo {
            method: &GET,
            path: "/users/7",
            headers,
            pattern: "/users/:id",
            params,
        }
    }

    #[test]
    fn test_render() {
        let params = params(&[("id", "7"), ("tab", "photos")]);
        assert_eq!(render("user {id} / {tab} / {missing}", &params), "user 7 / photos / {missing}");
    }

    #[tokio::test]
    async fn test_chain_runs_in_order() {
        let chain = vec![
            Handler::SetHeader {
                name: HeaderName::from_static("x-served-by"),
                value: HeaderValue::from_static("route-trie"),
            },
            Handler::Respond {
                status: StatusCode::CREATED,
                body: "user {id}".into(),
                content_type: Some(HeaderValue::from_static("text/plain")),
            },
        ];
        let headers = HeaderMap::new();
        let params = params(&[("id", "7")]);

        let response = run_chain(&chain, &request(&headers, &params));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-served-by"], "route-trie");
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(body_string(response).await, "user 7");
    }

    #[tokio::test]
    async fn test_require_header_short_circuits() {
        let chain = vec![
            Handler::RequireHeader {
                name: HeaderName::from_static("authorization"),
                status: StatusCode::UNAUTHORIZED,
            },
            Handler::Echo,
        ];
        let params = params(&[("id", "7")]);

        let headers = HeaderMap::new();
        let response = run_chain(&chain, &request(&headers, &params));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer x"));
        let response = run_chain(&chain, &request(&headers, &params));
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["pattern"], "/users/:id");
        assert_eq!(json["params"]["id"], "7");
    }

    #[test]
    fn test_chain_without_terminal() {
        let headers = HeaderMap::new();
        let params = Params::default();
        let response = run_chain(&[], &request(&headers, &params));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_from_config() {
        let handler = Handler::try_from(&HandlerConfig::Respond {
            status: 404,
            body: "gone".into(),
            content_type: None,
        })
        .unwrap();
        assert!(matches!(handler, Handler::Respond { status, .. } if status == StatusCode::NOT_FOUND));

        let err = Handler::try_from(&HandlerConfig::SetHeader {
            name: "bad name".into(),
            value: "v".into(),
        })
        .unwrap_err();
        assert!(matches!(err, HandlerError::HeaderName(_)));
    }
}
