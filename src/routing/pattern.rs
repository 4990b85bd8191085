//! Route pattern validation and segment parsing.
//!
//! A pattern is a `/`-separated list of segments:
//!
//! ```text
//! /users              static
//! /users/:id          parameter, matches one segment
//! /year/:y([0-9]{4})  regex-constrained parameter
//! /files/*path        wildcard, matches the rest of the path
//! ```
//!
//! Everything here runs at registration time. A pattern that gets past
//! [`parse`] is well formed and its regex segments are compiled, so the
//! tree insertion that follows cannot fail on syntax.

use std::collections::HashSet;

use regex::Regex;

use crate::routing::error::RouteError;

/// One parsed segment of a route pattern.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Static(String),
    Param(String),
    Regex { name: String, expr: String, regex: Regex },
    Wildcard(String),
}

impl Segment {
    /// Name the segment binds into the parameter map, if any.
    pub(crate) fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param(name) | Segment::Wildcard(name) => Some(name),
            Segment::Regex { name, .. } => Some(name),
        }
    }
}

/// Check the shape of a full route pattern.
pub(crate) fn validate_route(pattern: &str) -> Result<(), RouteError> {
    if pattern.is_empty() {
        return Err(RouteError::Empty);
    }
    if !pattern.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash);
    }
    if pattern == "/" {
        return Ok(());
    }
    if pattern.contains("//") {
        return Err(RouteError::EmptySegment);
    }
    if pattern.ends_with('/') {
        return Err(RouteError::TrailingSlash);
    }
    Ok(())
}

/// Check the shape of a group prefix. Unlike routes, `/` alone is not a
/// valid prefix since it would always end with a slash.
pub(crate) fn validate_group(prefix: &str) -> Result<(), RouteError> {
    if prefix.is_empty() {
        return Err(RouteError::GroupEmpty);
    }
    if !prefix.starts_with('/') {
        return Err(RouteError::GroupMissingLeadingSlash);
    }
    if prefix.contains("//") {
        return Err(RouteError::GroupEmptySegment);
    }
    if prefix.ends_with('/') {
        return Err(RouteError::GroupTrailingSlash);
    }
    Ok(())
}

/// Join a validated group prefix with a route pattern declared inside it.
/// The group's own root (`/`) resolves to the prefix itself.
pub(crate) fn join(prefix: &str, pattern: &str) -> String {
    if pattern == "/" {
        prefix.to_string()
    } else {
        format!("{prefix}{pattern}")
    }
}

/// Validate `pattern` and split it into typed segments.
pub(crate) fn parse(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    validate_route(pattern)?;

    let raw: Vec<&str> = pattern[1..].split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();

    for (i, text) in raw.iter().enumerate() {
        let segment = parse_segment(text)?;

        if matches!(segment, Segment::Wildcard(_)) && i + 1 != raw.len() {
            return Err(RouteError::WildcardNotLast);
        }
        if let Some(name) = segment.param_name() {
            if !seen.insert(name.to_string()) {
                return Err(RouteError::DuplicateParamName(name.to_string()));
            }
        }
        segments.push(segment);
    }

    Ok(segments)
}

fn parse_segment(text: &str) -> Result<Segment, RouteError> {
    if let Some(rest) = text.strip_prefix('*') {
        let name = if rest.is_empty() { "*" } else { rest };
        return Ok(Segment::Wildcard(name.to_string()));
    }

    let Some(rest) = text.strip_prefix(':') else {
        return Ok(Segment::Static(text.to_string()));
    };

    match rest.find('(') {
        None => {
            if rest.is_empty() {
                return Err(RouteError::MissingParamName(text.to_string()));
            }
            Ok(Segment::Param(rest.to_string()))
        }
        Some(open) => {
            let name = &rest[..open];
            if name.is_empty() {
                return Err(RouteError::MissingParamName(text.to_string()));
            }
            let Some(expr) = rest[open + 1..].strip_suffix(')') else {
                return Err(RouteError::MalformedRegexSegment(text.to_string()));
            };
            let regex = Regex::new(&format!("^(?:{expr})$")).map_err(|source| RouteError::Regex {
                name: name.to_string(),
                expr: expr.to_string(),
                source,
            })?;
            Ok(Segment::Regex {
                name: name.to_string(),
                expr: expr.to_string(),
                regex,
            })
        }
    }
}
