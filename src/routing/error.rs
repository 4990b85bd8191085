//! Route registration errors.

use thiserror::Error;

/// Errors returned by route registration.
///
/// Every variant describes a mistake in the route declarations themselves,
/// so callers treat them as fatal at startup. Lookups never produce these;
/// an unmatched path is simply `None`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route is empty string")]
    Empty,

    #[error("route must start with '/'")]
    MissingLeadingSlash,

    #[error("route cannot end with '/'")]
    TrailingSlash,

    #[error("illegal route, segments like //a/b not allowed")]
    EmptySegment,

    #[error("group route is empty string")]
    GroupEmpty,

    #[error("group route must start with '/'")]
    GroupMissingLeadingSlash,

    #[error("group route cannot end with '/'")]
    GroupTrailingSlash,

    #[error("illegal group route, segments like //a/b not allowed")]
    GroupEmptySegment,

    /// `:` or `:(expr)` without a name.
    #[error("missing parameter name in segment '{0}'")]
    MissingParamName(String),

    /// `:name(expr` without the closing parenthesis.
    #[error("malformed regex segment '{0}'")]
    MalformedRegexSegment(String),

    #[error("parameter '{0}' is bound more than once in the same route")]
    DuplicateParamName(String),

    #[error("wildcard must be the last segment of a route")]
    WildcardNotLast,

    #[error("regular expression error in ':{name}({expr})': {source}")]
    Regex {
        name: String,
        expr: String,
        #[source]
        source: regex::Error,
    },

    #[error("parameter route exists, cannot also register wildcard")]
    ParamThenWildcard,

    #[error("parameter route exists, cannot also register regex")]
    ParamThenRegex,

    #[error("regex route exists, cannot also register wildcard")]
    RegexThenWildcard,

    #[error("regex route exists, cannot also register parameter")]
    RegexThenParam,

    #[error("wildcard route exists, cannot also register parameter")]
    WildcardThenParam,

    #[error("wildcard route exists, cannot also register regex")]
    WildcardThenRegex,

    #[error("parameter route clash: ':{existing}' already registered, cannot register ':{new}'")]
    ParamClash { existing: String, new: String },

    #[error("regex route clash: '{existing}' already registered, cannot register '{new}'")]
    RegexClash { existing: String, new: String },

    #[error("wildcard route clash: '*{existing}' already registered, cannot register '*{new}'")]
    WildcardClash { existing: String, new: String },

    #[error("route already registered: {method} {pattern}")]
    Duplicate { method: String, pattern: String },

    #[error("route has no handlers: {method} {pattern}")]
    NoHandlers { method: String, pattern: String },
}

impl RouteError {
    /// True for the errors caused by two registrations competing for the
    /// same dynamic position in a tree.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RouteError::ParamThenWildcard
                | RouteError::ParamThenRegex
                | RouteError::RegexThenWildcard
                | RouteError::RegexThenParam
                | RouteError::WildcardThenParam
                | RouteError::WildcardThenRegex
                | RouteError::ParamClash { .. }
                | RouteError::RegexClash { .. }
                | RouteError::WildcardClash { .. }
        )
    }

    /// True for errors about the shape of a pattern or group prefix.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            RouteError::Empty
                | RouteError::MissingLeadingSlash
                | RouteError::TrailingSlash
                | RouteError::EmptySegment
                | RouteError::GroupEmpty
                | RouteError::GroupMissingLeadingSlash
                | RouteError::GroupTrailingSlash
                | RouteError::GroupEmptySegment
                | RouteError::MissingParamName(_)
                | RouteError::MalformedRegexSegment(_)
                | RouteError::DuplicateParamName(_)
                | RouteError::WildcardNotLast
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(RouteError::Empty.to_string(), "route is empty string");
        assert_eq!(
            RouteError::EmptySegment.to_string(),
            "illegal route, segments like //a/b not allowed"
        );
        assert_eq!(
            RouteError::ParamThenWildcard.to_string(),
            "parameter route exists, cannot also register wildcard"
        );

        let err = RouteError::Duplicate {
            method: "GET".into(),
            pattern: "/users/:id".into(),
        };
        assert_eq!(err.to_string(), "route already registered: GET /users/:id");
    }

    #[test]
    fn test_error_classes() {
        assert!(RouteError::RegexThenParam.is_conflict());
        assert!(!RouteError::RegexThenParam.is_malformed());
        assert!(RouteError::GroupTrailingSlash.is_malformed());
        assert!(!RouteError::Duplicate {
            method: "GET".into(),
            pattern: "/".into()
        }
        .is_conflict());
    }
}
