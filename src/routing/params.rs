//! Parameters of an incoming request, keyed by route field name.
//!
//! Path parameters come from the matched URL pattern; query and form
//! parameters keep their order so collection fields can be rebuilt in the
//! order they were submitted.

use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure to rebuild a route from request parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("missing parameter `{0}`")]
    Missing(String),

    #[error("invalid value `{value}` for parameter `{name}`")]
    Invalid { name: String, value: String },
}

impl IntoResponse for ParamError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Decoded path, query and form parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    path: Vec<(String, String)>,
    pairs: Vec<(String, String)>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decoded path parameter.
    pub fn push_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.path.push((name.into(), value.into()));
    }

    /// Add a decoded query or form parameter.
    pub fn push_pair(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Append the pairs of an `application/x-www-form-urlencoded` string.
    pub fn extend_urlencoded(&mut self, input: &[u8]) {
        self.pairs.extend(
            url::form_urlencoded::parse(input).map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    /// Build from a query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        params.extend_urlencoded(query.as_bytes());
        params
    }

    pub fn path_value(&self, name: &str) -> Option<&str> {
        self.path
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First query/form value for `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every query/form value for `name`, in submission order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse a path parameter.
    pub fn path<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        let raw = self
            .path_value(name)
            .ok_or_else(|| ParamError::Missing(name.to_string()))?;
        parse(name, raw)
    }

    /// Parse a query/form parameter that must be present.
    pub fn required<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        self.optional(name)?
            .ok_or_else(|| ParamError::Missing(name.to_string()))
    }

    /// Parse a query/form parameter that may be absent. A blank value, as
    /// browsers submit for an empty input, counts as absent.
    pub fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>, ParamError> {
        self.value(name)
            .filter(|raw| !is_blank(raw))
            .map(|raw| parse(name, raw))
            .transpose()
    }

    /// Parse a query/form parameter, falling back to `T::default()`.
    pub fn or_default<T: FromStr + Default>(&self, name: &str) -> Result<T, ParamError> {
        Ok(self.optional(name)?.unwrap_or_default())
    }

    /// Parse every non-blank value of a repeated query/form parameter.
    pub fn list<T: FromStr>(&self, name: &str) -> Result<Vec<T>, ParamError> {
        self.values(name)
            .filter(|raw| !is_blank(raw))
            .map(|raw| parse(name, raw))
            .collect()
    }
}

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

fn parse<T: FromStr>(name: &str, raw: &str) -> Result<T, ParamError> {
    raw.parse().map_err(|_| ParamError::Invalid {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parsing() {
        let params = RouteParams::from_query("b=Hello+World&e=1&e=2&e=3&n=x");

        assert_eq!(params.required::<String>("b").unwrap(), "Hello World");
        assert_eq!(params.list::<i32>("e").unwrap(), vec![1, 2, 3]);
        assert_eq!(params.optional::<i32>("missing").unwrap(), None);
        assert_eq!(params.or_default::<i32>("missing").unwrap(), 0);
        assert_eq!(
            params.required::<i32>("missing"),
            Err(ParamError::Missing("missing".into()))
        );
        assert_eq!(
            params.required::<i32>("n"),
            Err(ParamError::Invalid {
                name: "n".into(),
                value: "x".into()
            })
        );
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let params = RouteParams::from_query("n=&s=+&tag=a&tag=&tag=b");

        assert_eq!(params.optional::<i32>("n").unwrap(), None);
        assert_eq!(params.optional::<String>("s").unwrap(), None);
        assert_eq!(params.or_default::<i32>("n").unwrap(), 0);
        assert_eq!(params.list::<String>("tag").unwrap(), vec!["a", "b"]);
        assert_eq!(params.required::<i32>("n"), Err(ParamError::Missing("n".into())));
    }

    #[test]
    fn test_path_parameters() {
        let mut params = RouteParams::new();
        params.push_path("id", "42");

        assert_eq!(params.path::<u64>("id").unwrap(), 42);
        assert!(matches!(params.path::<u64>("other"), Err(ParamError::Missing(_))));
        // path values are not query values
        assert_eq!(params.value("id"), None);
    }

    #[test]
    fn test_error_response_is_bad_request() {
        let response = ParamError::Missing("a".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
