//! URL path pattern parsing and matching.
//!
//! [`URLPattern`] defines a route using the `path()` syntax with
//! `<type:name>` placeholders (e.g. `persons/<int:pk>/`).

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use regex::Regex;

use cruditor_core::{CruditorError, CruditorResult};

use super::converters::Converter;

/// The type for route handler functions.
///
/// A handler is an async function from [`HttpRequest`](crate::HttpRequest)
/// to [`HttpResponse`](crate::HttpResponse), wrapped in an `Arc` so it can
/// be shared across threads.
pub type RouteHandler = Arc<dyn Fn(crate::HttpRequest) -> crate::BoxFuture + Send + Sync>;

/// A single URL pattern that matches a path and invokes a handler.
pub struct URLPattern {
    /// The original route string (e.g. `"persons/<int:pk>/"`)
    route: String,
    /// The compiled regex used for matching
    regex: Regex,
    /// An optional name for reverse URL lookup
    name: Option<String>,
    /// Named converters extracted from the route, in order
    converters: Vec<(String, Converter)>,
    /// The handler function to invoke on match
    callback: RouteHandler,
}

impl fmt::Debug for URLPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("URLPattern")
            .field("route", &self.route)
            .field("regex", &self.regex.as_str())
            .field("name", &self.name)
            .field("converters", &self.converters)
            .finish_non_exhaustive()
    }
}

impl URLPattern {
    /// Returns the original route string.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the optional name for this pattern.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the named converters for this pattern.
    pub fn converters(&self) -> &[(String, Converter)] {
        &self.converters
    }

    /// Returns a reference to the callback handler.
    pub fn callback(&self) -> &RouteHandler {
        &self.callback
    }

    /// Attempts to match the given path against this pattern.
    ///
    /// Returns `Some((matched_kwargs, remaining_path))` on success, where
    /// `matched_kwargs` maps parameter names to their string values and
    /// `remaining_path` is the part of the path after the match.
    pub fn match_path(&self, path: &str) -> Option<(HashMap<String, String>, String)> {
        let captures = self.regex.captures(path)?;
        let full_match = captures.get(0)?;

        let mut kwargs = HashMap::new();
        for (name, converter) in &self.converters {
            if let Some(m) = captures.name(name) {
                if !converter.accepts(m.as_str()) {
                    return None;
                }
                kwargs.insert(name.clone(), m.as_str().to_string());
            }
        }

        let remaining = &path[full_match.end()..];
        Some((kwargs, remaining.to_string()))
    }

    /// Attempts a full match of the path (no remaining portion allowed).
    pub fn full_match(&self, path: &str) -> Option<HashMap<String, String>> {
        let (kwargs, remaining) = self.match_path(path)?;
        if remaining.is_empty() {
            Some(kwargs)
        } else {
            None
        }
    }
}

/// Parses the `<type:name>` portion of a placeholder, returning
/// `(type_name, param_name)`. The type defaults to `"str"`.
fn parse_type_and_name(inner: &str) -> (&str, &str) {
    inner
        .find(':')
        .map_or(("str", inner), |pos| (&inner[..pos], &inner[pos + 1..]))
}

/// Converts a route with `<type:name>` placeholders into a regex string and
/// the ordered list of named converters.
fn parse_route(route: &str, anchor_end: bool) -> CruditorResult<(String, Vec<(String, Converter)>)> {
    let mut regex_parts = String::from("^");
    let mut converter_list = Vec::new();
    let mut remaining = route;

    while !remaining.is_empty() {
        if let Some(start) = remaining.find('<') {
            regex_parts.push_str(&regex::escape(&remaining[..start]));

            let end = remaining[start..].find('>').ok_or_else(|| {
                CruditorError::ImproperlyConfigured(format!(
                    "Unclosed angle bracket in route: {route}"
                ))
            })? + start;

            let inner = &remaining[start + 1..end];
            let (type_name, param_name) = parse_type_and_name(inner);

            let converter = Converter::by_name(type_name)?;
            write!(regex_parts, "(?P<{param_name}>{})", converter.regex()).ok();
            converter_list.push((param_name.to_string(), converter));

            remaining = &remaining[end + 1..];
        } else {
            regex_parts.push_str(&regex::escape(remaining));
            break;
        }
    }

    if anchor_end {
        regex_parts.push('$');
    }
    Ok((regex_parts, converter_list))
}

/// Creates a URL pattern from a route string and a handler.
///
/// The route may contain `<type:name>` placeholders; supported types are
/// `int`, `str`, `slug`, `uuid`, and `path`.
///
/// # Examples
///
/// ```
/// use cruditor_http::urls::pattern::path;
/// use cruditor_http::{HttpRequest, HttpResponse};
/// use std::sync::Arc;
///
/// let handler = Arc::new(|_req: HttpRequest| -> cruditor_http::BoxFuture {
///     Box::pin(async { HttpResponse::ok("Hello") })
/// });
///
/// let pattern = path("persons/<int:pk>/", handler, Some("person-change")).unwrap();
/// assert_eq!(pattern.name(), Some("person-change"));
/// ```
///
/// # Errors
///
/// Returns an error if the route contains unknown converter types or
/// unclosed placeholders.
pub fn path(route: &str, callback: RouteHandler, name: Option<&str>) -> CruditorResult<URLPattern> {
    let (regex_str, converter_list) = parse_route(route, true)?;
    let regex = Regex::new(&regex_str).map_err(|e| {
        CruditorError::ImproperlyConfigured(format!("Invalid pattern regex: {e}"))
    })?;

    Ok(URLPattern {
        route: route.to_string(),
        regex,
        name: name.map(String::from),
        converters: converter_list,
        callback,
    })
}

/// Creates a URL pattern for use as a prefix in a resolver.
///
/// Unlike [`path`], this pattern does not anchor to the end of the string,
/// so it can match a prefix of the URL path.
///
/// # Errors
///
/// Returns an error if the route contains unknown converter types or
/// unclosed placeholders.
pub fn path_prefix(route: &str) -> CruditorResult<URLPattern> {
    let (regex_str, converter_list) = parse_route(route, false)?;
    let regex = Regex::new(&regex_str).map_err(|e| {
        CruditorError::ImproperlyConfigured(format!("Invalid prefix pattern regex: {e}"))
    })?;

    let noop_handler: RouteHandler =
        Arc::new(|_req| Box::pin(async { crate::HttpResponse::not_found("Not found") }));

    Ok(URLPattern {
        route: route.to_string(),
        regex,
        name: None,
        converters: converter_list,
        callback: noop_handler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_handler() -> RouteHandler {
        Arc::new(|_req| Box::pin(async { crate::HttpResponse::ok("ok") }))
    }

    #[test]
    fn test_path_simple_no_params() {
        let p = path("persons/", dummy_handler(), Some("persons")).unwrap();
        assert_eq!(p.name(), Some("persons"));
        assert!(p.full_match("persons/").is_some());
        assert!(p.full_match("other/").is_none());
    }

    #[test]
    fn test_path_with_int_param() {
        let p = path("persons/<int:pk>/", dummy_handler(), None).unwrap();
        let kwargs = p.full_match("persons/42/").unwrap();
        assert_eq!(kwargs.get("pk").unwrap(), "42");
    }

    #[test]
    fn test_path_with_slug_param() {
        let p = path("posts/<slug:title>/", dummy_handler(), None).unwrap();
        let kwargs = p.full_match("posts/my-first-post/").unwrap();
        assert_eq!(kwargs.get("title").unwrap(), "my-first-post");
    }

    #[test]
    fn test_path_with_uuid_param() {
        let p = path("items/<uuid:id>/", dummy_handler(), None).unwrap();
        let kwargs = p
            .full_match("items/550e8400-e29b-41d4-a716-446655440000/")
            .unwrap();
        assert_eq!(
            kwargs.get("id").unwrap(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_path_multiple_params() {
        let p = path(
            "archive/<int:year>/<slug:title>/",
            dummy_handler(),
            Some("archive-entry"),
        )
        .unwrap();
        let kwargs = p.full_match("archive/2024/hello-world/").unwrap();
        assert_eq!(kwargs.get("year").unwrap(), "2024");
        assert_eq!(kwargs.get("title").unwrap(), "hello-world");
    }

    #[test]
    fn test_path_no_match() {
        let p = path("persons/<int:pk>/", dummy_handler(), None).unwrap();
        assert!(p.full_match("persons/abc/").is_none());
        assert!(p.full_match("items/42/").is_none());
    }

    #[test]
    fn test_path_partial_match_rejected() {
        let p = path("persons/<int:pk>/", dummy_handler(), None).unwrap();
        assert!(p.full_match("persons/42/extra").is_none());
    }

    #[test]
    fn test_path_default_str_converter() {
        let p = path("users/<username>/", dummy_handler(), None).unwrap();
        let kwargs = p.full_match("users/alice/").unwrap();
        assert_eq!(kwargs.get("username").unwrap(), "alice");
    }

    #[test]
    fn test_path_unknown_converter() {
        assert!(path("persons/<custom:pk>/", dummy_handler(), None).is_err());
    }

    #[test]
    fn test_path_unclosed_bracket() {
        assert!(path("persons/<int:pk/", dummy_handler(), None).is_err());
    }

    #[test]
    fn test_path_prefix() {
        let p = path_prefix("collection/").unwrap();
        let (kwargs, remaining) = p.match_path("collection/42/").unwrap();
        assert!(kwargs.is_empty());
        assert_eq!(remaining, "42/");
    }

    #[test]
    fn test_path_prefix_with_param() {
        let p = path_prefix("groups/<int:group>/").unwrap();
        let (kwargs, remaining) = p.match_path("groups/7/persons/").unwrap();
        assert_eq!(kwargs.get("group").unwrap(), "7");
        assert_eq!(remaining, "persons/");
    }

    #[test]
    fn test_empty_route_matches_empty_path() {
        let p = path("", dummy_handler(), Some("list")).unwrap();
        assert!(p.full_match("").is_some());
        assert!(p.full_match("anything").is_none());
    }

    #[test]
    fn test_route_accessor() {
        let p = path("persons/<int:pk>/", dummy_handler(), None).unwrap();
        assert_eq!(p.route(), "persons/<int:pk>/");
    }
}
