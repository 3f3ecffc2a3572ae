//! URL resolver and namespace support.
//!
//! [`URLResolver`] performs hierarchical URL resolution: each level matches a
//! prefix of the path and passes the remainder to its children. The
//! [`include`] function nests a pattern list under a prefix.

use std::collections::HashMap;
use std::fmt;

use cruditor_core::{CruditorError, CruditorResult};

use super::pattern::{self, RouteHandler, URLPattern};

/// The result of successfully resolving a URL path to a handler.
#[derive(Clone)]
pub struct ResolverMatch {
    /// The handler function to call.
    pub func: RouteHandler,
    /// Named keyword arguments extracted from the URL path.
    pub kwargs: HashMap<String, String>,
    /// The name of the matched URL pattern, if any.
    pub url_name: Option<String>,
    /// The instance namespaces in the resolution chain (outermost first).
    pub namespaces: Vec<String>,
    /// The matched route string.
    pub route: String,
}

impl fmt::Debug for ResolverMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverMatch")
            .field("kwargs", &self.kwargs)
            .field("url_name", &self.url_name)
            .field("namespaces", &self.namespaces)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

impl ResolverMatch {
    /// Returns the fully-qualified view name, including namespaces.
    ///
    /// For namespaces `["shop"]` and URL name `"person-list"` this returns
    /// `"shop:person-list"`.
    pub fn view_name(&self) -> String {
        let mut parts: Vec<&str> = self.namespaces.iter().map(String::as_str).collect();
        if let Some(name) = &self.url_name {
            parts.push(name);
        }
        parts.join(":")
    }
}

/// An entry in a URL configuration, either a leaf pattern or a nested resolver.
pub enum URLEntry {
    /// A leaf URL pattern that directly maps to a handler.
    Pattern(URLPattern),
    /// A nested resolver, typically created via [`include`].
    Resolver(URLResolver),
}

impl fmt::Debug for URLEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            Self::Resolver(r) => f.debug_tuple("Resolver").field(r).finish(),
        }
    }
}

/// A URL resolver that matches a prefix and delegates to child patterns.
pub struct URLResolver {
    /// The prefix pattern for this resolver
    pattern: URLPattern,
    /// Child URL patterns and sub-resolvers
    url_patterns: Vec<URLEntry>,
    /// The instance namespace for this resolver
    namespace: Option<String>,
}

impl fmt::Debug for URLResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("URLResolver")
            .field("pattern", &self.pattern)
            .field("url_patterns", &self.url_patterns)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl URLResolver {
    /// Creates a new resolver with the given prefix pattern and child entries.
    pub fn new(
        pattern: URLPattern,
        url_patterns: Vec<URLEntry>,
        namespace: Option<&str>,
    ) -> Self {
        Self {
            pattern,
            url_patterns,
            namespace: namespace.map(String::from),
        }
    }

    /// Returns the child URL entries.
    pub fn url_patterns(&self) -> &[URLEntry] {
        &self.url_patterns
    }

    /// Returns the instance namespace, if set.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Resolves a URL path to a [`ResolverMatch`].
    ///
    /// Tries each child pattern/resolver in order; for nested resolvers the
    /// matched prefix is stripped and the remainder passed down.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::NotFound`] if no pattern matches the path.
    pub fn resolve(&self, path: &str) -> CruditorResult<ResolverMatch> {
        let (prefix_kwargs, remaining) = self.pattern.match_path(path).ok_or_else(|| {
            CruditorError::NotFound(format!("No URL pattern matches '{path}'"))
        })?;

        for entry in &self.url_patterns {
            match entry {
                URLEntry::Pattern(child) => {
                    if let Some(mut kwargs) = child.full_match(&remaining) {
                        for (k, v) in &prefix_kwargs {
                            kwargs.entry(k.clone()).or_insert_with(|| v.clone());
                        }

                        let mut namespaces = Vec::new();
                        if let Some(ns) = &self.namespace {
                            namespaces.push(ns.clone());
                        }

                        return Ok(ResolverMatch {
                            func: child.callback().clone(),
                            kwargs,
                            url_name: child.name().map(String::from),
                            namespaces,
                            route: format!("{}{}", self.pattern.route(), child.route()),
                        });
                    }
                }
                URLEntry::Resolver(child) => {
                    if let Ok(mut matched) = child.resolve(&remaining) {
                        for (k, v) in &prefix_kwargs {
                            matched.kwargs.entry(k.clone()).or_insert_with(|| v.clone());
                        }
                        if let Some(ns) = &self.namespace {
                            matched.namespaces.insert(0, ns.clone());
                        }
                        matched.route = format!("{}{}", self.pattern.route(), matched.route);
                        return Ok(matched);
                    }
                }
            }
        }

        Err(CruditorError::NotFound(format!(
            "No URL pattern matches '{path}'"
        )))
    }

    /// Collects all named patterns in this resolver tree as
    /// `(qualified_name, route_template)` pairs.
    ///
    /// Used by [`reverse`](super::reverse::reverse) to find patterns by name.
    pub fn collect_named_patterns(&self) -> Vec<(String, String)> {
        let mut result = Vec::new();
        self.collect_named_patterns_inner(&mut result, &[], &[]);
        result
    }

    fn collect_named_patterns_inner(
        &self,
        result: &mut Vec<(String, String)>,
        parent_namespaces: &[String],
        parent_routes: &[String],
    ) {
        let mut namespaces: Vec<String> = parent_namespaces.to_vec();
        if let Some(ns) = &self.namespace {
            namespaces.push(ns.clone());
        }

        let mut routes: Vec<String> = parent_routes.to_vec();
        routes.push(self.pattern.route().to_string());

        for entry in &self.url_patterns {
            match entry {
                URLEntry::Pattern(child) => {
                    if let Some(name) = child.name() {
                        let qualified_name = if namespaces.is_empty() {
                            name.to_string()
                        } else {
                            format!("{}:{name}", namespaces.join(":"))
                        };
                        let full_route = format!("{}{}", routes.join(""), child.route());
                        result.push((qualified_name, full_route));
                    }
                }
                URLEntry::Resolver(child) => {
                    child.collect_named_patterns_inner(result, &namespaces, &routes);
                }
            }
        }
    }
}

/// Nests a pattern list under a prefix path, optionally with a namespace.
///
/// # Errors
///
/// Returns an error if the prefix route is invalid.
pub fn include(
    prefix: &str,
    patterns: Vec<URLEntry>,
    namespace: Option<&str>,
) -> CruditorResult<URLResolver> {
    let prefix_pattern = pattern::path_prefix(prefix)?;
    Ok(URLResolver::new(prefix_pattern, patterns, namespace))
}

/// Creates a root resolver (matches the empty prefix) with the given entries.
///
/// # Errors
///
/// Returns an error if pattern creation fails.
pub fn root(patterns: Vec<URLEntry>) -> CruditorResult<URLResolver> {
    let prefix_pattern = pattern::path_prefix("")?;
    Ok(URLResolver::new(prefix_pattern, patterns, None))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::urls::pattern::path;

    fn dummy_handler() -> RouteHandler {
        Arc::new(|_req| Box::pin(async { crate::HttpResponse::ok("ok") }))
    }

    #[test]
    fn test_resolve_simple_pattern() {
        let patterns = vec![URLEntry::Pattern(
            path("persons/", dummy_handler(), Some("person-list")).unwrap(),
        )];
        let resolver = root(patterns).unwrap();

        let matched = resolver.resolve("persons/").unwrap();
        assert_eq!(matched.url_name.as_deref(), Some("person-list"));
        assert!(matched.kwargs.is_empty());
    }

    #[test]
    fn test_resolve_with_params() {
        let patterns = vec![URLEntry::Pattern(
            path("persons/<int:pk>/", dummy_handler(), Some("person-change")).unwrap(),
        )];
        let resolver = root(patterns).unwrap();

        let matched = resolver.resolve("persons/42/").unwrap();
        assert_eq!(matched.kwargs.get("pk").unwrap(), "42");
    }

    #[test]
    fn test_resolve_not_found() {
        let resolver = root(vec![URLEntry::Pattern(
            path("persons/", dummy_handler(), None).unwrap(),
        )])
        .unwrap();
        assert!(resolver.resolve("missing/").is_err());
    }

    #[test]
    fn test_resolve_nested() {
        let inner = vec![URLEntry::Pattern(
            path("<int:pk>/", dummy_handler(), Some("detail")).unwrap(),
        )];
        let patterns = vec![URLEntry::Resolver(
            include("persons/", inner, Some("persons")).unwrap(),
        )];
        let resolver = root(patterns).unwrap();

        let matched = resolver.resolve("persons/7/").unwrap();
        assert_eq!(matched.kwargs.get("pk").unwrap(), "7");
        assert_eq!(matched.view_name(), "persons:detail");
        assert_eq!(matched.route, "persons/<int:pk>/");
    }

    #[test]
    fn test_resolve_prefix_params_merged() {
        let inner = vec![URLEntry::Pattern(
            path("members/<int:pk>/", dummy_handler(), Some("member")).unwrap(),
        )];
        let patterns = vec![URLEntry::Resolver(
            include("groups/<int:group>/", inner, None).unwrap(),
        )];
        let resolver = root(patterns).unwrap();

        let matched = resolver.resolve("groups/3/members/9/").unwrap();
        assert_eq!(matched.kwargs.get("group").unwrap(), "3");
        assert_eq!(matched.kwargs.get("pk").unwrap(), "9");
    }

    #[test]
    fn test_collect_named_patterns() {
        let inner = vec![
            URLEntry::Pattern(path("", dummy_handler(), Some("list")).unwrap()),
            URLEntry::Pattern(path("add/", dummy_handler(), Some("add")).unwrap()),
        ];
        let patterns = vec![URLEntry::Resolver(
            include("persons/", inner, Some("persons")).unwrap(),
        )];
        let resolver = root(patterns).unwrap();

        let named = resolver.collect_named_patterns();
        assert_eq!(named.len(), 2);
        assert_eq!(named[0].0, "persons:list");
        assert_eq!(named[0].1, "persons/");
        assert_eq!(named[1].0, "persons:add");
        assert_eq!(named[1].1, "persons/add/");
    }

    #[test]
    fn test_first_match_wins() {
        let patterns = vec![
            URLEntry::Pattern(path("persons/add/", dummy_handler(), Some("add")).unwrap()),
            URLEntry::Pattern(
                path("persons/<str:name>/", dummy_handler(), Some("by-name")).unwrap(),
            ),
        ];
        let resolver = root(patterns).unwrap();

        let matched = resolver.resolve("persons/add/").unwrap();
        assert_eq!(matched.url_name.as_deref(), Some("add"));
    }
}
