//! URL plan generation for collections.
//!
//! [`UrlPlan`] turns a path prefix, a name prefix, and the configured view
//! handlers into the ordered route table a collection needs, normalizing
//! trailing slashes according to an explicit policy.

use std::collections::HashSet;

use cruditor_core::{CruditorError, CruditorResult};
use cruditor_http::urls::pattern::{path, RouteHandler, URLPattern};

/// Trailing-slash policy applied to every generated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingSlash {
    /// Non-empty paths end with exactly one `/`; the empty path stays empty.
    Append,
    /// No generated path carries a trailing `/`.
    Strip,
}

/// Builder for a collection's route table.
///
/// Routes are emitted in a fixed order: list, add, change, delete, then the
/// extra detail views in the order supplied. Every route name carries the
/// name prefix.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cruditor_collection::{TrailingSlash, UrlPlan};
/// use cruditor_http::{HttpRequest, HttpResponse};
///
/// let handler: cruditor_http::urls::pattern::RouteHandler =
///     Arc::new(|_req: HttpRequest| -> cruditor_http::BoxFuture {
///         Box::pin(async { HttpResponse::ok("ok") })
///     });
///
/// let patterns = UrlPlan::new("persons", "person-")
///     .list_view(handler.clone())
///     .add_view(handler.clone())
///     .change_view(handler)
///     .build()
///     .unwrap();
///
/// let routes: Vec<(&str, Option<&str>)> =
///     patterns.iter().map(|p| (p.route(), p.name())).collect();
/// assert_eq!(routes, vec![
///     ("persons/", Some("person-list")),
///     ("persons/add/", Some("person-add")),
///     ("persons/<int:pk>/", Some("person-change")),
/// ]);
/// ```
pub struct UrlPlan {
    path_prefix: String,
    name_prefix: String,
    list_view: Option<RouteHandler>,
    add_view: Option<RouteHandler>,
    change_view: Option<RouteHandler>,
    delete_view: Option<RouteHandler>,
    extra_detail_views: Vec<(String, RouteHandler)>,
    detail_path: String,
    trailing_slash: TrailingSlash,
}

impl UrlPlan {
    /// Creates a plan with the given path and name prefixes.
    pub fn new(path_prefix: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            name_prefix: name_prefix.into(),
            list_view: None,
            add_view: None,
            change_view: None,
            delete_view: None,
            extra_detail_views: Vec::new(),
            detail_path: "<int:pk>".to_string(),
            trailing_slash: TrailingSlash::Append,
        }
    }

    /// Binds the list view at the prefix root, named `{prefix}list`.
    #[must_use]
    pub fn list_view(mut self, handler: RouteHandler) -> Self {
        self.list_view = Some(handler);
        self
    }

    /// Binds the add view at `add`, named `{prefix}add`.
    #[must_use]
    pub fn add_view(mut self, handler: RouteHandler) -> Self {
        self.add_view = Some(handler);
        self
    }

    /// Binds the change view at the detail path, named `{prefix}change`.
    #[must_use]
    pub fn change_view(mut self, handler: RouteHandler) -> Self {
        self.change_view = Some(handler);
        self
    }

    /// Binds the delete view at `{detail}/delete`, named `{prefix}delete`.
    #[must_use]
    pub fn delete_view(mut self, handler: RouteHandler) -> Self {
        self.delete_view = Some(handler);
        self
    }

    /// Binds an extra view at `{detail}/{name}`, named `{prefix}{name}`.
    ///
    /// Extra views are emitted in the order they are added.
    #[must_use]
    pub fn extra_detail_view(mut self, name: impl Into<String>, handler: RouteHandler) -> Self {
        self.extra_detail_views.push((name.into(), handler));
        self
    }

    /// Overrides the detail path template (default `<int:pk>`).
    #[must_use]
    pub fn detail_path(mut self, detail_path: impl Into<String>) -> Self {
        self.detail_path = detail_path.into();
        self
    }

    /// Sets the trailing-slash policy (default [`TrailingSlash::Append`]).
    #[must_use]
    pub fn trailing_slash(mut self, policy: TrailingSlash) -> Self {
        self.trailing_slash = policy;
        self
    }

    /// Builds the ordered route table.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::ImproperlyConfigured`] when two bindings
    /// normalize to the same final path, or when a route fails to parse.
    pub fn build(self) -> CruditorResult<Vec<URLPattern>> {
        let Self {
            mut path_prefix,
            name_prefix,
            list_view,
            add_view,
            change_view,
            delete_view,
            extra_detail_views,
            detail_path,
            trailing_slash,
        } = self;

        if !path_prefix.is_empty() && !path_prefix.ends_with('/') {
            path_prefix.push('/');
        }

        let detail_path = detail_path.trim_matches('/').to_string();

        let build_path = |suffix: &str| -> String {
            let full = format!("{path_prefix}{suffix}");
            match trailing_slash {
                TrailingSlash::Strip => full.trim_matches('/').to_string(),
                TrailingSlash::Append => {
                    if full.is_empty() || full.ends_with('/') {
                        full
                    } else {
                        format!("{full}/")
                    }
                }
            }
        };

        let mut bindings: Vec<(String, String, RouteHandler)> = Vec::new();

        if let Some(handler) = list_view {
            bindings.push((build_path(""), format!("{name_prefix}list"), handler));
        }
        if let Some(handler) = add_view {
            bindings.push((build_path("add"), format!("{name_prefix}add"), handler));
        }
        if let Some(handler) = change_view {
            bindings.push((
                build_path(&detail_path),
                format!("{name_prefix}change"),
                handler,
            ));
        }
        if let Some(handler) = delete_view {
            bindings.push((
                build_path(&format!("{detail_path}/delete")),
                format!("{name_prefix}delete"),
                handler,
            ));
        }
        for (name, handler) in extra_detail_views {
            bindings.push((
                build_path(&format!("{detail_path}/{name}")),
                format!("{name_prefix}{name}"),
                handler,
            ));
        }

        let mut seen = HashSet::new();
        for (route, _, _) in &bindings {
            if !seen.insert(route.clone()) {
                return Err(CruditorError::ImproperlyConfigured(format!(
                    "Duplicate path in URL plan: '{route}'"
                )));
            }
        }

        bindings
            .into_iter()
            .map(|(route, name, handler)| path(&route, handler, Some(&name)))
            .collect()
    }
}
