//! Reverse URL resolution.
//!
//! [`reverse`] generates a URL from a named URL pattern, substituting
//! positional arguments into its placeholders. The [`ReverseUrls`] trait is
//! the seam the view layer uses: it turns lookup failures into `None` so
//! optional navigation elements can simply be omitted.

use cruditor_core::{CruditorError, CruditorResult};

use super::resolver::URLResolver;

/// Generates a URL for a named pattern, substituting the given arguments.
///
/// Namespaced lookups use colon-separated names (e.g. `"shop:person-list"`).
///
/// # Errors
///
/// Returns [`CruditorError::NotFound`] if no pattern with that name exists
/// or too few arguments were provided.
///
/// # Examples
///
/// ```
/// use cruditor_http::urls::pattern::path;
/// use cruditor_http::urls::resolver::{root, URLEntry};
/// use cruditor_http::urls::reverse::reverse;
/// use cruditor_http::{HttpRequest, HttpResponse};
/// use std::sync::Arc;
///
/// let handler = Arc::new(|_req: HttpRequest| -> cruditor_http::BoxFuture {
///     Box::pin(async { HttpResponse::ok("ok") })
/// });
///
/// let patterns = vec![
///     URLEntry::Pattern(path("persons/<int:pk>/", handler, Some("person-change")).unwrap()),
/// ];
/// let resolver = root(patterns).unwrap();
///
/// let url = reverse("person-change", &["42"], &resolver).unwrap();
/// assert_eq!(url, "/persons/42/");
/// ```
pub fn reverse(viewname: &str, args: &[&str], urlconf: &URLResolver) -> CruditorResult<String> {
    for (qualified_name, route_template) in urlconf.collect_named_patterns() {
        if qualified_name == viewname {
            let url = substitute_pattern(&route_template, args)?;
            return Ok(if url.starts_with('/') {
                url
            } else {
                format!("/{url}")
            });
        }
    }

    Err(CruditorError::NotFound(format!(
        "Reverse for '{viewname}' not found"
    )))
}

/// Substitutes positional arguments into a route template string,
/// replacing `<type:name>` placeholders in order.
fn substitute_pattern(route: &str, args: &[&str]) -> CruditorResult<String> {
    let mut result = String::new();
    let mut remaining = route;
    let mut arg_index = 0;

    while !remaining.is_empty() {
        if let Some(start) = remaining.find('<') {
            result.push_str(&remaining[..start]);

            let end = remaining[start..]
                .find('>')
                .ok_or_else(|| {
                    CruditorError::ImproperlyConfigured(format!(
                        "Unclosed angle bracket in route template: {route}"
                    ))
                })?
                + start;

            if arg_index >= args.len() {
                let inner = &remaining[start + 1..end];
                let param_name = inner.find(':').map_or(inner, |pos| &inner[pos + 1..]);
                return Err(CruditorError::NotFound(format!(
                    "No value provided for parameter '{param_name}' in URL pattern"
                )));
            }
            result.push_str(args[arg_index]);
            arg_index += 1;

            remaining = &remaining[end + 1..];
        } else {
            result.push_str(remaining);
            break;
        }
    }

    Ok(result)
}

/// Reverse-URL lookup with omission semantics.
///
/// The view layer treats an unresolvable name as "leave the link out", so
/// this trait returns `Option` instead of an error.
pub trait ReverseUrls {
    /// Returns the URL for the named pattern, or `None` if it cannot be
    /// reversed.
    fn reverse_url(&self, name: &str, args: &[&str]) -> Option<String>;
}

impl ReverseUrls for URLResolver {
    fn reverse_url(&self, name: &str, args: &[&str]) -> Option<String> {
        reverse(name, args, self).ok()
    }
}

// URL plans are built from view handlers while the views themselves want to
// reverse URLs, so views typically hold the resolver behind a shared cell
// that is filled in after the plan is assembled.

impl ReverseUrls for once_cell::sync::OnceCell<URLResolver> {
    fn reverse_url(&self, name: &str, args: &[&str]) -> Option<String> {
        self.get().and_then(|resolver| resolver.reverse_url(name, args))
    }
}

impl<T: ReverseUrls + ?Sized> ReverseUrls for std::sync::Arc<T> {
    fn reverse_url(&self, name: &str, args: &[&str]) -> Option<String> {
        (**self).reverse_url(name, args)
    }
}
