//! The base view trait.
//!
//! [`View`] provides HTTP method dispatch with 405 defaults. Override the
//! method handlers you support and convert the view into a route handler
//! with [`as_handler`](View::as_handler).

use std::sync::Arc;

use async_trait::async_trait;

use cruditor_http::urls::pattern::RouteHandler;
use cruditor_http::{HttpRequest, HttpResponse};

/// The base trait for all views.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use cruditor_views::view::View;
/// use cruditor_http::{HttpRequest, HttpResponse};
///
/// struct MyView;
///
/// #[async_trait]
/// impl View for MyView {
///     async fn get(&self, _request: HttpRequest) -> HttpResponse {
///         HttpResponse::ok("Hello from MyView!")
///     }
/// }
/// ```
#[async_trait]
pub trait View: Send + Sync {
    /// Returns the list of HTTP methods this view allows.
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::HEAD,
            http::Method::OPTIONS,
        ]
    }

    /// Dispatches the request to the matching HTTP method handler.
    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        match *request.method() {
            http::Method::GET => self.get(request).await,
            http::Method::POST => self.post(request).await,
            http::Method::HEAD => self.head(request).await,
            http::Method::OPTIONS => self.options(request).await,
            _ => self.http_method_not_allowed(request).await,
        }
    }

    /// Handles GET requests. Returns 405 by default.
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    /// Handles POST requests. Returns 405 by default.
    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    /// Handles HEAD requests. Delegates to `get` by default.
    async fn head(&self, request: HttpRequest) -> HttpResponse {
        self.get(request).await
    }

    /// Handles OPTIONS requests by returning the allowed methods.
    async fn options(&self, _request: HttpRequest) -> HttpResponse {
        let methods = self.allowed_methods();
        let method_strs: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        let mut response = HttpResponse::ok("");
        if let Ok(value) = http::header::HeaderValue::from_str(&method_strs.join(", ")) {
            response.headers_mut().insert(http::header::ALLOW, value);
        }
        response
    }

    /// Returns a 405 Method Not Allowed response.
    async fn http_method_not_allowed(&self, _request: HttpRequest) -> HttpResponse {
        let methods = self.allowed_methods();
        let method_strs: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        HttpResponse::not_allowed(&method_strs)
    }

    /// Converts this view into a route handler for URL registration.
    #[allow(clippy::wrong_self_convention)]
    fn as_handler(self) -> RouteHandler
    where
        Self: Sized + 'static,
    {
        let view = Arc::new(self);
        Arc::new(move |request: HttpRequest| -> cruditor_http::BoxFuture {
            let view = view.clone();
            Box::pin(async move { view.dispatch(request).await })
        })
    }
}

/// Renders a template name plus JSON context into a response.
///
/// Rendering proper is delegated to the host application's template layer;
/// this fallback emits the context wrapped in a comment-tagged HTML shell so
/// the output stays inspectable end to end.
pub fn render_template(template_name: &str, context: &serde_json::Value) -> HttpResponse {
    let body = serde_json::to_string_pretty(context).unwrap_or_default();
    let html =
        format!("<!-- Template: {template_name} -->\n<html><body><pre>{body}</pre></body></html>");
    let mut response = HttpResponse::ok(html);
    response.set_content_type("text/html");
    response
}
