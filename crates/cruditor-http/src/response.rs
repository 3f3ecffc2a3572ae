//! HTTP response types.
//!
//! [`HttpResponse`] plus convenience constructors for the response shapes the
//! view layer produces: rendered pages, redirects, 403/404/405, and JSON.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

/// An HTTP response with a text or byte body.
///
/// All responses convert to an axum response via [`IntoResponse`].
///
/// # Examples
///
/// ```
/// use cruditor_http::HttpResponse;
///
/// let response = HttpResponse::ok("Hello, World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    charset: String,
    content_type: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with the given status code and text body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into().into_bytes(),
            charset: "utf-8".to_string(),
            content_type: "text/html".to_string(),
        }
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden(body: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, body)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Creates a 405 Method Not Allowed response listing the permitted methods.
    pub fn not_allowed(permitted_methods: &[&str]) -> Self {
        let body = format!(
            "Method Not Allowed. Permitted: {}",
            permitted_methods.join(", ")
        );
        let mut response = Self::new(StatusCode::METHOD_NOT_ALLOWED, body);
        if let Ok(value) = HeaderValue::from_str(&permitted_methods.join(", ")) {
            response.headers.insert(http::header::ALLOW, value);
        }
        response
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns a reference to the headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the body bytes.
    pub fn content_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text.
    pub fn content_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Marks this response as uncacheable.
    ///
    /// Applied to login, error, and confirmation pages so stale state is
    /// never served after authentication changes.
    #[must_use]
    pub fn never_cache(mut self) -> Self {
        if let Ok(value) = HeaderValue::from_str("max-age=0, no-cache, no-store, must-revalidate") {
            self.headers.insert(http::header::CACHE_CONTROL, value);
        }
        self
    }

    fn full_content_type(&self) -> String {
        if self.content_type.starts_with("text/") || self.content_type.contains("json") {
            format!("{}; charset={}", self.content_type, self.charset)
        } else {
            self.content_type.clone()
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let mut builder = axum::response::Response::builder().status(self.status);

        if let Ok(ct) = HeaderValue::from_str(&self.full_content_type()) {
            builder = builder.header(http::header::CONTENT_TYPE, ct);
        }

        let response = builder
            .body(axum::body::Body::from(self.body))
            .unwrap_or_else(|_| {
                axum::response::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(axum::body::Body::from("Internal Server Error"))
                    .expect("fallback response should always be valid")
            });

        let (mut parts, body) = response.into_parts();
        for (key, value) in &self.headers {
            parts.headers.insert(key, value.clone());
        }
        axum::response::Response::from_parts(parts, body)
    }
}

/// A JSON response.
///
/// Serializes the given data and sets the content type to `application/json`.
pub struct JsonResponse;

impl JsonResponse {
    /// Creates a 200 OK JSON response from any serializable value.
    pub fn new<T: serde::Serialize>(data: &T) -> HttpResponse {
        let body = serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string());
        let mut response = HttpResponse::ok(body);
        response.set_content_type("application/json");
        response
    }
}

/// A 302 Found redirect response.
pub struct HttpResponseRedirect;

impl HttpResponseRedirect {
    /// Creates a temporary redirect to the given URL.
    pub fn new(url: &str) -> HttpResponse {
        let mut response = HttpResponse::new(StatusCode::FOUND, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers_mut().insert(http::header::LOCATION, value);
        }
        response
    }
}

/// A 404 Not Found response.
pub struct HttpResponseNotFound;

impl HttpResponseNotFound {
    /// Creates a 404 response with the given body.
    pub fn new(body: impl Into<String>) -> HttpResponse {
        HttpResponse::not_found(body)
    }
}

/// A 403 Forbidden response.
pub struct HttpResponseForbidden;

impl HttpResponseForbidden {
    /// Creates a 403 response with the given body.
    pub fn new(body: impl Into<String>) -> HttpResponse {
        HttpResponse::forbidden(body)
    }
}
