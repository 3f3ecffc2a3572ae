//! HTTP request type.
//!
//! [`HttpRequest`] carries the request method, path, headers, query and form
//! parameters, and the [`RequestUser`] the cruditor gates inspect.

use std::collections::HashMap;

use http::{HeaderMap, Method};

use cruditor_core::RequestUser;

use crate::querydict::QueryDict;

/// An incoming HTTP request.
///
/// Instances are typically created from an incoming axum request via
/// [`HttpRequest::from_parts`], or through the [`builder`](HttpRequest::builder)
/// in tests.
///
/// # Examples
///
/// ```
/// use cruditor_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/persons/")
///     .query_string("page=1")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.get().get("page"), Some("1"));
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    get: QueryDict,
    post: QueryDict,
    headers: HeaderMap,
    body: Vec<u8>,
    user: RequestUser,
    scheme: String,
    kwargs: HashMap<String, String>,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`].
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from http request parts and body bytes.
    ///
    /// The user starts out anonymous; the host application's authentication
    /// layer attaches the real one via [`set_user`](HttpRequest::set_user).
    pub fn from_parts(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let path = parts.uri.path().to_string();
        let query_string = parts.uri.query().unwrap_or("").to_string();
        let get = QueryDict::parse(&query_string);

        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let post = if content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        {
            QueryDict::parse(&String::from_utf8_lossy(&body))
        } else {
            QueryDict::new()
        };

        let scheme = if parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "https")
        {
            "https".to_string()
        } else {
            "http".to_string()
        };

        Self {
            method: parts.method,
            path,
            query_string,
            content_type,
            get,
            post,
            headers: parts.headers,
            body,
            user: RequestUser::anonymous(),
            scheme,
            kwargs: HashMap::new(),
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the path including the query string, suitable for a
    /// post-login redirect target.
    pub fn full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the GET query parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.get
    }

    /// Returns the POST form parameters.
    pub const fn post(&self) -> &QueryDict {
        &self.post
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the user making this request.
    pub const fn user(&self) -> &RequestUser {
        &self.user
    }

    /// Attaches the authenticated user to this request.
    pub fn set_user(&mut self, user: RequestUser) {
        self.user = user;
    }

    /// Returns `true` if the request was made over HTTPS.
    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }

    /// Returns the URL keyword arguments captured by the resolver.
    pub const fn kwargs(&self) -> &HashMap<String, String> {
        &self.kwargs
    }

    /// Returns a single URL keyword argument.
    pub fn kwarg(&self, name: &str) -> Option<&str> {
        self.kwargs.get(name).map(String::as_str)
    }

    /// Attaches the URL keyword arguments from a resolver match.
    pub fn set_kwargs(&mut self, kwargs: HashMap<String, String>) {
        self.kwargs = kwargs;
    }
}

/// Builder for [`HttpRequest`], mainly used in tests.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    user: RequestUser,
    scheme: String,
    kwargs: HashMap<String, String>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            user: RequestUser::anonymous(),
            scheme: "http".to_string(),
            kwargs: HashMap::new(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string.
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<http::header::HeaderName>(),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Attaches the requesting user.
    #[must_use]
    pub fn user(mut self, user: RequestUser) -> Self {
        self.user = user;
        self
    }

    /// Sets the scheme (`"http"` or `"https"`).
    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Adds a URL keyword argument, as the resolver would.
    #[must_use]
    pub fn kwarg(mut self, name: &str, value: &str) -> Self {
        self.kwargs.insert(name.to_string(), value.to_string());
        self
    }

    /// Builds the request, parsing GET and urlencoded POST data.
    pub fn build(self) -> HttpRequest {
        let get = QueryDict::parse(&self.query_string);
        let post = if self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        {
            QueryDict::parse(&String::from_utf8_lossy(&self.body))
        } else {
            QueryDict::new()
        };

        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            get,
            post,
            headers: self.headers,
            body: self.body,
            user: self.user,
            scheme: self.scheme,
            kwargs: self.kwargs,
        }
    }
}
