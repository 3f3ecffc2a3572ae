//! # cruditor-http
//!
//! The HTTP layer the cruditor views are written against: request and
//! response types, query-string dictionaries, and Django-style URL routing
//! with named patterns and reverse resolution.

use std::future::Future;
use std::pin::Pin;

pub mod querydict;
pub mod request;
pub mod response;
pub mod urls;

pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{
    HttpResponse, HttpResponseForbidden, HttpResponseNotFound, HttpResponseRedirect,
    JsonResponse,
};

/// The boxed future returned by route handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;
