//! URL routing and resolution.
//!
//! Django-style URL handling:
//!
//! - [`pattern`]: URL pattern definitions via `path()`
//! - [`converters`]: path segment converters (`int`, `str`, `slug`, `uuid`, `path`)
//! - [`resolver`]: hierarchical URL resolution with namespace support
//! - [`reverse`]: reverse URL generation from named patterns
//!
//! # Examples
//!
//! ```
//! use cruditor_http::urls::pattern::path;
//! use cruditor_http::urls::resolver::{root, URLEntry};
//! use cruditor_http::urls::reverse::reverse;
//! use cruditor_http::{HttpRequest, HttpResponse};
//! use std::sync::Arc;
//!
//! let handler = Arc::new(|_req: HttpRequest| -> cruditor_http::BoxFuture {
//!     Box::pin(async { HttpResponse::ok("ok") })
//! });
//!
//! let patterns = vec![
//!     URLEntry::Pattern(path("persons/<int:pk>/", handler, Some("person-detail")).unwrap()),
//! ];
//! let resolver = root(patterns).unwrap();
//!
//! // Forward resolution
//! let m = resolver.resolve("persons/42/").unwrap();
//! assert_eq!(m.kwargs.get("pk").unwrap(), "42");
//!
//! // Reverse resolution
//! let url = reverse("person-detail", &["42"], &resolver).unwrap();
//! assert_eq!(url, "/persons/42/");
//! ```

pub mod converters;
pub mod pattern;
pub mod resolver;
pub mod reverse;

pub use resolver::{include, root, URLEntry, URLResolver};
pub use reverse::ReverseUrls;
