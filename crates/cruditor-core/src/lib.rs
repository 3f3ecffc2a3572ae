//! # cruditor-core
//!
//! Core types for the cruditor view toolkit. This crate has no HTTP or form
//! dependencies and provides the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`datastructures`] - Breadcrumbs, title buttons, and view kinds
//! - [`user`] - The request-user seam consumed by the view gates
//! - [`logging`] - Tracing-based logging integration
//! - [`text`] - Small text helpers (`capfirst`, `slugify`)

pub mod datastructures;
pub mod error;
pub mod logging;
pub mod text;
pub mod user;

// Re-export the most commonly used types at the crate root.
pub use datastructures::{Breadcrumb, TitleButton, ViewKind};
pub use error::{CruditorError, CruditorResult, ValidationError};
pub use user::RequestUser;
