//! # cruditor
//!
//! Reusable admin-style CRUD views for Rust web applications.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. You can depend on `cruditor` to get the whole toolkit, or depend
//! on individual crates for finer-grained control.

/// Core types: errors, breadcrumbs, title buttons, view kinds, users.
pub use cruditor_core as core;

/// HTTP layer: request/response types, query dicts, URL routing.
pub use cruditor_http as http;

/// Forms: fields, widgets, formsets, and auth forms.
pub use cruditor_forms as forms;

/// The view layer: gated CRUD views with tables, filters, and formsets.
pub use cruditor_views as views;

/// Collection helpers: contextual titles/breadcrumbs and URL plans.
pub use cruditor_collection as collection;
