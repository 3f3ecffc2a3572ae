//! # cruditor-collection
//!
//! Extra defaults for views working on a collection of items: the
//! [`CollectionConfig`](context::CollectionConfig) decision table derives
//! titles, breadcrumb trails, title buttons, and redirect targets from the
//! view's declared [`ViewKind`](cruditor_core::ViewKind), and
//! [`UrlPlan`](urls::UrlPlan) generates the matching route table from a pair
//! of prefixes and the configured views.

pub mod context;
pub mod urls;

pub use context::{CollectionConfig, CollectionView, ItemRef};
pub use urls::{TrailingSlash, UrlPlan};
