//! # cruditor-views
//!
//! An admin-like CRUD experience layered on plain views: every view carries a
//! consistent context (title, breadcrumb trail, title buttons, menu
//! constants) behind a login and permission gate. Concrete view traits cover
//! list pages with tables and filters, add/change form pages with formsets,
//! delete confirmations, password changes, logout, and the 403/404 pages.

pub mod filters;
pub mod mixins;
pub mod table;
pub mod view;
pub mod views;

pub use mixins::{CruditorConfig, CruditorConstants, CruditorContext, CruditorView};
pub use table::{Column, Table, TableSpec};
pub use view::{render_template, View};
pub use views::{
    CruditorAddView, CruditorChangePasswordView, CruditorChangeView, CruditorDeleteView,
    CruditorListView, CruditorLogoutView, ForbiddenView, NotFoundView,
};
