//! The concrete cruditor views.

pub mod delete;
pub mod form_views;
pub mod list;
pub mod misc;

pub use delete::CruditorDeleteView;
pub use form_views::{CruditorAddView, CruditorChangeView};
pub use list::CruditorListView;
pub use misc::{CruditorChangePasswordView, CruditorLogoutView, ForbiddenView, NotFoundView};

use serde_json::Value;

/// The display string of an item row: its `name` field when present, the
/// compact JSON otherwise.
pub fn display_of(object: &Value) -> String {
    object
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| object.to_string(), String::from)
}
