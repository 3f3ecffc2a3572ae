//! Value types shared by the view layer: breadcrumbs, title buttons, and the
//! view-kind tag every cruditor view carries.

use serde::Serialize;

/// The role a view plays within a CRUD collection.
///
/// Every cruditor view declares its kind once at construction; the collection
/// helpers branch on this tag to decide titles, breadcrumbs, and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// A list/table view over the whole collection.
    List,
    /// A form view creating a new item.
    Add,
    /// A form view editing an existing item.
    Change,
    /// A confirmation view deleting an existing item.
    Delete,
    /// A read-only view of a single item.
    Detail,
    /// Any other view (dashboard, logout, password change, ...).
    Other,
}

impl ViewKind {
    /// Returns `true` for kinds that operate on a single existing item.
    pub const fn has_object(self) -> bool {
        matches!(self, Self::Change | Self::Delete | Self::Detail)
    }
}

/// A single entry in a breadcrumb trail.
///
/// The last entry of a rendered trail conventionally has no URL (it is the
/// current page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// The text shown for this entry.
    pub title: String,
    /// The link target, or `None` for the current page.
    pub url: Option<String>,
}

impl Breadcrumb {
    /// Creates a linked breadcrumb entry.
    pub fn linked(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
        }
    }

    /// Creates an unlinked breadcrumb entry (the current page).
    pub fn unlinked(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
        }
    }
}

/// A button displayed in the title row of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleButton {
    /// The button label.
    pub label: String,
    /// The link target.
    pub url: String,
    /// The anchor target attribute (e.g. `"_blank"`), empty by default.
    pub target: String,
    /// The style class suffix; rendered as `btn-<button_class>`.
    pub button_class: String,
}

impl TitleButton {
    /// Creates a title button with the default "light" style.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            target: String::new(),
            button_class: "light".to_string(),
        }
    }

    /// Sets the anchor target attribute.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the style class suffix.
    #[must_use]
    pub fn with_button_class(mut self, button_class: impl Into<String>) -> Self {
        self.button_class = button_class.into();
        self
    }

    /// Returns the full CSS class for this button.
    pub fn css_class(&self) -> String {
        format!("btn-{}", self.button_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_kind_has_object() {
        assert!(ViewKind::Change.has_object());
        assert!(ViewKind::Delete.has_object());
        assert!(ViewKind::Detail.has_object());
        assert!(!ViewKind::List.has_object());
        assert!(!ViewKind::Add.has_object());
        assert!(!ViewKind::Other.has_object());
    }

    #[test]
    fn test_breadcrumb_linked() {
        let crumb = Breadcrumb::linked("Persons", "/persons/");
        assert_eq!(crumb.title, "Persons");
        assert_eq!(crumb.url.as_deref(), Some("/persons/"));
    }

    #[test]
    fn test_breadcrumb_unlinked() {
        let crumb = Breadcrumb::unlinked("Change: John");
        assert_eq!(crumb.url, None);
    }

    #[test]
    fn test_title_button_defaults() {
        let button = TitleButton::new("Add Person", "/persons/add/");
        assert_eq!(button.button_class, "light");
        assert_eq!(button.target, "");
        assert_eq!(button.css_class(), "btn-light");
    }

    #[test]
    fn test_title_button_builder() {
        let button = TitleButton::new("Export", "/persons/export/")
            .with_target("_blank")
            .with_button_class("primary");
        assert_eq!(button.target, "_blank");
        assert_eq!(button.css_class(), "btn-primary");
    }

    #[test]
    fn test_breadcrumb_serialize() {
        let crumb = Breadcrumb::linked("Persons", "/persons/");
        let json = serde_json::to_value(&crumb).unwrap();
        assert_eq!(json["title"], "Persons");
        assert_eq!(json["url"], "/persons/");

        let current = Breadcrumb::unlinked("Add Person");
        let json = serde_json::to_value(&current).unwrap();
        assert!(json["url"].is_null());
    }
}
