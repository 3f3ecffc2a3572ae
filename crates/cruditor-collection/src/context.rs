//! Contextual title, breadcrumb, button, and redirect resolution for
//! collection views.
//!
//! [`CollectionConfig`] holds the list title and the optional route names of
//! a collection; its methods are pure functions over the view's declared
//! [`ViewKind`] and the current item. A route name that is unset, or set but
//! not reversible, means the derived element is omitted — never an error.

use serde_json::Value;

use cruditor_core::{Breadcrumb, TitleButton, ViewKind};
use cruditor_http::urls::ReverseUrls;
use cruditor_views::views::display_of;
use cruditor_views::CruditorView;

/// The current item of an object-bound view: its display string and the
/// identity key used as the URL argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// The display string (used as breadcrumb/detail title).
    pub title: String,
    /// The identity key (used to reverse detail/delete routes).
    pub key: String,
}

impl ItemRef {
    /// Creates an item reference.
    pub fn new(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
        }
    }

    /// Builds an item reference from a JSON row: display string plus the
    /// stringified `pk` field.
    pub fn from_object(object: &Value) -> Self {
        let key = match object.get("pk") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Self::new(display_of(object), key)
    }
}

/// Configuration of a collection: list title plus the optional route names
/// of its views.
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// Title for the collection list view.
    pub list_title: String,
    /// Route name of the list view (linked in breadcrumbs).
    pub list_urlname: Option<String>,
    /// Route name of the add view (linked in the list's title button).
    pub add_urlname: Option<String>,
    /// Route name of an item's detail page (linked in breadcrumbs and
    /// table cells).
    pub detail_urlname: Option<String>,
    /// Route name of an item's delete page (linked in the change view).
    pub delete_urlname: Option<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            list_title: "Collection".to_string(),
            list_urlname: None,
            add_urlname: None,
            detail_urlname: None,
            delete_urlname: None,
        }
    }
}

impl CollectionConfig {
    /// Creates a config with the given list title.
    pub fn new(list_title: impl Into<String>) -> Self {
        Self {
            list_title: list_title.into(),
            ..Self::default()
        }
    }

    /// Sets the list route name.
    #[must_use]
    pub fn list_urlname(mut self, name: impl Into<String>) -> Self {
        self.list_urlname = Some(name.into());
        self
    }

    /// Sets the add route name.
    #[must_use]
    pub fn add_urlname(mut self, name: impl Into<String>) -> Self {
        self.add_urlname = Some(name.into());
        self
    }

    /// Sets the detail route name.
    #[must_use]
    pub fn detail_urlname(mut self, name: impl Into<String>) -> Self {
        self.detail_urlname = Some(name.into());
        self
    }

    /// Sets the delete route name.
    #[must_use]
    pub fn delete_urlname(mut self, name: impl Into<String>) -> Self {
        self.delete_urlname = Some(name.into());
        self
    }

    /// The URL of the list view, if configured and reversible.
    pub fn list_url(&self, urls: &dyn ReverseUrls) -> Option<String> {
        self.list_urlname
            .as_deref()
            .and_then(|name| urls.reverse_url(name, &[]))
    }

    /// The URL of the add view, if configured and reversible.
    pub fn add_url(&self, urls: &dyn ReverseUrls) -> Option<String> {
        self.add_urlname
            .as_deref()
            .and_then(|name| urls.reverse_url(name, &[]))
    }

    /// The URL of an item's detail page, if configured and reversible.
    pub fn detail_url(&self, urls: &dyn ReverseUrls, item: &ItemRef) -> Option<String> {
        self.detail_urlname
            .as_deref()
            .and_then(|name| urls.reverse_url(name, &[&item.key]))
    }

    /// The URL of an item's delete page, if configured and reversible.
    ///
    /// Which view kinds actually expose the link is the caller's decision
    /// (typically only the change view).
    pub fn delete_url(&self, urls: &dyn ReverseUrls, item: Option<&ItemRef>) -> Option<String> {
        let item = item?;
        self.delete_urlname
            .as_deref()
            .and_then(|name| urls.reverse_url(name, &[&item.key]))
    }

    /// The page title derived from the view kind, or `None` when the kind
    /// carries no collection-specific title (and for object kinds without
    /// an item).
    pub fn page_title(
        &self,
        kind: ViewKind,
        item: Option<&ItemRef>,
        model_verbose_name: &str,
    ) -> Option<String> {
        match kind {
            ViewKind::List => Some(self.list_title.clone()),
            ViewKind::Add => Some(format!("Add {model_verbose_name}")),
            ViewKind::Change => item.map(|i| format!("Change: {}", i.title)),
            ViewKind::Delete => item.map(|i| format!("Delete: {}", i.title)),
            ViewKind::Detail => item.map(|i| i.title.clone()),
            ViewKind::Other => None,
        }
    }

    /// The terminal breadcrumb title, when the kind overrides it.
    ///
    /// Delete confirmations show a plain "Delete" crumb under the linked
    /// item entry.
    pub fn breadcrumb_title(kind: ViewKind) -> Option<String> {
        matches!(kind, ViewKind::Delete).then(|| "Delete".to_string())
    }

    /// Whether the trail includes the list entry: every kind but the list
    /// view itself.
    pub const fn include_list_crumb(kind: ViewKind) -> bool {
        !matches!(kind, ViewKind::List)
    }

    /// Whether the trail includes the item's detail entry: object-bound
    /// kinds with an item present.
    pub const fn include_detail_crumb(kind: ViewKind, has_item: bool) -> bool {
        !matches!(kind, ViewKind::List | ViewKind::Add) && has_item
    }

    /// The breadcrumb trail leading up to (excluding) the current page.
    ///
    /// Unset or unreversible route names omit their entry.
    pub fn trail(
        &self,
        kind: ViewKind,
        item: Option<&ItemRef>,
        urls: &dyn ReverseUrls,
    ) -> Vec<Breadcrumb> {
        let mut trail = Vec::new();

        if Self::include_list_crumb(kind) {
            if let Some(url) = self.list_url(urls) {
                trail.push(Breadcrumb::linked(self.list_title.clone(), url));
            }
        }

        if Self::include_detail_crumb(kind, item.is_some()) {
            if let Some(item) = item {
                if let Some(url) = self.detail_url(urls, item) {
                    trail.push(Breadcrumb::linked(item.title.clone(), url));
                }
            }
        }

        trail
    }

    /// The "Add {model}" title button, present only on the list view with a
    /// configured, reversible add route.
    pub fn add_button(
        &self,
        kind: ViewKind,
        label: &str,
        urls: &dyn ReverseUrls,
    ) -> Option<TitleButton> {
        if !matches!(kind, ViewKind::List) {
            return None;
        }
        self.add_url(urls)
            .map(|url| TitleButton::new(label, url))
    }

    /// The post-save redirect target derived from the view kind.
    ///
    /// Add and change views redirect to the list once a detail route is
    /// configured; delete views redirect to the list once the list route is
    /// configured. `None` falls through to the view's own success URL.
    pub fn success_url(&self, kind: ViewKind, urls: &dyn ReverseUrls) -> Option<String> {
        match kind {
            ViewKind::Add | ViewKind::Change if self.detail_urlname.is_some() => {
                self.list_url(urls)
            }
            ViewKind::Delete if self.list_urlname.is_some() => self.list_url(urls),
            _ => None,
        }
    }
}

/// Mixin trait wiring the collection decision table into a cruditor view.
///
/// Implementors provide the config and the reverse-URL collaborator; the
/// provided methods feed the view's title, breadcrumb, and button hooks.
pub trait CollectionView: CruditorView {
    /// Returns the collection configuration.
    fn collection_config(&self) -> &CollectionConfig;

    /// Returns the reverse-URL collaborator.
    fn urls(&self) -> &dyn ReverseUrls;

    /// Helper to override the collection list title.
    fn get_collection_list_title(&self) -> String {
        self.collection_config().list_title.clone()
    }

    /// Builds the item reference for a loaded row.
    fn collection_item(&self, object: &Value) -> ItemRef {
        ItemRef::from_object(object)
    }

    /// The label of the "Add" title button.
    fn get_collection_add_button_label(&self) -> String {
        format!("Add {}", self.get_model_verbose_name())
    }

    /// The page title for this view kind, falling back to the static
    /// configured title.
    fn collection_title(&self, item: Option<&ItemRef>) -> String {
        let mut config = self.collection_config().clone();
        config.list_title = self.get_collection_list_title();
        config
            .page_title(self.view_kind(), item, &self.get_model_verbose_name())
            .unwrap_or_else(|| {
                let config = self.cruditor_config();
                config
                    .title
                    .clone()
                    .unwrap_or_else(|| config.menu_title.clone())
            })
    }

    /// The terminal breadcrumb title for this view kind.
    fn collection_breadcrumb_title(&self, item: Option<&ItemRef>) -> String {
        CollectionConfig::breadcrumb_title(self.view_kind())
            .unwrap_or_else(|| self.collection_title(item))
    }

    /// The breadcrumb trail for this view kind.
    fn collection_breadcrumb(&self, item: Option<&ItemRef>) -> Vec<Breadcrumb> {
        let mut config = self.collection_config().clone();
        config.list_title = self.get_collection_list_title();
        config.trail(self.view_kind(), item, self.urls())
    }

    /// The title buttons for this view kind.
    fn collection_titlebuttons(&self) -> Vec<TitleButton> {
        self.collection_config()
            .add_button(
                self.view_kind(),
                &self.get_collection_add_button_label(),
                self.urls(),
            )
            .into_iter()
            .collect()
    }

    /// The delete link for the current item.
    fn collection_delete_url(&self, item: Option<&ItemRef>) -> Option<String> {
        self.collection_config().delete_url(self.urls(), item)
    }

    /// The post-save redirect target for this view kind.
    fn collection_success_url(&self) -> Option<String> {
        self.collection_config()
            .success_url(self.view_kind(), self.urls())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A fixed name-to-URL map; reversal substitutes the key for object
    /// routes.
    struct FixedUrls(HashMap<&'static str, &'static str>);

    impl FixedUrls {
        fn collection() -> Self {
            let mut map = HashMap::new();
            map.insert("person-list", "/persons/");
            map.insert("person-add", "/persons/add/");
            map.insert("person-detail", "/persons/{}/");
            map.insert("person-delete", "/persons/{}/delete/");
            Self(map)
        }
    }

    impl ReverseUrls for FixedUrls {
        fn reverse_url(&self, name: &str, args: &[&str]) -> Option<String> {
            self.0.get(name).map(|template| {
                args.first()
                    .map_or_else(|| (*template).to_string(), |arg| template.replace("{}", arg))
            })
        }
    }

    fn full_config() -> CollectionConfig {
        CollectionConfig::new("Persons")
            .list_urlname("person-list")
            .add_urlname("person-add")
            .detail_urlname("person-detail")
            .delete_urlname("person-delete")
    }

    fn john() -> ItemRef {
        ItemRef::new("John", "1")
    }

    #[test]
    fn test_item_ref_from_object() {
        let item = ItemRef::from_object(&serde_json::json!({"pk": 7, "name": "John"}));
        assert_eq!(item.title, "John");
        assert_eq!(item.key, "7");

        let item = ItemRef::from_object(&serde_json::json!({"pk": "a-b", "name": "X"}));
        assert_eq!(item.key, "a-b");
    }

    #[test]
    fn test_page_title_per_kind() {
        let config = full_config();
        let item = john();
        assert_eq!(
            config.page_title(ViewKind::List, None, "person").as_deref(),
            Some("Persons")
        );
        assert_eq!(
            config.page_title(ViewKind::Add, None, "person").as_deref(),
            Some("Add person")
        );
        assert_eq!(
            config
                .page_title(ViewKind::Change, Some(&item), "person")
                .as_deref(),
            Some("Change: John")
        );
        assert_eq!(
            config
                .page_title(ViewKind::Delete, Some(&item), "person")
                .as_deref(),
            Some("Delete: John")
        );
        assert_eq!(
            config
                .page_title(ViewKind::Detail, Some(&item), "person")
                .as_deref(),
            Some("John")
        );
        assert_eq!(config.page_title(ViewKind::Other, None, "person"), None);
    }

    #[test]
    fn test_change_and_delete_titles_differ_only_in_verb() {
        let config = full_config();
        let item = john();
        let change = config
            .page_title(ViewKind::Change, Some(&item), "person")
            .unwrap();
        let delete = config
            .page_title(ViewKind::Delete, Some(&item), "person")
            .unwrap();
        assert_eq!(change.strip_prefix("Change: "), Some("John"));
        assert_eq!(delete.strip_prefix("Delete: "), Some("John"));
    }

    #[test]
    fn test_breadcrumb_title_only_for_delete() {
        assert_eq!(
            CollectionConfig::breadcrumb_title(ViewKind::Delete).as_deref(),
            Some("Delete")
        );
        assert_eq!(CollectionConfig::breadcrumb_title(ViewKind::Change), None);
        assert_eq!(CollectionConfig::breadcrumb_title(ViewKind::List), None);
    }

    #[test]
    fn test_trail_empty_for_list() {
        let config = full_config();
        let urls = FixedUrls::collection();
        assert!(config.trail(ViewKind::List, None, &urls).is_empty());
    }

    #[test]
    fn test_trail_for_add_has_list_entry_only() {
        let config = full_config();
        let urls = FixedUrls::collection();
        let trail = config.trail(ViewKind::Add, None, &urls);
        assert_eq!(trail, vec![Breadcrumb::linked("Persons", "/persons/")]);
    }

    #[test]
    fn test_trail_for_object_kinds_has_two_entries() {
        let config = full_config();
        let urls = FixedUrls::collection();
        let item = john();
        for kind in [ViewKind::Change, ViewKind::Delete, ViewKind::Detail] {
            let trail = config.trail(kind, Some(&item), &urls);
            assert_eq!(
                trail,
                vec![
                    Breadcrumb::linked("Persons", "/persons/"),
                    Breadcrumb::linked("John", "/persons/1/"),
                ],
                "{kind:?}"
            );
        }
    }

    #[test]
    fn test_trail_without_item_omits_detail_entry() {
        let config = full_config();
        let urls = FixedUrls::collection();
        let trail = config.trail(ViewKind::Detail, None, &urls);
        assert_eq!(trail, vec![Breadcrumb::linked("Persons", "/persons/")]);
    }

    #[test]
    fn test_trail_without_list_urlname_still_includes_detail() {
        let config = CollectionConfig::new("Persons").detail_urlname("person-detail");
        let urls = FixedUrls::collection();
        let trail = config.trail(ViewKind::Delete, Some(&john()), &urls);
        assert_eq!(trail, vec![Breadcrumb::linked("John", "/persons/1/")]);
    }

    #[test]
    fn test_trail_unreversible_name_is_omitted() {
        let config = CollectionConfig::new("Persons")
            .list_urlname("no-such-route")
            .detail_urlname("person-detail");
        let urls = FixedUrls::collection();
        let trail = config.trail(ViewKind::Delete, Some(&john()), &urls);
        assert_eq!(trail, vec![Breadcrumb::linked("John", "/persons/1/")]);
    }

    #[test]
    fn test_add_button_on_list_only() {
        let config = full_config();
        let urls = FixedUrls::collection();

        let button = config
            .add_button(ViewKind::List, "Add person", &urls)
            .unwrap();
        assert_eq!(button.label, "Add person");
        assert_eq!(button.url, "/persons/add/");

        for kind in [
            ViewKind::Add,
            ViewKind::Change,
            ViewKind::Delete,
            ViewKind::Detail,
            ViewKind::Other,
        ] {
            assert!(config.add_button(kind, "Add person", &urls).is_none());
        }
    }

    #[test]
    fn test_add_button_requires_configured_urlname() {
        let config = CollectionConfig::new("Persons").list_urlname("person-list");
        let urls = FixedUrls::collection();
        assert!(config.add_button(ViewKind::List, "Add person", &urls).is_none());
    }

    #[test]
    fn test_delete_url_requires_item_and_urlname() {
        let config = full_config();
        let urls = FixedUrls::collection();
        assert_eq!(
            config.delete_url(&urls, Some(&john())).as_deref(),
            Some("/persons/1/delete/")
        );
        assert!(config.delete_url(&urls, None).is_none());

        let config = CollectionConfig::new("Persons");
        assert!(config.delete_url(&urls, Some(&john())).is_none());
    }

    #[test]
    fn test_success_url_per_kind() {
        let config = full_config();
        let urls = FixedUrls::collection();
        assert_eq!(
            config.success_url(ViewKind::Add, &urls).as_deref(),
            Some("/persons/")
        );
        assert_eq!(
            config.success_url(ViewKind::Change, &urls).as_deref(),
            Some("/persons/")
        );
        assert_eq!(
            config.success_url(ViewKind::Delete, &urls).as_deref(),
            Some("/persons/")
        );
        assert!(config.success_url(ViewKind::List, &urls).is_none());
        assert!(config.success_url(ViewKind::Other, &urls).is_none());
    }

    #[test]
    fn test_success_url_add_requires_detail_urlname() {
        let config = CollectionConfig::new("Persons").list_urlname("person-list");
        let urls = FixedUrls::collection();
        assert!(config.success_url(ViewKind::Add, &urls).is_none());
        assert_eq!(
            config.success_url(ViewKind::Delete, &urls).as_deref(),
            Some("/persons/")
        );
    }
}
