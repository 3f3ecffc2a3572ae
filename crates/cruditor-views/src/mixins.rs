//! The base cruditor mixin: shared configuration, context assembly, and the
//! login/permission gate every cruditor view runs behind.

use serde::Serialize;
use serde_json::json;

use cruditor_core::{Breadcrumb, CruditorError, CruditorResult, RequestUser, TitleButton, ViewKind};
use cruditor_forms::{Form, LoginForm};
use cruditor_http::{HttpRequest, HttpResponse};

use crate::view::render_template;

/// Shared configuration for all cruditor views.
///
/// It is a good idea to build a common config once per application and clone
/// it into each view, overriding per-view options like
/// [`required_permission`](CruditorConfig::required_permission).
#[derive(Debug, Clone, Serialize)]
pub struct CruditorConfig {
    /// Title shown in the menu bar.
    pub menu_title: String,
    /// URL the menu title links to.
    pub index_url: String,
    /// URL of the logout view.
    pub logout_url: String,
    /// URL of the change-password view, if available.
    pub change_password_url: Option<String>,
    /// Template included to render the menu.
    pub menu_template_name: String,
    /// Template included for extra head markup.
    pub extrahead_template_name: String,
    /// Template for the login page rendered in place of gated views.
    pub login_template_name: String,
    /// Whether only staff users may access the view.
    pub staff_required: bool,
    /// Permission codename required to access the view, if any.
    pub required_permission: Option<String>,
    /// Verbose name of the handled item; falls back to "Item".
    pub model_verbose_name: Option<String>,
    /// Static page title; falls back to `menu_title`.
    pub title: Option<String>,
}

impl Default for CruditorConfig {
    fn default() -> Self {
        Self {
            menu_title: "CRUDitor".to_string(),
            index_url: "#".to_string(),
            logout_url: "#".to_string(),
            change_password_url: None,
            menu_template_name: "cruditor/includes/menu.html".to_string(),
            extrahead_template_name: "cruditor/includes/extrahead.html".to_string(),
            login_template_name: "cruditor/login.html".to_string(),
            staff_required: true,
            required_permission: None,
            model_verbose_name: None,
            title: None,
        }
    }
}

/// The per-application constants exposed to every template.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CruditorConstants {
    /// Title shown in the menu bar.
    pub menu_title: String,
    /// Template included to render the menu.
    pub menu_template_name: String,
    /// Template included for extra head markup.
    pub extrahead_template_name: String,
    /// URL the menu title links to.
    pub index_url: String,
    /// URL of the logout view.
    pub logout_url: String,
    /// URL of the change-password view, if available.
    pub change_password_url: Option<String>,
}

/// The context every cruditor template renders with: page title, breadcrumb
/// trail (terminal entry included), title buttons, and menu constants.
#[derive(Debug, Clone, Serialize)]
pub struct CruditorContext {
    /// The page title.
    pub title: String,
    /// The full breadcrumb trail; the last entry is the unlinked current page.
    pub breadcrumb: Vec<Breadcrumb>,
    /// Buttons shown in the title row.
    pub titlebuttons: Vec<TitleButton>,
    /// The per-application constants.
    pub constants: CruditorConstants,
}

/// Base trait for all cruditor views.
///
/// Provides the context assembly and the login/permission gate. Concrete
/// view traits call [`guard`](CruditorView::guard) before doing any work.
pub trait CruditorView: Send + Sync {
    /// Returns the view's cruditor configuration.
    fn cruditor_config(&self) -> &CruditorConfig;

    /// The role this view plays within a collection.
    ///
    /// Declared once at construction; the collection helpers branch on it.
    fn view_kind(&self) -> ViewKind {
        ViewKind::Other
    }

    /// Returns the title of the page. Uses the configured `title`, falling
    /// back to `menu_title`.
    fn get_title(&self) -> String {
        let config = self.cruditor_config();
        config
            .title
            .clone()
            .unwrap_or_else(|| config.menu_title.clone())
    }

    /// The breadcrumb title of the current page; defaults to the page title.
    fn get_breadcrumb_title(&self) -> String {
        self.get_title()
    }

    /// The breadcrumb entries leading up to (excluding) the current page.
    fn get_breadcrumb(&self) -> Vec<Breadcrumb> {
        Vec::new()
    }

    /// The breadcrumb entries for views bound to a loaded item.
    ///
    /// Defaults to the plain trail; collection views override this to add
    /// the item's detail entry.
    fn get_object_breadcrumb(&self, _object: &serde_json::Value) -> Vec<Breadcrumb> {
        self.get_breadcrumb()
    }

    /// The buttons to display in the title row of the page.
    fn get_titlebuttons(&self) -> Vec<TitleButton> {
        Vec::new()
    }

    /// Returns the verbose name of the handled item, falling back to "Item".
    fn get_model_verbose_name(&self) -> String {
        self.cruditor_config()
            .model_verbose_name
            .clone()
            .unwrap_or_else(|| "Item".to_string())
    }

    /// The per-application constants exposed to every template.
    fn cruditor_constants(&self) -> CruditorConstants {
        let config = self.cruditor_config();
        CruditorConstants {
            menu_title: config.menu_title.clone(),
            menu_template_name: config.menu_template_name.clone(),
            extrahead_template_name: config.extrahead_template_name.clone(),
            index_url: config.index_url.clone(),
            logout_url: config.logout_url.clone(),
            change_password_url: config.change_password_url.clone(),
        }
    }

    /// Assembles the context for the cruditor templates.
    ///
    /// The optional `alternative_title` overrides both the page title and the
    /// terminal breadcrumb entry.
    fn get_cruditor_context(&self, alternative_title: Option<&str>) -> CruditorContext {
        let title = alternative_title.map_or_else(|| self.get_title(), String::from);
        let terminal =
            alternative_title.map_or_else(|| self.get_breadcrumb_title(), String::from);

        let mut breadcrumb = self.get_breadcrumb();
        breadcrumb.push(Breadcrumb::unlinked(terminal));

        CruditorContext {
            title,
            breadcrumb,
            titlebuttons: self.get_titlebuttons(),
            constants: self.cruditor_constants(),
        }
    }

    /// Assembles the context for a view bound to a loaded item.
    ///
    /// The title and the terminal breadcrumb entry are passed in because
    /// both are derived from the item (e.g. "Change: {item}" titled pages
    /// with a "Delete" terminal crumb on confirmation pages).
    fn get_object_cruditor_context(
        &self,
        object: &serde_json::Value,
        title: &str,
        breadcrumb_title: &str,
    ) -> CruditorContext {
        let mut breadcrumb = self.get_object_breadcrumb(object);
        breadcrumb.push(Breadcrumb::unlinked(breadcrumb_title));

        CruditorContext {
            title: title.to_string(),
            breadcrumb,
            titlebuttons: self.get_titlebuttons(),
            constants: self.cruditor_constants(),
        }
    }

    /// Checks that the user is active (and staff when required).
    fn ensure_logged_in(&self, user: &RequestUser) -> bool {
        user.is_active && (!self.cruditor_config().staff_required || user.is_staff)
    }

    /// Returns the permission required to access the view.
    fn get_required_permission(&self) -> Option<String> {
        self.cruditor_config().required_permission.clone()
    }

    /// Checks the required permission against the user.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::PermissionDenied`] when the user lacks it.
    fn ensure_required_permission(&self, user: &RequestUser) -> CruditorResult<()> {
        let Some(permission) = self.get_required_permission() else {
            return Ok(());
        };
        if user.has_perm(&permission) {
            Ok(())
        } else {
            Err(CruditorError::PermissionDenied(permission))
        }
    }

    /// Renders the login page in place of the gated view.
    fn handle_not_logged_in(&self, request: &HttpRequest) -> HttpResponse {
        let config = self.cruditor_config();
        let context = json!({
            "app_path": request.full_path(),
            "next_field": "next",
            "next_value": request.full_path(),
            "form": LoginForm::new().as_context(),
            "cruditor": self.get_cruditor_context(Some("Login")),
        });
        render_template(&config.login_template_name, &context).never_cache()
    }

    /// Runs the login and permission gates for a request.
    ///
    /// Returns `Some(response)` when the request must be intercepted (login
    /// page or 403), `None` when the view may proceed.
    fn guard(&self, request: &HttpRequest) -> Option<HttpResponse> {
        if !self.ensure_logged_in(request.user()) {
            tracing::debug!(path = %request.path(), "unauthenticated request, rendering login");
            return Some(self.handle_not_logged_in(request));
        }
        if let Err(error) = self.ensure_required_permission(request.user()) {
            tracing::warn!(
                user = %request.user().username,
                path = %request.path(),
                %error,
                "permission denied"
            );
            return Some(HttpResponse::forbidden(error.to_string()));
        }
        None
    }
}
