//! The remaining cruditor views: change password, logout, and the 403/404
//! pages that still carry the cruditor context.

use async_trait::async_trait;
use serde_json::json;

use cruditor_forms::{ChangePasswordForm, Form, UserStore};
use cruditor_http::{HttpRequest, HttpResponse, HttpResponseRedirect};

use crate::mixins::{CruditorConfig, CruditorView};
use crate::view::{render_template, View};

/// A login-gated view changing the requesting user's password.
#[async_trait]
pub trait CruditorChangePasswordView: View + CruditorView {
    /// Template used when rendering the change password form.
    fn template_name(&self) -> &str {
        "cruditor/form.html"
    }

    /// Title for breadcrumb and page.
    fn page_title(&self) -> String {
        "Change password".to_string()
    }

    /// The store the new password is saved through.
    fn user_store(&self) -> &dyn UserStore;

    /// Renders the form page with the password-specific button label.
    fn render_form_page(&self, form: &ChangePasswordForm) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_cruditor_context(Some(&self.page_title())),
            "form": form.as_context(),
            "form_save_button_label": "Set new password",
        });
        render_template(self.template_name(), &context)
    }

    /// Handles GET by rendering the empty form.
    async fn handle_get(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }
        self.render_form_page(&ChangePasswordForm::new())
    }

    /// Handles POST by saving the new password and redirecting back.
    async fn handle_post(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }

        let mut form = ChangePasswordForm::new();
        form.bind(request.post());
        if form.is_valid().await {
            let username = request.user().username.clone();
            match form.save(self.user_store(), &username).await {
                Ok(()) => {
                    tracing::info!(user = %username, "password changed successfully");
                    HttpResponseRedirect::new(request.path())
                }
                Err(error) => HttpResponse::server_error(error.to_string()),
            }
        } else {
            self.render_form_page(&form)
        }
    }
}

/// A view logging out the current user.
///
/// Session teardown belongs to the host application; this view renders the
/// logged-out page with the cruditor context.
#[async_trait]
pub trait CruditorLogoutView: View + CruditorView {
    /// Template used to display the logged-out info.
    fn template_name(&self) -> &str {
        "cruditor/logout.html"
    }

    /// Renders the logged-out page.
    async fn handle_get(&self, _request: HttpRequest) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_cruditor_context(Some("Logout")),
        });
        render_template(self.template_name(), &context).never_cache()
    }
}

/// The not-found page, rendered with the cruditor context so the chrome
/// stays intact.
pub struct NotFoundView {
    config: CruditorConfig,
}

impl NotFoundView {
    /// Creates the view with the given configuration.
    pub fn new(config: CruditorConfig) -> Self {
        Self { config }
    }

    /// Template used to render the 404 page.
    pub fn template_name(&self) -> &str {
        "cruditor/404.html"
    }
}

impl CruditorView for NotFoundView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.config
    }
}

#[async_trait]
impl View for NotFoundView {
    async fn dispatch(&self, _request: HttpRequest) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_cruditor_context(None),
        });
        let mut response = render_template(self.template_name(), &context).never_cache();
        response.set_status(http::StatusCode::NOT_FOUND);
        response
    }
}

/// The permission-denied page, rendered with the cruditor context.
pub struct ForbiddenView {
    config: CruditorConfig,
}

impl ForbiddenView {
    /// Creates the view with the given configuration.
    pub fn new(config: CruditorConfig) -> Self {
        Self { config }
    }

    /// Template used to render the 403 page.
    pub fn template_name(&self) -> &str {
        "cruditor/403.html"
    }
}

impl CruditorView for ForbiddenView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.config
    }
}

#[async_trait]
impl View for ForbiddenView {
    async fn dispatch(&self, _request: HttpRequest) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_cruditor_context(None),
        });
        let mut response = render_template(self.template_name(), &context).never_cache();
        response.set_status(http::StatusCode::FORBIDDEN);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cruditor_core::{CruditorResult, RequestUser};
    use std::sync::Mutex;

    struct FakeStore {
        saved: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl UserStore for FakeStore {
        async fn set_password(&self, username: &str, new_password: &str) -> CruditorResult<()> {
            if self.fail {
                return Err(cruditor_core::CruditorError::StoreError(
                    "storage offline".to_string(),
                ));
            }
            self.saved
                .lock()
                .unwrap()
                .push((username.to_string(), new_password.to_string()));
            Ok(())
        }
    }

    struct PasswordView {
        config: CruditorConfig,
        store: FakeStore,
    }

    impl PasswordView {
        fn new(fail: bool) -> Self {
            Self {
                config: CruditorConfig::default(),
                store: FakeStore {
                    saved: Mutex::new(Vec::new()),
                    fail,
                },
            }
        }
    }

    impl CruditorView for PasswordView {
        fn cruditor_config(&self) -> &CruditorConfig {
            &self.config
        }
    }

    #[async_trait]
    impl View for PasswordView {
        async fn get(&self, request: HttpRequest) -> HttpResponse {
            self.handle_get(request).await
        }

        async fn post(&self, request: HttpRequest) -> HttpResponse {
            self.handle_post(request).await
        }
    }

    #[async_trait]
    impl CruditorChangePasswordView for PasswordView {
        fn user_store(&self) -> &dyn UserStore {
            &self.store
        }
    }

    fn staff_request(method: http::Method, body: &str) -> HttpRequest {
        HttpRequest::builder()
            .method(method)
            .path("/change-password/")
            .content_type("application/x-www-form-urlencoded")
            .body(body.as_bytes().to_vec())
            .user(RequestUser::new("admin").staff())
            .build()
    }

    #[tokio::test]
    async fn test_change_password_get() {
        let view = PasswordView::new(false);
        let response = view.dispatch(staff_request(http::Method::GET, "")).await;
        let body = response.content_text();
        assert!(body.contains("Change password"));
        assert!(body.contains("Set new password"));
    }

    #[tokio::test]
    async fn test_change_password_valid_post() {
        let view = PasswordView::new(false);
        let response = view
            .dispatch(staff_request(
                http::Method::POST,
                "new_password1=correct-horse&new_password2=correct-horse",
            ))
            .await;
        assert_eq!(response.status(), http::StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get(http::header::LOCATION)
                .unwrap()
                .to_str()
                .unwrap(),
            "/change-password/"
        );
        assert_eq!(
            view.store.saved.lock().unwrap()[0],
            ("admin".to_string(), "correct-horse".to_string())
        );
    }

    #[tokio::test]
    async fn test_change_password_mismatch_rerenders() {
        let view = PasswordView::new(false);
        let response = view
            .dispatch(staff_request(
                http::Method::POST,
                "new_password1=correct-horse&new_password2=other",
            ))
            .await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.content_text().contains("didn't match"));
    }

    #[tokio::test]
    async fn test_change_password_store_failure() {
        let view = PasswordView::new(true);
        let response = view
            .dispatch(staff_request(
                http::Method::POST,
                "new_password1=correct-horse&new_password2=correct-horse",
            ))
            .await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    struct LogoutView {
        config: CruditorConfig,
    }

    impl CruditorView for LogoutView {
        fn cruditor_config(&self) -> &CruditorConfig {
            &self.config
        }
    }

    #[async_trait]
    impl View for LogoutView {
        async fn get(&self, request: HttpRequest) -> HttpResponse {
            self.handle_get(request).await
        }
    }

    #[async_trait]
    impl CruditorLogoutView for LogoutView {}

    #[tokio::test]
    async fn test_logout_renders_with_alternative_title() {
        let view = LogoutView {
            config: CruditorConfig::default(),
        };
        let response = view.dispatch(HttpRequest::builder().build()).await;
        let body = response.content_text();
        assert!(body.contains("cruditor/logout.html"));
        assert!(body.contains("Logout"));
        assert!(response
            .headers()
            .get(http::header::CACHE_CONTROL)
            .is_some());
    }

    #[tokio::test]
    async fn test_not_found_view() {
        let view = NotFoundView::new(CruditorConfig::default());
        let response = view.dispatch(HttpRequest::builder().build()).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        assert!(response.content_text().contains("cruditor/404.html"));
        assert!(response
            .headers()
            .get(http::header::CACHE_CONTROL)
            .is_some());
    }

    #[tokio::test]
    async fn test_forbidden_view() {
        let view = ForbiddenView::new(CruditorConfig::default());
        let response = view.dispatch(HttpRequest::builder().build()).await;
        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
        assert!(response.content_text().contains("cruditor/403.html"));
    }
}
