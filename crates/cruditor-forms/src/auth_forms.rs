//! Login and change-password forms.
//!
//! Both wrap [`BaseForm`] with the fields and cross-field checks the
//! authentication views need. Actual credential verification and password
//! storage are delegated to the host application through [`UserStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use cruditor_core::CruditorResult;
use cruditor_http::QueryDict;

use crate::fields::{FormFieldDef, FormFieldType};
use crate::form::{BaseForm, Form};

/// The password-storage seam the change-password view saves through.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new password for the given user.
    async fn set_password(&self, username: &str, new_password: &str) -> CruditorResult<()>;
}

/// The login form: username and password.
pub struct LoginForm {
    inner: BaseForm,
}

impl LoginForm {
    /// Creates an unbound login form.
    pub fn new() -> Self {
        let inner = BaseForm::new(vec![
            FormFieldDef::new(
                "username",
                FormFieldType::Char {
                    min_length: None,
                    max_length: Some(150),
                    strip: true,
                },
            ),
            FormFieldDef::new(
                "password",
                FormFieldType::Password { min_length: None },
            ),
        ]);
        Self { inner }
    }

    /// Returns the submitted username after successful validation.
    pub fn username(&self) -> Option<String> {
        self.inner
            .cleaned_data()
            .get("username")
            .and_then(Value::as_str)
            .map(String::from)
    }

    /// Returns the submitted password after successful validation.
    pub fn password(&self) -> Option<String> {
        self.inner
            .cleaned_data()
            .get("password")
            .and_then(Value::as_str)
            .map(String::from)
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Form for LoginForm {
    fn fields(&self) -> &[FormFieldDef] {
        self.inner.fields()
    }

    fn prefix(&self) -> Option<&str> {
        self.inner.prefix()
    }

    fn bind(&mut self, data: &QueryDict) {
        self.inner.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    async fn is_valid(&mut self) -> bool {
        self.inner.is_valid().await
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.inner.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.inner.cleaned_data()
    }

    fn as_context(&self) -> Value {
        self.inner.as_context()
    }
}

/// The change-password form: two password fields that must match.
pub struct ChangePasswordForm {
    inner: BaseForm,
}

impl ChangePasswordForm {
    /// Creates an unbound change-password form.
    pub fn new() -> Self {
        let inner = BaseForm::new(vec![
            FormFieldDef::new(
                "new_password1",
                FormFieldType::Password {
                    min_length: Some(8),
                },
            )
            .label("New password"),
            FormFieldDef::new(
                "new_password2",
                FormFieldType::Password {
                    min_length: Some(8),
                },
            )
            .label("New password confirmation"),
        ]);
        Self { inner }
    }

    /// Returns the validated new password.
    pub fn new_password(&self) -> Option<String> {
        self.inner
            .cleaned_data()
            .get("new_password1")
            .and_then(Value::as_str)
            .map(String::from)
    }

    /// Persists the validated password through the given store.
    ///
    /// Call only after [`is_valid`](Form::is_valid) returned `true`.
    pub async fn save(&self, store: &dyn UserStore, username: &str) -> CruditorResult<()> {
        let password = self.new_password().unwrap_or_default();
        store.set_password(username, &password).await
    }
}

impl Default for ChangePasswordForm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Form for ChangePasswordForm {
    fn fields(&self) -> &[FormFieldDef] {
        self.inner.fields()
    }

    fn prefix(&self) -> Option<&str> {
        self.inner.prefix()
    }

    fn bind(&mut self, data: &QueryDict) {
        self.inner.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    async fn is_valid(&mut self) -> bool {
        let mut valid = self.inner.is_valid().await;

        let p1 = self.inner.cleaned_data().get("new_password1").cloned();
        let p2 = self.inner.cleaned_data().get("new_password2").cloned();
        if let (Some(p1), Some(p2)) = (p1, p2) {
            if p1 != p2 {
                self.inner
                    .add_error("The two password fields didn't match.");
                valid = false;
            }
        }

        valid
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.inner.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.inner.cleaned_data()
    }

    fn as_context(&self) -> Value {
        self.inner.as_context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    struct RecordingStore {
        saved: Mutex<Vec<(String, String)>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl UserStore for RecordingStore {
        async fn set_password(&self, username: &str, new_password: &str) -> CruditorResult<()> {
            self.saved
                .lock()
                .unwrap()
                .push((username.to_string(), new_password.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_login_form_valid() {
        let mut form = LoginForm::new();
        form.bind(&QueryDict::parse("username=admin&password=secret123"));
        assert!(form.is_valid().await);
        assert_eq!(form.username().as_deref(), Some("admin"));
        assert_eq!(form.password().as_deref(), Some("secret123"));
    }

    #[tokio::test]
    async fn test_login_form_missing_fields() {
        let mut form = LoginForm::new();
        form.bind(&QueryDict::parse("username=admin"));
        assert!(!form.is_valid().await);
        assert!(form.errors().contains_key("password"));
    }

    #[tokio::test]
    async fn test_change_password_form_valid() {
        let mut form = ChangePasswordForm::new();
        form.bind(&QueryDict::parse(
            "new_password1=correct-horse&new_password2=correct-horse",
        ));
        assert!(form.is_valid().await);
        assert_eq!(form.new_password().as_deref(), Some("correct-horse"));
    }

    #[tokio::test]
    async fn test_change_password_form_mismatch() {
        let mut form = ChangePasswordForm::new();
        form.bind(&QueryDict::parse(
            "new_password1=correct-horse&new_password2=battery-staple",
        ));
        assert!(!form.is_valid().await);
        assert!(form
            .errors()
            .get("__all__")
            .unwrap()
            .iter()
            .any(|e| e.contains("didn't match")));
    }

    #[tokio::test]
    async fn test_change_password_form_too_short() {
        let mut form = ChangePasswordForm::new();
        form.bind(&QueryDict::parse("new_password1=short&new_password2=short"));
        assert!(!form.is_valid().await);
        assert!(form.errors().contains_key("new_password1"));
    }

    #[tokio::test]
    async fn test_change_password_form_save() {
        let store = RecordingStore::new();
        let mut form = ChangePasswordForm::new();
        form.bind(&QueryDict::parse(
            "new_password1=correct-horse&new_password2=correct-horse",
        ));
        assert!(form.is_valid().await);
        form.save(&store, "admin").await.unwrap();
        assert_eq!(
            store.saved.lock().unwrap()[0],
            ("admin".to_string(), "correct-horse".to_string())
        );
    }

    #[tokio::test]
    async fn test_password_widgets_never_echo() {
        let mut form = ChangePasswordForm::new();
        form.bind(&QueryDict::parse(
            "new_password1=correct-horse&new_password2=oops",
        ));
        form.is_valid().await;
        let ctx = form.as_context();
        let html = ctx["fields"][0]["html"].as_str().unwrap();
        assert!(!html.contains("correct-horse"));
    }
}
