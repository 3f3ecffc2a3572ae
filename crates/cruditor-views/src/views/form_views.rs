//! The add and change form views, with formset support.
//!
//! Both views initialize their form and all declared formsets on GET, bind
//! and validate them together on POST, and only save when everything is
//! valid. Formsets are keyed by name so templates can address them
//! individually.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use cruditor_core::{CruditorError, CruditorResult};
use cruditor_forms::{Form, FormSet};
use cruditor_http::{HttpRequest, HttpResponse, HttpResponseRedirect};

use crate::mixins::CruditorView;
use crate::view::{render_template, View};
use crate::views::display_of;

fn formsets_context(formsets: &[(String, FormSet)]) -> Value {
    let mut map = Map::new();
    for (name, formset) in formsets {
        map.insert(name.clone(), formset.as_context());
    }
    Value::Object(map)
}

async fn validate_all(form: &mut dyn Form, formsets: &mut [(String, FormSet)]) -> bool {
    let mut all_valid = form.is_valid().await;
    for (_, formset) in formsets.iter_mut() {
        if !formset.is_valid().await {
            all_valid = false;
        }
    }
    all_valid
}

/// A login-gated form view adding a new item.
#[async_trait]
pub trait CruditorAddView: View + CruditorView {
    /// Template used to render the add form view.
    fn template_name(&self) -> &str {
        "cruditor/form.html"
    }

    /// Message used when a new item was added successfully.
    fn success_message(&self) -> &str {
        r#"The {model} "{object}" was successfully added."#
    }

    /// Creates the unbound form.
    fn make_form(&self) -> Box<dyn Form>;

    /// Creates the named formsets edited together with the form.
    fn make_formsets(&self) -> Vec<(String, FormSet)> {
        Vec::new()
    }

    /// The URL to redirect to after a successful save.
    fn get_success_url(&self) -> String;

    /// The page title; "Add {model verbose name}" by default.
    fn page_title(&self) -> String {
        format!("Add {}", self.get_model_verbose_name())
    }

    /// The display string of a saved item.
    fn object_display(&self, object: &Value) -> String {
        display_of(object)
    }

    /// Persists the validated form and formsets, returning the new item.
    async fn save_form(
        &self,
        form: &dyn Form,
        formsets: &mut Vec<(String, FormSet)>,
    ) -> CruditorResult<Value>;

    /// Formats the success message for a saved item.
    fn format_success_message(&self, object: &Value) -> String {
        self.success_message()
            .replace("{model}", &self.get_model_verbose_name())
            .replace("{object}", &self.object_display(object))
    }

    /// Renders the form page with all formsets.
    fn render_form_page(
        &self,
        form: &dyn Form,
        formsets: &[(String, FormSet)],
        formset_errors: bool,
    ) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_cruditor_context(Some(&self.page_title())),
            "form": form.as_context(),
            "formsets": formsets_context(formsets),
            "formset_errors": formset_errors,
        });
        render_template(self.template_name(), &context)
    }

    /// Handles GET by rendering the empty form and formsets.
    async fn handle_get(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }
        let form = self.make_form();
        let formsets = self.make_formsets();
        self.render_form_page(form.as_ref(), &formsets, false)
    }

    /// Handles POST by validating the form and every formset together.
    async fn handle_post(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }

        let mut form = self.make_form();
        form.bind(request.post());
        let mut formsets = self.make_formsets();
        for (_, formset) in &mut formsets {
            formset.bind(request.post());
        }

        if validate_all(form.as_mut(), &mut formsets).await {
            match self.save_form(form.as_ref(), &mut formsets).await {
                Ok(object) => {
                    tracing::info!(
                        message = %self.format_success_message(&object),
                        "item added"
                    );
                    HttpResponseRedirect::new(&self.get_success_url())
                }
                Err(error) => HttpResponse::server_error(error.to_string()),
            }
        } else {
            self.render_form_page(form.as_ref(), &formsets, true)
        }
    }
}

/// A login-gated form view editing an existing item.
#[async_trait]
pub trait CruditorChangeView: View + CruditorView {
    /// Template used to render the change form view.
    fn template_name(&self) -> &str {
        "cruditor/form.html"
    }

    /// Message used when an item was changed successfully.
    fn success_message(&self) -> &str {
        r#"The {model} "{object}" was successfully changed."#
    }

    /// Loads the item being edited.
    async fn get_object(&self, request: &HttpRequest) -> CruditorResult<Value>;

    /// Creates the form pre-populated from the item.
    fn make_form(&self, object: &Value) -> Box<dyn Form>;

    /// Creates the named formsets edited together with the form.
    fn make_formsets(&self, _object: &Value) -> Vec<(String, FormSet)> {
        Vec::new()
    }

    /// The URL to redirect to after a successful save.
    fn get_success_url(&self) -> String;

    /// The URL of the delete view for this item, linked from the change
    /// page. No delete button is shown by default.
    fn get_delete_url(&self, _object: &Value) -> Option<String> {
        None
    }

    /// The display string of the item.
    fn object_display(&self, object: &Value) -> String {
        display_of(object)
    }

    /// The page title; "Change: {item}" by default.
    fn page_title(&self, object: &Value) -> String {
        format!("Change: {}", self.object_display(object))
    }

    /// The terminal breadcrumb entry; defaults to the page title.
    fn breadcrumb_page_title(&self, object: &Value) -> String {
        self.page_title(object)
    }

    /// Persists the validated form and formsets, returning the updated item.
    async fn save_form(
        &self,
        form: &dyn Form,
        formsets: &mut Vec<(String, FormSet)>,
        object: &Value,
    ) -> CruditorResult<Value>;

    /// Formats the success message for a saved item.
    fn format_success_message(&self, object: &Value) -> String {
        self.success_message()
            .replace("{model}", &self.get_model_verbose_name())
            .replace("{object}", &self.object_display(object))
    }

    /// Renders the form page with all formsets and the delete link.
    fn render_form_page(
        &self,
        object: &Value,
        form: &dyn Form,
        formsets: &[(String, FormSet)],
        formset_errors: bool,
    ) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_object_cruditor_context(
                object,
                &self.page_title(object),
                &self.breadcrumb_page_title(object),
            ),
            "form": form.as_context(),
            "formsets": formsets_context(formsets),
            "formset_errors": formset_errors,
            "object": object,
            "object_delete_url": self.get_delete_url(object),
        });
        render_template(self.template_name(), &context)
    }

    /// Handles GET by rendering the populated form and formsets.
    async fn handle_get(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }
        let object = match self.get_object(&request).await {
            Ok(object) => object,
            Err(error) => return error_response(&error),
        };
        let form = self.make_form(&object);
        let formsets = self.make_formsets(&object);
        self.render_form_page(&object, form.as_ref(), &formsets, false)
    }

    /// Handles POST by validating the form and every formset together.
    async fn handle_post(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }

        let object = match self.get_object(&request).await {
            Ok(object) => object,
            Err(error) => return error_response(&error),
        };

        let mut form = self.make_form(&object);
        form.bind(request.post());
        let mut formsets = self.make_formsets(&object);
        for (_, formset) in &mut formsets {
            formset.bind(request.post());
        }

        if validate_all(form.as_mut(), &mut formsets).await {
            match self.save_form(form.as_ref(), &mut formsets, &object).await {
                Ok(saved) => {
                    tracing::info!(
                        message = %self.format_success_message(&saved),
                        "item changed"
                    );
                    HttpResponseRedirect::new(&self.get_success_url())
                }
                Err(error) => HttpResponse::server_error(error.to_string()),
            }
        } else {
            self.render_form_page(&object, form.as_ref(), &formsets, true)
        }
    }
}

fn error_response(error: &CruditorError) -> HttpResponse {
    match error {
        CruditorError::NotFound(_) | CruditorError::DoesNotExist(_) => {
            HttpResponse::not_found(error.to_string())
        }
        _ => HttpResponse::server_error(error.to_string()),
    }
}
