//! The delete view: confirmation on GET, deletion on POST, with protected
//! related objects reported instead of deleted.

use async_trait::async_trait;
use serde_json::{json, Value};

use cruditor_core::text::capfirst;
use cruditor_core::{CruditorError, CruditorResult};
use cruditor_http::{HttpRequest, HttpResponse, HttpResponseRedirect};

use crate::mixins::CruditorView;
use crate::view::{render_template, View};
use crate::views::display_of;

/// A login-gated view deleting an existing item after confirmation.
#[async_trait]
pub trait CruditorDeleteView: View + CruditorView {
    /// Template used to render the confirmation page.
    fn template_name(&self) -> &str {
        "cruditor/delete.html"
    }

    /// Message used when an item was deleted.
    fn success_message(&self) -> &str {
        r#"The {model} "{object}" was successfully deleted."#
    }

    /// Loads the item being deleted.
    async fn get_object(&self, request: &HttpRequest) -> CruditorResult<Value>;

    /// The URL to redirect to after deletion.
    fn get_success_url(&self) -> String;

    /// The display string of the item.
    fn object_display(&self, object: &Value) -> String {
        display_of(object)
    }

    /// The page title; "Delete: {item}" by default.
    fn page_title(&self, object: &Value) -> String {
        format!("Delete: {}", self.object_display(object))
    }

    /// The terminal breadcrumb entry; defaults to the page title.
    ///
    /// Collection views shorten this to a plain "Delete" under the linked
    /// item entry.
    fn breadcrumb_page_title(&self, object: &Value) -> String {
        self.page_title(object)
    }

    /// Deletes the item.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::ProtectedRelation`] when related objects
    /// block the deletion; the confirmation page is re-rendered with them.
    async fn perform_delete(&self, request: &HttpRequest, object: &Value) -> CruditorResult<()>;

    /// Formats the labels of objects holding a protected relation.
    fn format_linked_objects(&self, objects: &[String]) -> Vec<String> {
        objects.iter().map(|label| capfirst(label)).collect()
    }

    /// Formats the success message for a deleted item.
    fn format_success_message(&self, object: &Value) -> String {
        self.success_message()
            .replace("{model}", &self.get_model_verbose_name())
            .replace("{object}", &self.object_display(object))
    }

    /// Renders the confirmation page.
    fn render_confirmation(&self, object: &Value, linked_objects: Option<Vec<String>>) -> HttpResponse {
        let context = json!({
            "cruditor": self.get_object_cruditor_context(
                object,
                &self.page_title(object),
                &self.breadcrumb_page_title(object),
            ),
            "object": object,
            "linked_objects": linked_objects,
        });
        render_template(self.template_name(), &context)
    }

    /// Handles GET by asking for confirmation.
    async fn handle_get(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }
        match self.get_object(&request).await {
            Ok(object) => self.render_confirmation(&object, None),
            Err(error) => not_found_or_error(&error),
        }
    }

    /// Handles POST by deleting and redirecting, or re-rendering with the
    /// protected related objects.
    async fn handle_post(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }

        let object = match self.get_object(&request).await {
            Ok(object) => object,
            Err(error) => return not_found_or_error(&error),
        };

        match self.perform_delete(&request, &object).await {
            Ok(()) => {
                tracing::info!(
                    message = %self.format_success_message(&object),
                    "item deleted"
                );
                HttpResponseRedirect::new(&self.get_success_url())
            }
            Err(CruditorError::ProtectedRelation(protected)) => {
                self.render_confirmation(&object, Some(self.format_linked_objects(&protected)))
            }
            Err(error) => HttpResponse::server_error(error.to_string()),
        }
    }
}

fn not_found_or_error(error: &CruditorError) -> HttpResponse {
    match error {
        CruditorError::NotFound(_) | CruditorError::DoesNotExist(_) => {
            HttpResponse::not_found(error.to_string())
        }
        _ => HttpResponse::server_error(error.to_string()),
    }
}
