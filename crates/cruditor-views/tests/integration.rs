//! Integration tests exercising a gated list view and a formset-enabled add
//! view through the full dispatch path.

use async_trait::async_trait;
use serde_json::{json, Value};

use cruditor_core::{CruditorResult, RequestUser, ViewKind};
use cruditor_forms::fields::{FormFieldDef, FormFieldType};
use cruditor_forms::formset::create_formset;
use cruditor_forms::{BaseForm, Form, FormSet};
use cruditor_http::{HttpRequest, HttpResponse};
use cruditor_views::views::{CruditorAddView, CruditorListView};
use cruditor_views::{Column, CruditorConfig, CruditorView, TableSpec, View};

fn admin() -> RequestUser {
    RequestUser::new("admin").staff()
}

fn parse_context(response: &HttpResponse) -> Value {
    let body = response.content_text();
    let start = body.find('{').unwrap();
    let end = body.rfind('}').unwrap();
    serde_json::from_str(&body[start..=end]).unwrap()
}

struct UserListView {
    config: CruditorConfig,
}

impl UserListView {
    fn new() -> Self {
        let mut config = CruditorConfig::default();
        config.title = Some("Users".to_string());
        config.model_verbose_name = Some("user".to_string());
        Self { config }
    }
}

impl CruditorView for UserListView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.config
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::List
    }
}

#[async_trait]
impl View for UserListView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.render_list(request).await
    }
}

#[async_trait]
impl CruditorListView for UserListView {
    async fn get_queryset(&self) -> CruditorResult<Vec<Value>> {
        Ok(vec![
            json!({"pk": 1, "name": "admin", "is_staff": "true"}),
            json!({"pk": 2, "name": "guest", "is_staff": "false"}),
        ])
    }

    fn table_spec(&self) -> Option<TableSpec> {
        Some(TableSpec::new(vec![
            Column::new("name"),
            Column::new("is_staff").header("Staff"),
        ]))
    }
}

#[tokio::test]
async fn test_list_view_full_context() {
    let view = UserListView::new();
    let request = HttpRequest::builder().user(admin()).build();
    let response = view.dispatch(request).await;
    assert_eq!(response.status(), http::StatusCode::OK);

    let context = parse_context(&response);
    assert_eq!(context["cruditor"]["title"], "Users");
    assert_eq!(context["cruditor"]["constants"]["menu_title"], "CRUDitor");
    // The terminal breadcrumb entry is the unlinked current page.
    let breadcrumb = context["cruditor"]["breadcrumb"].as_array().unwrap();
    assert_eq!(breadcrumb.last().unwrap()["title"], "Users");
    assert!(breadcrumb.last().unwrap()["url"].is_null());

    assert_eq!(context["table"]["headers"], json!(["Name", "Staff"]));
    assert_eq!(context["table"]["rows"].as_array().unwrap().len(), 2);
    assert!(context["filter_form"].is_null());
}

#[tokio::test]
async fn test_list_view_login_gate_keeps_context() {
    let view = UserListView::new();
    let request = HttpRequest::builder().path("/users/").build();
    let response = view.dispatch(request).await;

    let context = parse_context(&response);
    assert_eq!(context["cruditor"]["title"], "Login");
    assert_eq!(context["next_field"], "next");
    assert_eq!(context["next_value"], "/users/");
    // The login form renders username and password inputs.
    let fields = context["form"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["name"], "username");
}

struct UserAddView {
    config: CruditorConfig,
}

impl UserAddView {
    fn new() -> Self {
        let mut config = CruditorConfig::default();
        config.model_verbose_name = Some("user".to_string());
        Self { config }
    }
}

impl CruditorView for UserAddView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.config
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Add
    }
}

#[async_trait]
impl View for UserAddView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.handle_get(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.handle_post(request).await
    }
}

#[async_trait]
impl CruditorAddView for UserAddView {
    fn make_form(&self) -> Box<dyn Form> {
        Box::new(BaseForm::new(vec![
            FormFieldDef::new(
                "name",
                FormFieldType::Char {
                    min_length: Some(3),
                    max_length: Some(150),
                    strip: true,
                },
            ),
            FormFieldDef::new("email", FormFieldType::Email).required(false),
        ]))
    }

    fn make_formsets(&self) -> Vec<(String, FormSet)> {
        vec![(
            "emails".to_string(),
            create_formset(
                |_i| {
                    Box::new(BaseForm::new(vec![FormFieldDef::new(
                        "address",
                        FormFieldType::Email,
                    )]))
                },
                2,
                0,
            )
            .with_prefix("emails")
            .with_can_delete(true),
        )]
    }

    fn get_success_url(&self) -> String {
        "/users/".to_string()
    }

    async fn save_form(
        &self,
        form: &dyn Form,
        formsets: &mut Vec<(String, FormSet)>,
    ) -> CruditorResult<Value> {
        let kept = formsets[0].1.total_form_count() - formsets[0].1.deleted_forms().len();
        Ok(json!({
            "pk": 1,
            "name": form.cleaned_data().get("name").cloned(),
            "emails": kept,
        }))
    }
}

fn post(body: &str) -> HttpRequest {
    HttpRequest::builder()
        .method(http::Method::POST)
        .content_type("application/x-www-form-urlencoded")
        .body(body.as_bytes().to_vec())
        .user(admin())
        .build()
}

#[tokio::test]
async fn test_add_view_get_includes_formset_options() {
    let view = UserAddView::new();
    let request = HttpRequest::builder().user(admin()).build();
    let response = view.dispatch(request).await;

    let context = parse_context(&response);
    assert_eq!(context["cruditor"]["title"], "Add user");
    let formset = &context["formsets"]["emails"];
    assert_eq!(formset["total_form_count"], 2);
    assert_eq!(formset["options"]["prefix"], "emails");
    assert_eq!(formset["options"]["add-button-label"], "Add another");
    assert!(formset["management_form"]
        .as_str()
        .unwrap()
        .contains("emails-TOTAL_FORMS"));
}

#[tokio::test]
async fn test_add_view_post_validates_form_and_formsets_together() {
    let view = UserAddView::new();

    // Invalid member form: second email is malformed.
    let response = view
        .dispatch(post(
            "name=alice&emails-0-address=a@example.com&emails-1-address=nope",
        ))
        .await;
    assert_eq!(response.status(), http::StatusCode::OK);
    let context = parse_context(&response);
    assert_eq!(context["formset_errors"], true);

    // Marking the malformed form for deletion lets the submission pass.
    let response = view
        .dispatch(post(
            "name=alice&emails-0-address=a@example.com&emails-1-address=nope&emails-1-DELETE=on",
        ))
        .await;
    assert_eq!(response.status(), http::StatusCode::FOUND);
}

#[tokio::test]
async fn test_add_view_post_invalid_main_form() {
    let view = UserAddView::new();
    let response = view
        .dispatch(post(
            "name=ab&emails-0-address=a@example.com&emails-1-address=b@example.com",
        ))
        .await;
    assert_eq!(response.status(), http::StatusCode::OK);
    let context = parse_context(&response);
    let name_errors = context["form"]["errors"]["name"].as_array().unwrap();
    assert!(!name_errors.is_empty());
}
