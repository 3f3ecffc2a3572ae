//! The list view: a table over a queryset, optionally narrowed by a
//! filterset.

use async_trait::async_trait;
use serde_json::{json, Value};

use cruditor_core::{CruditorError, CruditorResult};
use cruditor_http::urls::ReverseUrls;
use cruditor_http::{HttpRequest, HttpResponse};

use crate::filters::FilterSet;
use crate::mixins::CruditorView;
use crate::table::{Table, TableSpec};
use crate::view::{render_template, View};

/// A login-gated list view rendering a table, with optional filtering.
///
/// Set at least [`get_queryset`](CruditorListView::get_queryset) and
/// [`table_spec`](CruditorListView::table_spec). Declaring a
/// [`filterset`](CruditorListView::filterset) adds a filter form driven by
/// the request's query parameters.
#[async_trait]
pub trait CruditorListView: View + CruditorView {
    /// Template used when rendering the list view.
    fn template_name(&self) -> &str {
        "cruditor/list.html"
    }

    /// Provides the rows to display.
    async fn get_queryset(&self) -> CruditorResult<Vec<Value>>;

    /// The table shape to render. Required.
    fn table_spec(&self) -> Option<TableSpec> {
        None
    }

    /// Returns the configured table spec.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::ImproperlyConfigured`] when no table spec
    /// is configured.
    fn get_table_spec(&self) -> CruditorResult<TableSpec> {
        self.table_spec().ok_or_else(|| {
            CruditorError::ImproperlyConfigured("table_spec not configured.".to_string())
        })
    }

    /// The filterset narrowing the queryset, if any.
    fn filterset(&self) -> Option<FilterSet> {
        None
    }

    /// The reverse-URL collaborator used for linked table cells.
    ///
    /// Without one, linked columns render without URLs.
    fn url_reverser(&self) -> Option<&dyn ReverseUrls> {
        None
    }

    /// Applies the filterset to the queryset, returning the remaining rows
    /// and the filter form context (`None` without a filterset).
    async fn get_filtered_queryset(
        &self,
        request: &HttpRequest,
    ) -> CruditorResult<(Vec<Value>, Option<Value>)> {
        let rows = self.get_queryset().await?;
        match self.filterset() {
            Some(filterset) => {
                let filtered = filterset.filter(request.get(), rows);
                let form = filterset.form_context(request.get());
                Ok((filtered, Some(form)))
            }
            None => Ok((rows, None)),
        }
    }

    /// Renders the list page: gate, filter, order, table.
    async fn render_list(&self, request: HttpRequest) -> HttpResponse {
        if let Some(response) = self.guard(&request) {
            return response;
        }

        let spec = match self.get_table_spec() {
            Ok(spec) => spec,
            Err(error) => return HttpResponse::server_error(error.to_string()),
        };

        let (rows, filter_form) = match self.get_filtered_queryset(&request).await {
            Ok(result) => result,
            Err(error) => return HttpResponse::server_error(error.to_string()),
        };

        let mut table = Table::new(spec, rows);
        table.configure(&request);

        let context = json!({
            "cruditor": self.get_cruditor_context(None),
            "table": table.as_context(self.url_reverser()),
            "filter_form": filter_form,
        });
        render_template(self.template_name(), &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::CharFilter;
    use crate::mixins::CruditorConfig;
    use crate::table::Column;
    use cruditor_core::{RequestUser, ViewKind};

    struct PersonListView {
        config: CruditorConfig,
        rows: Vec<Value>,
    }

    impl PersonListView {
        fn new() -> Self {
            let mut config = CruditorConfig::default();
            config.title = Some("Persons".to_string());
            config.model_verbose_name = Some("person".to_string());
            Self {
                config,
                rows: vec![
                    json!({"pk": 1, "name": "John"}),
                    json!({"pk": 2, "name": "Jane"}),
                ],
            }
        }
    }

    impl CruditorView for PersonListView {
        fn cruditor_config(&self) -> &CruditorConfig {
            &self.config
        }

        fn view_kind(&self) -> ViewKind {
            ViewKind::List
        }
    }

    #[async_trait]
    impl View for PersonListView {
        async fn get(&self, request: HttpRequest) -> HttpResponse {
            self.render_list(request).await
        }
    }

    #[async_trait]
    impl CruditorListView for PersonListView {
        async fn get_queryset(&self) -> CruditorResult<Vec<Value>> {
            Ok(self.rows.clone())
        }

        fn table_spec(&self) -> Option<TableSpec> {
            Some(TableSpec::new(vec![Column::new("name")]))
        }

        fn filterset(&self) -> Option<FilterSet> {
            Some(FilterSet::new().with(CharFilter::new("name")))
        }
    }

    fn staff_request(query: &str) -> HttpRequest {
        HttpRequest::builder()
            .path("/persons/")
            .query_string(query)
            .user(RequestUser::new("admin").staff())
            .build()
    }

    #[tokio::test]
    async fn test_anonymous_gets_login_page() {
        let view = PersonListView::new();
        let request = HttpRequest::builder().path("/persons/").build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.content_text().contains("cruditor/login.html"));
    }

    #[tokio::test]
    async fn test_non_staff_gets_login_page() {
        let view = PersonListView::new();
        let request = HttpRequest::builder()
            .user(RequestUser::new("joe"))
            .build();
        let response = view.dispatch(request).await;
        assert!(response.content_text().contains("cruditor/login.html"));
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let mut view = PersonListView::new();
        view.config.required_permission = Some("people.view_person".to_string());
        let response = view.dispatch(staff_request("")).await;
        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_renders_table() {
        let view = PersonListView::new();
        let response = view.dispatch(staff_request("")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        let body = response.content_text();
        assert!(body.contains("cruditor/list.html"));
        assert!(body.contains("John"));
        assert!(body.contains("Jane"));
    }

    #[tokio::test]
    async fn test_filter_active() {
        let view = PersonListView::new();
        let response = view.dispatch(staff_request("name=Jane")).await;
        let body = response.content_text();
        assert!(body.contains("Jane"));
        let context: Value = {
            let start = body.find("{").unwrap();
            let end = body.rfind("}").unwrap();
            serde_json::from_str(&body[start..=end]).unwrap()
        };
        let rows = context["table"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0]["text"], "Jane");
        assert!(context["filter_form"].is_object());
    }

    #[tokio::test]
    async fn test_sort_query_param() {
        let view = PersonListView::new();
        let response = view.dispatch(staff_request("sort=name")).await;
        let body = response.content_text();
        let jane = body.find("Jane").unwrap();
        let john = body.find("John").unwrap();
        assert!(jane < john);
    }

    struct SpeclessView {
        config: CruditorConfig,
    }

    impl CruditorView for SpeclessView {
        fn cruditor_config(&self) -> &CruditorConfig {
            &self.config
        }
    }

    #[async_trait]
    impl View for SpeclessView {
        async fn get(&self, request: HttpRequest) -> HttpResponse {
            self.render_list(request).await
        }
    }

    #[async_trait]
    impl CruditorListView for SpeclessView {
        async fn get_queryset(&self) -> CruditorResult<Vec<Value>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_missing_table_spec_is_configuration_error() {
        let view = SpeclessView {
            config: CruditorConfig::default(),
        };
        let request = HttpRequest::builder()
            .user(RequestUser::new("admin").staff())
            .build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.content_text().contains("table_spec not configured"));
    }
}
