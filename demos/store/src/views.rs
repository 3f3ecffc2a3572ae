//! The store's product views: a filtered list plus add/change/delete, all
//! configured as one collection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde_json::Value;

use cruditor_collection::{CollectionConfig, CollectionView};
use cruditor_core::{Breadcrumb, CruditorError, CruditorResult, TitleButton, ViewKind};
use cruditor_forms::fields::{FormFieldDef, FormFieldType};
use cruditor_forms::{BaseForm, Form, FormSet};
use cruditor_http::urls::{ReverseUrls, URLResolver};
use cruditor_http::{HttpRequest, HttpResponse};
use cruditor_views::filters::{ChoiceFilter, FilterSet, MultiCharFilter};
use cruditor_views::views::{
    CruditorAddView, CruditorChangeView, CruditorDeleteView, CruditorListView,
};
use cruditor_views::{Column, CruditorConfig, CruditorView, TableSpec, View};

use crate::store::ProductStore;

/// The resolver cell shared by all views; filled once the URL plan is built.
pub type SharedUrls = Arc<OnceCell<URLResolver>>;

/// The common cruditor configuration of the store admin.
pub fn store_cruditor_config() -> CruditorConfig {
    let mut config = CruditorConfig::default();
    config.menu_title = "Store admin".to_string();
    config.index_url = "/products/".to_string();
    config.model_verbose_name = Some("product".to_string());
    config
}

fn product_collection_config() -> CollectionConfig {
    CollectionConfig::new("Products")
        .list_urlname("product-list")
        .add_urlname("product-add")
        .detail_urlname("product-change")
        .delete_urlname("product-delete")
}

fn product_form(object: Option<&Value>) -> Box<dyn Form> {
    let fields = vec![
        FormFieldDef::new(
            "name",
            FormFieldType::Char {
                min_length: None,
                max_length: Some(100),
                strip: true,
            },
        ),
        FormFieldDef::new(
            "price_cents",
            FormFieldType::Integer {
                min_value: Some(0),
                max_value: None,
            },
        )
        .label("Price (cents)"),
        FormFieldDef::new("active", FormFieldType::Boolean).required(false),
    ];

    let mut form = BaseForm::new(fields);
    if let Some(object) = object {
        let mut initial = HashMap::new();
        for key in ["name", "price_cents", "active"] {
            if let Some(value) = object.get(key) {
                initial.insert(key.to_string(), value.clone());
            }
        }
        form = form.with_initial(initial);
    }
    Box::new(form)
}

fn cleaned_product(form: &dyn Form) -> (String, i64, bool) {
    let cleaned = form.cleaned_data();
    let name = cleaned
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let price_cents = cleaned
        .get("price_cents")
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let active = cleaned
        .get("active")
        .and_then(Value::as_bool)
        .unwrap_or_default();
    (name, price_cents, active)
}

fn object_pk(request: &HttpRequest) -> CruditorResult<i64> {
    request
        .kwarg("pk")
        .and_then(|pk| pk.parse().ok())
        .ok_or_else(|| CruditorError::NotFound("missing pk".to_string()))
}

/// The product list: searchable, filterable by active state, with linked
/// names and an "Add product" title button.
pub struct ProductListView {
    cruditor: CruditorConfig,
    collection: CollectionConfig,
    store: Arc<ProductStore>,
    urls: SharedUrls,
}

impl ProductListView {
    pub fn new(store: Arc<ProductStore>, urls: SharedUrls) -> Self {
        Self {
            cruditor: store_cruditor_config(),
            collection: product_collection_config(),
            store,
            urls,
        }
    }
}

impl CruditorView for ProductListView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.cruditor
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::List
    }

    fn get_title(&self) -> String {
        self.collection_title(None)
    }

    fn get_titlebuttons(&self) -> Vec<TitleButton> {
        self.collection_titlebuttons()
    }
}

impl CollectionView for ProductListView {
    fn collection_config(&self) -> &CollectionConfig {
        &self.collection
    }

    fn urls(&self) -> &dyn ReverseUrls {
        &self.urls
    }
}

#[async_trait]
impl View for ProductListView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.render_list(request).await
    }
}

#[async_trait]
impl CruditorListView for ProductListView {
    async fn get_queryset(&self) -> CruditorResult<Vec<Value>> {
        Ok(self.store.all())
    }

    fn table_spec(&self) -> Option<TableSpec> {
        Some(TableSpec::new(vec![
            Column::new("name").linked("product-change"),
            Column::new("price_cents").header("Price (cents)"),
            Column::new("active"),
        ]))
    }

    fn filterset(&self) -> Option<FilterSet> {
        Some(
            FilterSet::new()
                .with(MultiCharFilter::new("search", &["name"]))
                .with(ChoiceFilter::any_choice(
                    "active",
                    vec![
                        ("true".to_string(), "Yes".to_string()),
                        ("false".to_string(), "No".to_string()),
                    ],
                )),
        )
    }

    fn url_reverser(&self) -> Option<&dyn ReverseUrls> {
        Some(&self.urls)
    }
}

/// The add form.
pub struct ProductAddView {
    cruditor: CruditorConfig,
    collection: CollectionConfig,
    store: Arc<ProductStore>,
    urls: SharedUrls,
}

impl ProductAddView {
    pub fn new(store: Arc<ProductStore>, urls: SharedUrls) -> Self {
        Self {
            cruditor: store_cruditor_config(),
            collection: product_collection_config(),
            store,
            urls,
        }
    }
}

impl CruditorView for ProductAddView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.cruditor
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Add
    }

    fn get_title(&self) -> String {
        self.collection_title(None)
    }

    fn get_breadcrumb(&self) -> Vec<Breadcrumb> {
        self.collection_breadcrumb(None)
    }
}

impl CollectionView for ProductAddView {
    fn collection_config(&self) -> &CollectionConfig {
        &self.collection
    }

    fn urls(&self) -> &dyn ReverseUrls {
        &self.urls
    }
}

#[async_trait]
impl View for ProductAddView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.handle_get(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.handle_post(request).await
    }
}

#[async_trait]
impl CruditorAddView for ProductAddView {
    fn make_form(&self) -> Box<dyn Form> {
        product_form(None)
    }

    fn get_success_url(&self) -> String {
        self.collection_success_url()
            .unwrap_or_else(|| "/products/".to_string())
    }

    async fn save_form(
        &self,
        form: &dyn Form,
        _formsets: &mut Vec<(String, FormSet)>,
    ) -> CruditorResult<Value> {
        let (name, price_cents, active) = cleaned_product(form);
        Ok(self.store.insert(name, price_cents, active))
    }
}

/// The change form, with a delete button linking to the delete view.
pub struct ProductChangeView {
    cruditor: CruditorConfig,
    collection: CollectionConfig,
    store: Arc<ProductStore>,
    urls: SharedUrls,
}

impl ProductChangeView {
    pub fn new(store: Arc<ProductStore>, urls: SharedUrls) -> Self {
        Self {
            cruditor: store_cruditor_config(),
            collection: product_collection_config(),
            store,
            urls,
        }
    }
}

impl CruditorView for ProductChangeView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.cruditor
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Change
    }

    fn get_object_breadcrumb(&self, object: &Value) -> Vec<Breadcrumb> {
        self.collection_breadcrumb(Some(&self.collection_item(object)))
    }
}

impl CollectionView for ProductChangeView {
    fn collection_config(&self) -> &CollectionConfig {
        &self.collection
    }

    fn urls(&self) -> &dyn ReverseUrls {
        &self.urls
    }
}

#[async_trait]
impl View for ProductChangeView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.handle_get(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.handle_post(request).await
    }
}

#[async_trait]
impl CruditorChangeView for ProductChangeView {
    async fn get_object(&self, request: &HttpRequest) -> CruditorResult<Value> {
        self.store.get(object_pk(request)?)
    }

    fn make_form(&self, object: &Value) -> Box<dyn Form> {
        product_form(Some(object))
    }

    fn get_success_url(&self) -> String {
        self.collection_success_url()
            .unwrap_or_else(|| "/products/".to_string())
    }

    fn get_delete_url(&self, object: &Value) -> Option<String> {
        self.collection_delete_url(Some(&self.collection_item(object)))
    }

    async fn save_form(
        &self,
        form: &dyn Form,
        _formsets: &mut Vec<(String, FormSet)>,
        object: &Value,
    ) -> CruditorResult<Value> {
        let (name, price_cents, active) = cleaned_product(form);
        let pk = object.get("pk").and_then(Value::as_i64).unwrap_or_default();
        self.store.update(pk, name, price_cents, active)
    }
}

/// The delete confirmation.
pub struct ProductDeleteView {
    cruditor: CruditorConfig,
    collection: CollectionConfig,
    store: Arc<ProductStore>,
    urls: SharedUrls,
}

impl ProductDeleteView {
    pub fn new(store: Arc<ProductStore>, urls: SharedUrls) -> Self {
        Self {
            cruditor: store_cruditor_config(),
            collection: product_collection_config(),
            store,
            urls,
        }
    }
}

impl CruditorView for ProductDeleteView {
    fn cruditor_config(&self) -> &CruditorConfig {
        &self.cruditor
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Delete
    }

    fn get_object_breadcrumb(&self, object: &Value) -> Vec<Breadcrumb> {
        self.collection_breadcrumb(Some(&self.collection_item(object)))
    }
}

impl CollectionView for ProductDeleteView {
    fn collection_config(&self) -> &CollectionConfig {
        &self.collection
    }

    fn urls(&self) -> &dyn ReverseUrls {
        &self.urls
    }
}

#[async_trait]
impl View for ProductDeleteView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.handle_get(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.handle_post(request).await
    }
}

#[async_trait]
impl CruditorDeleteView for ProductDeleteView {
    async fn get_object(&self, request: &HttpRequest) -> CruditorResult<Value> {
        self.store.get(object_pk(request)?)
    }

    fn breadcrumb_page_title(&self, object: &Value) -> String {
        self.collection_breadcrumb_title(Some(&self.collection_item(object)))
    }

    fn get_success_url(&self) -> String {
        self.collection_success_url()
            .unwrap_or_else(|| "/products/".to_string())
    }

    async fn perform_delete(
        &self,
        _request: &HttpRequest,
        object: &Value,
    ) -> CruditorResult<()> {
        let pk = object.get("pk").and_then(Value::as_i64).unwrap_or_default();
        self.store.delete(pk)
    }
}
