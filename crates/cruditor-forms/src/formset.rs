//! Formsets: collections of related forms edited as one submitted unit.
//!
//! A [`FormSet`] manages multiple instances of the same form, the management
//! form data (TOTAL_FORMS, INITIAL_FORMS, ...), coordinated validation, and
//! delete markers. It also carries the option payload consumed by the
//! client-side formset scripts (add/remove rows without a round trip).

use std::collections::{BTreeMap, HashMap};

use serde_json::{json, Value};

use cruditor_http::QueryDict;

use crate::form::Form;
use crate::widgets::Widget;

/// The default formset prefix for HTML name attributes.
const DEFAULT_PREFIX: &str = "form";

/// Management form field names.
const TOTAL_FORMS: &str = "TOTAL_FORMS";
const INITIAL_FORMS: &str = "INITIAL_FORMS";
const MIN_NUM_FORMS: &str = "MIN_NUM_FORMS";
const MAX_NUM_FORMS: &str = "MAX_NUM_FORMS";

/// The name of the per-form delete marker field.
pub const DELETION_FIELD_NAME: &str = "DELETE";

/// A collection of related forms managed together.
pub struct FormSet {
    /// The individual form instances.
    forms: Vec<Box<dyn Form>>,
    /// Number of extra (empty) forms displayed.
    pub extra: usize,
    /// Minimum number of undeleted forms required.
    pub min_num: usize,
    /// Maximum number of forms allowed.
    pub max_num: usize,
    /// Whether forms can be marked for deletion.
    pub can_delete: bool,
    /// The formset prefix for HTML name attributes.
    prefix: String,
    /// Per-form delete markers, parallel to `forms`.
    deletion_markers: Vec<bool>,
    /// Errors specific to the formset (not individual forms).
    non_form_errors: Vec<String>,
    /// Overrides merged into the client-side option payload.
    js_options: BTreeMap<String, String>,
    /// Whether the formset has been bound to data.
    is_bound: bool,
}

impl FormSet {
    /// Creates a new `FormSet` with the given form instances.
    pub fn new(forms: Vec<Box<dyn Form>>) -> Self {
        let count = forms.len();
        Self {
            forms,
            extra: 1,
            min_num: 0,
            max_num: 1000,
            can_delete: false,
            prefix: DEFAULT_PREFIX.to_string(),
            deletion_markers: vec![false; count],
            non_form_errors: Vec::new(),
            js_options: BTreeMap::new(),
            is_bound: false,
        }
    }

    /// Sets the number of extra forms.
    #[must_use]
    pub fn with_extra(mut self, extra: usize) -> Self {
        self.extra = extra;
        self
    }

    /// Sets the minimum number of forms.
    #[must_use]
    pub fn with_min_num(mut self, min_num: usize) -> Self {
        self.min_num = min_num;
        self
    }

    /// Sets the maximum number of forms.
    #[must_use]
    pub fn with_max_num(mut self, max_num: usize) -> Self {
        self.max_num = max_num;
        self
    }

    /// Enables form deletion support.
    #[must_use]
    pub fn with_can_delete(mut self, can_delete: bool) -> Self {
        self.can_delete = can_delete;
        self
    }

    /// Sets the formset prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Overrides an entry of the client-side option payload.
    #[must_use]
    pub fn with_js_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.js_options.insert(key.into(), value.into());
        self
    }

    /// Returns the formset prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the member forms.
    pub fn forms(&self) -> &[Box<dyn Form>] {
        &self.forms
    }

    /// Returns the total number of forms.
    pub fn total_form_count(&self) -> usize {
        self.forms.len()
    }

    /// Returns the number of bound (pre-populated) forms.
    pub fn initial_form_count(&self) -> usize {
        self.forms.iter().filter(|f| f.is_bound()).count()
    }

    /// Returns `true` if the formset has been bound to data.
    pub fn is_bound(&self) -> bool {
        self.is_bound
    }

    /// Returns formset-level (non-form) errors.
    pub fn non_form_errors(&self) -> &[String] {
        &self.non_form_errors
    }

    /// Returns the indices of forms marked for deletion.
    pub fn deleted_forms(&self) -> Vec<usize> {
        self.deletion_markers
            .iter()
            .enumerate()
            .filter_map(|(i, &marked)| marked.then_some(i))
            .collect()
    }

    /// Returns the management form data, rendered as hidden inputs on the page.
    pub fn management_form_data(&self) -> BTreeMap<String, String> {
        let prefix = &self.prefix;
        let mut data = BTreeMap::new();
        data.insert(
            format!("{prefix}-{TOTAL_FORMS}"),
            self.total_form_count().to_string(),
        );
        data.insert(
            format!("{prefix}-{INITIAL_FORMS}"),
            self.initial_form_count().to_string(),
        );
        data.insert(format!("{prefix}-{MIN_NUM_FORMS}"), self.min_num.to_string());
        data.insert(format!("{prefix}-{MAX_NUM_FORMS}"), self.max_num.to_string());
        data
    }

    /// Renders the management form as hidden HTML inputs.
    pub fn management_form_html(&self) -> String {
        let widget = Widget::hidden_input();
        self.management_form_data()
            .iter()
            .map(|(key, value)| widget.render(key, &[value.clone()], &[]))
            .collect()
    }

    /// Builds the option payload consumed by the client-side formset scripts.
    ///
    /// Defaults are merged with the per-formset overrides supplied via
    /// [`with_js_option`](FormSet::with_js_option).
    pub fn js_formset_options(&self) -> BTreeMap<String, String> {
        let mut options = BTreeMap::new();
        options.insert("prefix".to_string(), self.prefix.clone());
        options.insert("add-button-label".to_string(), "Add another".to_string());
        options.insert("add-title".to_string(), "New item".to_string());
        options.insert("delete-button-label".to_string(), "Delete item".to_string());
        options.insert(
            "delete-confirm-text".to_string(),
            "Are you sure? Item will be deleted after saving.".to_string(),
        );
        for (key, value) in &self.js_options {
            options.insert(key.clone(), value.clone());
        }
        options
    }

    /// Binds submitted data to every member form.
    ///
    /// Each form binds under `{prefix}-{index}`; when deletion is enabled,
    /// the per-form `DELETE` marker is read alongside.
    pub fn bind(&mut self, data: &QueryDict) {
        self.is_bound = true;
        self.deletion_markers = vec![false; self.forms.len()];

        for (i, form) in self.forms.iter_mut().enumerate() {
            let form_prefix = format!("{}-{i}", self.prefix);

            let bound_prefix = format!("{form_prefix}-");
            let mut form_data = QueryDict::new_mutable();
            for key in data.keys() {
                if let Some(field_name) = key.strip_prefix(&bound_prefix) {
                    if let Some(values) = data.get_list(key) {
                        for value in values {
                            let _ = form_data.append(field_name, value);
                        }
                    }
                }
            }
            form.bind(&form_data);

            if self.can_delete {
                let marker = data
                    .get(&format!("{form_prefix}-{DELETION_FIELD_NAME}"))
                    .is_some_and(|v| matches!(v, "on" | "true" | "1"));
                self.deletion_markers[i] = marker;
            }
        }
    }

    /// Validates all forms in the formset.
    ///
    /// Forms marked for deletion are skipped. Returns `true` if every
    /// remaining form is valid and the formset-level constraints hold.
    pub async fn is_valid(&mut self) -> bool {
        if !self.is_bound {
            return false;
        }

        self.non_form_errors.clear();
        let mut all_valid = true;

        for (i, form) in self.forms.iter_mut().enumerate() {
            if self.deletion_markers.get(i).copied().unwrap_or(false) {
                continue;
            }
            if !form.is_valid().await {
                all_valid = false;
            }
        }

        let remaining = self.forms.len() - self.deleted_forms().len();
        if remaining < self.min_num {
            self.non_form_errors
                .push(format!("Please submit at least {} forms.", self.min_num));
            all_valid = false;
        }
        if self.forms.len() > self.max_num {
            self.non_form_errors
                .push(format!("Please submit at most {} forms.", self.max_num));
            all_valid = false;
        }

        all_valid
    }

    /// Generates a JSON template context for the formset.
    ///
    /// Each member form contributes its own context plus its hidden delete
    /// marker; the delete marker never appears among visible fields.
    pub fn as_context(&self) -> Value {
        let delete_widget = Widget::hidden_input();
        let forms: Vec<Value> = self
            .forms
            .iter()
            .enumerate()
            .map(|(i, form)| {
                let mut ctx = form.as_context();
                if self.can_delete {
                    let html_name =
                        format!("{}-{i}-{DELETION_FIELD_NAME}", self.prefix);
                    let marked = self.deletion_markers.get(i).copied().unwrap_or(false);
                    let value = if marked { vec!["on".to_string()] } else { Vec::new() };
                    ctx["delete_field"] = json!(delete_widget.render(&html_name, &value, &[]));
                    ctx["marked_for_deletion"] = json!(marked);
                }
                ctx
            })
            .collect();

        let mut options = HashMap::new();
        for (key, value) in self.js_formset_options() {
            options.insert(key, value);
        }

        json!({
            "forms": forms,
            "management_form": self.management_form_html(),
            "non_form_errors": self.non_form_errors,
            "total_form_count": self.total_form_count(),
            "can_delete": self.can_delete,
            "form_headline_new_instance": "New item",
            "options": options,
        })
    }
}

/// Creates a formset from a factory function producing form instances.
pub fn create_formset<F>(form_factory: F, initial_count: usize, extra: usize) -> FormSet
where
    F: Fn(usize) -> Box<dyn Form>,
{
    let total = initial_count + extra;
    let forms: Vec<Box<dyn Form>> = (0..total).map(&form_factory).collect();
    FormSet::new(forms).with_extra(extra)
}
