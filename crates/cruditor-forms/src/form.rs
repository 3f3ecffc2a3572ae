//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the abstraction the view layer works with. It
//! supports async validation (cross-field checks may need I/O), data binding
//! from a [`QueryDict`], and template context generation as JSON.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use cruditor_http::QueryDict;

use crate::fields::FormFieldDef;
use crate::validation;

/// The core form trait. All form types implement this.
///
/// `is_valid()` is async because cross-field validation commonly requires
/// store access (uniqueness checks and the like). All implementations must
/// be `Send + Sync` to work across async task boundaries.
#[async_trait]
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds raw form data to this form.
    fn bind(&mut self, data: &QueryDict);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form asynchronously. Returns `true` if valid.
    ///
    /// After calling this, `errors()` and `cleaned_data()` are populated.
    async fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned (validated and coerced) data.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Generates a JSON template context for rendering.
    fn as_context(&self) -> Value;

    /// Cross-field validation hook. Override to add form-level validation.
    ///
    /// Returned errors are merged into the form's error map; use the
    /// `"__all__"` key for non-field errors.
    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A general-purpose form built from a list of field definitions.
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Vec<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            prefix: None,
            bound: false,
            raw_data: HashMap::new(),
            errors: HashMap::new(),
            cleaned_data: HashMap::new(),
        }
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets initial values by patching the matching field definitions.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        for field in &mut self.field_defs {
            if let Some(value) = initial.get(&field.name) {
                field.initial = Some(value.clone());
            }
        }
        self
    }

    /// Returns the fields whose widgets are visible.
    pub fn visible_fields(&self) -> Vec<&FormFieldDef> {
        self.field_defs
            .iter()
            .filter(|f| !f.widget.is_hidden())
            .collect()
    }

    /// Returns the fields whose widgets are hidden.
    pub fn hidden_fields(&self) -> Vec<&FormFieldDef> {
        self.field_defs
            .iter()
            .filter(|f| f.widget.is_hidden())
            .collect()
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors.get("__all__").map_or(&[], Vec::as_slice)
    }

    /// Records a non-field error. Used by wrapper forms with custom
    /// cross-field checks.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors
            .entry("__all__".to_string())
            .or_default()
            .push(message.into());
    }

    /// The HTML name a field binds under, honoring the prefix.
    fn html_name(&self, field_name: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{field_name}"),
            None => field_name.to_string(),
        }
    }

    /// The values rendered into a field's widget: submitted data when bound,
    /// the initial value otherwise.
    fn display_values(&self, field: &FormFieldDef) -> Vec<String> {
        if let Some(raw) = self.raw_data.get(&field.name) {
            if !raw.is_empty() {
                return raw.clone();
            }
        }
        match &field.initial {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Number(n)) => vec![n.to_string()],
            Some(Value::Bool(b)) => vec![b.to_string()],
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &QueryDict) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_defs {
            let html_name = self.html_name(&field.name);
            let values = data.get_list(&html_name).cloned().unwrap_or_default();
            self.raw_data.insert(field.name.clone(), values);
        }
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    async fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        validation::clean_fields(
            &self.field_defs,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );

        if let Err(form_errors) = self.clean().await {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }

    fn as_context(&self) -> Value {
        let fields: Vec<Value> = self
            .field_defs
            .iter()
            .map(|field| {
                let html_name = self.html_name(&field.name);
                let values = self.display_values(field);
                json!({
                    "name": field.name,
                    "html_name": html_name,
                    "label": field.label,
                    "help_text": field.help_text,
                    "required": field.required,
                    "hidden": field.widget.is_hidden(),
                    "html": field.widget.render(&html_name, &values, field.field_type.choices()),
                    "id_for_label": field.widget.id_for_label(&html_name),
                    "errors": self.errors.get(&field.name).cloned().unwrap_or_default(),
                })
            })
            .collect();

        json!({
            "fields": fields,
            "errors": self.errors,
            "non_field_errors": self.non_field_errors(),
            "is_bound": self.bound,
        })
    }
}
