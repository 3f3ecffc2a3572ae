//! Filtersets for the list view: declared filters over JSON rows, driven by
//! the request's query parameters, contributing a filter form context.

use serde_json::{json, Value};

use cruditor_forms::fields::{FormFieldDef, FormFieldType};
use cruditor_http::QueryDict;

/// How a text filter matches a row field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Case-insensitive containment (the default).
    IContains,
    /// Case-insensitive prefix match.
    IStartsWith,
    /// Case-insensitive equality.
    IExact,
    /// Word search: every whitespace-separated term must be contained.
    Search,
}

impl Lookup {
    fn matches(self, haystack: &str, needle: &str) -> bool {
        let haystack = haystack.to_lowercase();
        let needle = needle.to_lowercase();
        match self {
            Self::IContains => haystack.contains(&needle),
            Self::IStartsWith => haystack.starts_with(&needle),
            Self::IExact => haystack == needle,
            Self::Search => needle
                .split_whitespace()
                .all(|term| haystack.contains(term)),
        }
    }
}

/// A single filter over one or more row fields.
pub trait Filter: Send + Sync {
    /// The query parameter this filter reads.
    fn name(&self) -> &str;

    /// Retains the rows matching `value`.
    fn apply(&self, rows: Vec<Value>, value: &str) -> Vec<Value>;

    /// The form field rendered for this filter.
    fn form_field(&self) -> FormFieldDef;
}

fn field_text(row: &Value, field: &str) -> String {
    match row.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// A free-text filter over a single row field.
pub struct CharFilter {
    name: String,
    field: String,
    lookup: Lookup,
}

impl CharFilter {
    /// Creates a contains-filter reading the query parameter `name` and
    /// matching the row field of the same name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            lookup: Lookup::IContains,
        }
    }

    /// Matches against a different row field.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Overrides the lookup mode.
    #[must_use]
    pub fn lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = lookup;
        self
    }
}

impl Filter for CharFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, rows: Vec<Value>, value: &str) -> Vec<Value> {
        rows.into_iter()
            .filter(|row| self.lookup.matches(&field_text(row, &self.field), value))
            .collect()
    }

    fn form_field(&self) -> FormFieldDef {
        FormFieldDef::new(
            self.name.clone(),
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )
        .required(false)
    }
}

/// A filter matching a row field against a fixed set of choices.
pub struct ChoiceFilter {
    name: String,
    field: String,
    choices: Vec<(String, String)>,
    empty_label: Option<String>,
}

impl ChoiceFilter {
    /// Creates a choice filter reading the query parameter `name`.
    pub fn new(name: impl Into<String>, choices: Vec<(String, String)>) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            choices,
            empty_label: None,
        }
    }

    /// Matches against a different row field.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Prepends an empty "any" choice with the given label.
    ///
    /// The resulting filter leaves the rows untouched when the empty choice
    /// is selected.
    #[must_use]
    pub fn empty_label(mut self, label: impl Into<String>) -> Self {
        self.empty_label = Some(label.into());
        self
    }

    /// A choice filter with the stock "Any choice" empty option.
    pub fn any_choice(name: impl Into<String>, choices: Vec<(String, String)>) -> Self {
        Self::new(name, choices).empty_label("Any choice")
    }
}

impl Filter for ChoiceFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, rows: Vec<Value>, value: &str) -> Vec<Value> {
        if value.is_empty() {
            return rows;
        }
        rows.into_iter()
            .filter(|row| field_text(row, &self.field) == value)
            .collect()
    }

    fn form_field(&self) -> FormFieldDef {
        let mut choices = Vec::new();
        if let Some(label) = &self.empty_label {
            choices.push((String::new(), label.clone()));
        }
        choices.extend(self.choices.iter().cloned());
        FormFieldDef::new(self.name.clone(), FormFieldType::Choice { choices }).required(false)
    }
}

/// A single-input filter OR-matched across several row fields.
///
/// Field names may carry a lookup marker: `^` for prefix match, `=` for
/// exact match, `@` for word search; unmarked fields use containment.
///
/// ```
/// use cruditor_views::filters::MultiCharFilter;
///
/// let search = MultiCharFilter::new(
///     "search",
///     &["username", "first_name", "last_name", "^email"],
/// );
/// ```
pub struct MultiCharFilter {
    name: String,
    fields: Vec<(String, Lookup)>,
}

impl MultiCharFilter {
    /// Creates a multi-field filter reading the query parameter `name`.
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        let fields = fields
            .iter()
            .map(|spec| match spec.split_at(spec.len().min(1)) {
                ("^", rest) => (rest.to_string(), Lookup::IStartsWith),
                ("=", rest) => (rest.to_string(), Lookup::IExact),
                ("@", rest) => (rest.to_string(), Lookup::Search),
                _ => ((*spec).to_string(), Lookup::IContains),
            })
            .collect();
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl Filter for MultiCharFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, rows: Vec<Value>, value: &str) -> Vec<Value> {
        if self.fields.is_empty() || value.is_empty() {
            return rows;
        }
        rows.into_iter()
            .filter(|row| {
                self.fields
                    .iter()
                    .any(|(field, lookup)| lookup.matches(&field_text(row, field), value))
            })
            .collect()
    }

    fn form_field(&self) -> FormFieldDef {
        FormFieldDef::new(
            self.name.clone(),
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )
        .required(false)
    }
}

/// A set of filters applied together from the request's query parameters.
#[derive(Default)]
pub struct FilterSet {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterSet {
    /// Creates an empty filterset.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Adds a filter.
    #[must_use]
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Applies every filter with a non-empty query value, in order.
    pub fn filter(&self, query: &QueryDict, rows: Vec<Value>) -> Vec<Value> {
        let mut rows = rows;
        for filter in &self.filters {
            if let Some(value) = query.get(filter.name()) {
                if !value.is_empty() {
                    rows = filter.apply(rows, value);
                }
            }
        }
        rows
    }

    /// Renders the filter form context with the current query values.
    pub fn form_context(&self, query: &QueryDict) -> Value {
        let fields: Vec<Value> = self
            .filters
            .iter()
            .map(|filter| {
                let field = filter.form_field();
                let value = query.get(filter.name()).unwrap_or("").to_string();
                let values = if value.is_empty() {
                    Vec::new()
                } else {
                    vec![value.clone()]
                };
                json!({
                    "name": field.name,
                    "label": field.label,
                    "value": value,
                    "html": field.widget.render(&field.name, &values, field.field_type.choices()),
                })
            })
            .collect();
        json!({"fields": fields})
    }

    /// Returns `true` if no filters are declared.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
