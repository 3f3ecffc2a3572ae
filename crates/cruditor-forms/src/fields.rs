//! Form field definitions and field-level cleaning.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use cruditor_core::text::capfirst;

use crate::widgets::Widget;

/// The type of a form field, carrying its type-specific constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    /// Free text.
    Char {
        /// Minimum length, if any.
        min_length: Option<usize>,
        /// Maximum length, if any.
        max_length: Option<usize>,
        /// Whether surrounding whitespace is stripped before validation.
        strip: bool,
    },
    /// A whole number.
    Integer {
        /// Inclusive lower bound, if any.
        min_value: Option<i64>,
        /// Inclusive upper bound, if any.
        max_value: Option<i64>,
    },
    /// A checkbox.
    Boolean,
    /// An email address.
    Email,
    /// A calendar date (`YYYY-MM-DD`).
    Date,
    /// A date with time (`YYYY-MM-DDTHH:MM` or with a space separator).
    DateTime,
    /// One value out of a fixed set of `(value, label)` pairs.
    Choice {
        /// The permitted choices.
        choices: Vec<(String, String)>,
    },
    /// Several values out of a fixed set of `(value, label)` pairs.
    MultipleChoice {
        /// The permitted choices.
        choices: Vec<(String, String)>,
    },
    /// A password (never echoed back).
    Password {
        /// Minimum length, if any.
        min_length: Option<usize>,
    },
}

impl FormFieldType {
    /// Returns the `(value, label)` choices for select-backed fields.
    pub fn choices(&self) -> &[(String, String)] {
        match self {
            Self::Choice { choices } | Self::MultipleChoice { choices } => choices,
            _ => &[],
        }
    }
}

/// Returns the widget a field type renders with unless overridden.
pub fn default_widget_for_field_type(field_type: &FormFieldType) -> Widget {
    match field_type {
        FormFieldType::Char { .. } => Widget::text_input(),
        FormFieldType::Integer { .. } => Widget::number_input(),
        FormFieldType::Boolean => Widget::checkbox_input(),
        FormFieldType::Email => Widget::email_input(),
        FormFieldType::Date => Widget::date_input(),
        FormFieldType::DateTime => Widget::datetime_input(),
        FormFieldType::Choice { .. } => Widget::select(),
        FormFieldType::MultipleChoice { .. } => Widget::select_multiple(),
        FormFieldType::Password { .. } => Widget::password_input(),
    }
}

/// A single field in a form.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name (also the default basis of the label).
    pub name: String,
    /// The field type and its constraints.
    pub field_type: FormFieldType,
    /// Whether a value must be supplied.
    pub required: bool,
    /// The human-readable label.
    pub label: String,
    /// Optional help text shown next to the field.
    pub help_text: String,
    /// The initial value used when unbound or when an optional field is empty.
    pub initial: Option<Value>,
    /// The widget this field renders with.
    pub widget: Widget,
    /// Disabled fields ignore submitted data and keep their initial value.
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a required field with a label derived from its name.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let label = capfirst(&name.replace('_', " "));
        let widget = default_widget_for_field_type(&field_type);
        Self {
            name,
            field_type,
            required: true,
            label,
            help_text: String::new(),
            initial: None,
            widget,
            disabled: false,
        }
    }

    /// Sets whether the field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Overrides the widget.
    #[must_use]
    pub fn widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    /// Marks the field as disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Cleans (validates and coerces) raw form input into a typed JSON value.
///
/// Checks requiredness, coerces the type, and applies the type-specific
/// constraints. Returns the cleaned value or the list of error messages.
pub fn clean_field_value(field: &FormFieldDef, raw: &[String]) -> Result<Value, Vec<String>> {
    let first = raw.first().map(String::as_str).unwrap_or("");
    let is_empty = match &field.field_type {
        FormFieldType::MultipleChoice { .. } => raw.is_empty(),
        FormFieldType::Boolean => false,
        _ => first.is_empty(),
    };

    if is_empty {
        if field.required {
            return Err(vec!["This field is required.".to_string()]);
        }
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }

    let mut errors = Vec::new();

    let value = match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let s = if *strip { first.trim() } else { first };
            if let Some(min) = min_length {
                if s.chars().count() < *min {
                    errors.push(format!(
                        "Ensure this value has at least {min} characters (it has {}).",
                        s.chars().count()
                    ));
                }
            }
            if let Some(max) = max_length {
                if s.chars().count() > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {}).",
                        s.chars().count()
                    ));
                }
            }
            Value::String(s.to_string())
        }

        FormFieldType::Integer {
            min_value,
            max_value,
        } => match first.parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!(
                            "Ensure this value is greater than or equal to {min}."
                        ));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!(
                            "Ensure this value is less than or equal to {max}."
                        ));
                    }
                }
                Value::from(n)
            }
            Err(_) => {
                errors.push("Enter a whole number.".to_string());
                Value::Null
            }
        },

        FormFieldType::Boolean => Value::Bool(matches!(first, "on" | "true" | "1")),

        FormFieldType::Email => {
            if EMAIL_RE.is_match(first) {
                Value::String(first.to_string())
            } else {
                errors.push("Enter a valid email address.".to_string());
                Value::Null
            }
        }

        FormFieldType::Date => match NaiveDate::parse_from_str(first, "%Y-%m-%d") {
            Ok(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Err(_) => {
                errors.push("Enter a valid date.".to_string());
                Value::Null
            }
        },

        FormFieldType::DateTime => match parse_datetime(first) {
            Some(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => {
                errors.push("Enter a valid date/time.".to_string());
                Value::Null
            }
        },

        FormFieldType::Choice { choices } => {
            if choices.iter().any(|(value, _)| value == first) {
                Value::String(first.to_string())
            } else {
                errors.push(format!(
                    "Select a valid choice. {first} is not one of the available choices."
                ));
                Value::Null
            }
        }

        FormFieldType::MultipleChoice { choices } => {
            let mut selected = Vec::new();
            for value in raw {
                if choices.iter().any(|(v, _)| v == value) {
                    selected.push(Value::String(value.clone()));
                } else {
                    errors.push(format!(
                        "Select a valid choice. {value} is not one of the available choices."
                    ));
                }
            }
            Value::Array(selected)
        }

        FormFieldType::Password { min_length } => {
            if let Some(min) = min_length {
                if first.chars().count() < *min {
                    errors.push(format!(
                        "This password is too short. It must contain at least {min} characters."
                    ));
                }
            }
            Value::String(first.to_string())
        }
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetKind;

    fn char_field(name: &str) -> FormFieldDef {
        FormFieldDef::new(
            name,
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )
    }

    #[test]
    fn test_default_label() {
        let field = char_field("first_name");
        assert_eq!(field.label, "First name");
    }

    #[test]
    fn test_default_widgets() {
        assert_eq!(char_field("x").widget.kind, WidgetKind::TextInput);
        assert_eq!(
            FormFieldDef::new("n", FormFieldType::Integer { min_value: None, max_value: None })
                .widget
                .kind,
            WidgetKind::NumberInput
        );
        assert_eq!(
            FormFieldDef::new("ok", FormFieldType::Boolean).widget.kind,
            WidgetKind::CheckboxInput
        );
        assert_eq!(
            FormFieldDef::new("p", FormFieldType::Password { min_length: None })
                .widget
                .kind,
            WidgetKind::PasswordInput
        );
    }

    #[test]
    fn test_required_missing() {
        let field = char_field("name");
        let result = clean_field_value(&field, &[]);
        assert_eq!(result.unwrap_err(), vec!["This field is required."]);
    }

    #[test]
    fn test_optional_missing_uses_initial() {
        let field = char_field("name")
            .required(false)
            .initial(Value::String("fallback".into()));
        assert_eq!(
            clean_field_value(&field, &[]).unwrap(),
            Value::String("fallback".into())
        );
    }

    #[test]
    fn test_char_strip_and_bounds() {
        let field = FormFieldDef::new(
            "username",
            FormFieldType::Char {
                min_length: Some(3),
                max_length: Some(10),
                strip: true,
            },
        );
        assert_eq!(
            clean_field_value(&field, &["  alice  ".to_string()]).unwrap(),
            Value::String("alice".into())
        );
        assert!(clean_field_value(&field, &["ab".to_string()]).is_err());
        assert!(clean_field_value(&field, &["abcdefghijk".to_string()]).is_err());
    }

    #[test]
    fn test_integer_coercion_and_bounds() {
        let field = FormFieldDef::new(
            "age",
            FormFieldType::Integer {
                min_value: Some(0),
                max_value: Some(150),
            },
        );
        assert_eq!(clean_field_value(&field, &["30".to_string()]).unwrap(), Value::from(30));
        assert!(clean_field_value(&field, &["abc".to_string()]).is_err());
        assert!(clean_field_value(&field, &["200".to_string()]).is_err());
    }

    #[test]
    fn test_boolean() {
        let field = FormFieldDef::new("is_active", FormFieldType::Boolean);
        assert_eq!(
            clean_field_value(&field, &["on".to_string()]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(clean_field_value(&field, &[]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_email() {
        let field = FormFieldDef::new("email", FormFieldType::Email);
        assert!(clean_field_value(&field, &["a@b.com".to_string()]).is_ok());
        assert!(clean_field_value(&field, &["not-an-email".to_string()]).is_err());
    }

    #[test]
    fn test_date() {
        let field = FormFieldDef::new("born", FormFieldType::Date);
        assert_eq!(
            clean_field_value(&field, &["2024-06-01".to_string()]).unwrap(),
            Value::String("2024-06-01".into())
        );
        assert!(clean_field_value(&field, &["01/06/2024".to_string()]).is_err());
    }

    #[test]
    fn test_datetime_formats() {
        let field = FormFieldDef::new("published", FormFieldType::DateTime);
        for raw in ["2024-06-01T12:30", "2024-06-01 12:30:00"] {
            assert!(clean_field_value(&field, &[raw.to_string()]).is_ok(), "{raw}");
        }
        assert!(clean_field_value(&field, &["june first".to_string()]).is_err());
    }

    #[test]
    fn test_choice() {
        let field = FormFieldDef::new(
            "color",
            FormFieldType::Choice {
                choices: vec![
                    ("r".to_string(), "Red".to_string()),
                    ("b".to_string(), "Blue".to_string()),
                ],
            },
        );
        assert!(clean_field_value(&field, &["r".to_string()]).is_ok());
        assert!(clean_field_value(&field, &["g".to_string()]).is_err());
    }

    #[test]
    fn test_multiple_choice() {
        let field = FormFieldDef::new(
            "colors",
            FormFieldType::MultipleChoice {
                choices: vec![
                    ("r".to_string(), "Red".to_string()),
                    ("b".to_string(), "Blue".to_string()),
                ],
            },
        );
        let cleaned =
            clean_field_value(&field, &["r".to_string(), "b".to_string()]).unwrap();
        assert_eq!(
            cleaned,
            Value::Array(vec![
                Value::String("r".into()),
                Value::String("b".into())
            ])
        );
        assert!(clean_field_value(&field, &["x".to_string()]).is_err());
    }

    #[test]
    fn test_password_min_length() {
        let field = FormFieldDef::new(
            "new_password1",
            FormFieldType::Password {
                min_length: Some(8),
            },
        );
        assert!(clean_field_value(&field, &["short".to_string()]).is_err());
        assert!(clean_field_value(&field, &["long enough".to_string()]).is_ok());
    }
}
