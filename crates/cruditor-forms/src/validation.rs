//! Validation pipeline for form processing.
//!
//! Field-level validation runs first (type coercion plus per-field
//! constraints), then form-level cross-field validation. Errors accumulate
//! rather than short-circuiting, so all problems are reported at once.

use std::collections::HashMap;

use serde_json::Value;

use crate::fields::{clean_field_value, FormFieldDef};

/// Performs field-level validation for all fields.
///
/// For each field definition the raw values are pulled from `raw_data` and
/// run through [`clean_field_value`]; successes land in `cleaned_data`,
/// failures in `errors`. Disabled fields keep their initial value and skip
/// validation.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    raw_data: &HashMap<String, Vec<String>>,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let raw: &[String] = raw_data.get(&field.name).map_or(&[], Vec::as_slice);

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;

    #[test]
    fn test_clean_fields_accumulates_errors() {
        let fields = vec![
            FormFieldDef::new(
                "username",
                FormFieldType::Char {
                    min_length: Some(3),
                    max_length: None,
                    strip: true,
                },
            ),
            FormFieldDef::new("email", FormFieldType::Email),
        ];
        let mut raw = HashMap::new();
        raw.insert("username".to_string(), vec!["ab".to_string()]);
        raw.insert("email".to_string(), vec!["bad".to_string()]);

        let mut cleaned = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("email"));
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_clean_fields_disabled_uses_initial() {
        let fields = vec![FormFieldDef::new(
            "role",
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )
        .disabled(true)
        .initial(Value::String("admin".into()))];

        let mut raw = HashMap::new();
        raw.insert("role".to_string(), vec!["hacker".to_string()]);

        let mut cleaned = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(&fields, &raw, &mut cleaned, &mut errors);

        assert_eq!(cleaned.get("role"), Some(&Value::String("admin".into())));
        assert!(errors.is_empty());
    }
}
