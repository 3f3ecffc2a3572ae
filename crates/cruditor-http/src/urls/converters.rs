//! Path converters for URL pattern matching.
//!
//! Converters define how URL path segments are matched and validated.
//!
//! | Name   | Regex                           | Matches            |
//! |--------|---------------------------------|--------------------|
//! | `int`  | `[0-9]+`                        | decimal integers   |
//! | `str`  | `[^/]+`                         | any non-slash text |
//! | `slug` | `[-a-zA-Z0-9_]+`                | slugs              |
//! | `uuid` | `[0-9a-f]{8}-...-[0-9a-f]{12}`  | UUIDs              |
//! | `path` | `.+`                            | text with slashes  |

use cruditor_core::{CruditorError, CruditorResult};

/// A typed path segment converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Matches one or more digits.
    Int,
    /// Matches any non-empty string without `/`.
    Str,
    /// Matches ASCII letters, digits, hyphens, and underscores.
    Slug,
    /// Matches the standard 8-4-4-4-12 UUID format.
    Uuid,
    /// Matches any non-empty string, including `/`.
    Path,
}

impl Converter {
    /// Looks up a converter by its name in a `<type:name>` placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::ImproperlyConfigured`] for unknown names.
    pub fn by_name(type_name: &str) -> CruditorResult<Self> {
        match type_name {
            "int" => Ok(Self::Int),
            "str" => Ok(Self::Str),
            "slug" => Ok(Self::Slug),
            "uuid" => Ok(Self::Uuid),
            "path" => Ok(Self::Path),
            _ => Err(CruditorError::ImproperlyConfigured(format!(
                "Unknown path converter type: {type_name}"
            ))),
        }
    }

    /// Returns the regex fragment that matches valid values for this converter.
    pub const fn regex(self) -> &'static str {
        match self {
            Self::Int => "[0-9]+",
            Self::Str => "[^/]+",
            Self::Slug => "[-a-zA-Z0-9_]+",
            Self::Uuid => "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
            Self::Path => ".+",
        }
    }

    /// Validates a matched segment beyond what the regex guarantees.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Int => value.parse::<i64>().is_ok(),
            Self::Uuid => value.parse::<uuid::Uuid>().is_ok(),
            Self::Str | Self::Slug | Self::Path => !value.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_known_types() {
        assert_eq!(Converter::by_name("int").unwrap(), Converter::Int);
        assert_eq!(Converter::by_name("str").unwrap(), Converter::Str);
        assert_eq!(Converter::by_name("slug").unwrap(), Converter::Slug);
        assert_eq!(Converter::by_name("uuid").unwrap(), Converter::Uuid);
        assert_eq!(Converter::by_name("path").unwrap(), Converter::Path);
    }

    #[test]
    fn test_by_name_unknown_type() {
        assert!(Converter::by_name("custom").is_err());
    }

    #[test]
    fn test_int_accepts() {
        assert!(Converter::Int.accepts("42"));
        assert!(Converter::Int.accepts("0"));
        assert!(!Converter::Int.accepts("abc"));
        assert!(!Converter::Int.accepts(""));
    }

    #[test]
    fn test_uuid_accepts() {
        assert!(Converter::Uuid.accepts("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!Converter::Uuid.accepts("not-a-uuid"));
    }

    #[test]
    fn test_str_slug_path_accept_non_empty() {
        assert!(Converter::Str.accepts("alice"));
        assert!(Converter::Slug.accepts("my-slug_1"));
        assert!(Converter::Path.accepts("a/b/c"));
        assert!(!Converter::Str.accepts(""));
    }

    #[test]
    fn test_regex_fragments_compile() {
        for conv in [
            Converter::Int,
            Converter::Str,
            Converter::Slug,
            Converter::Uuid,
            Converter::Path,
        ] {
            assert!(regex::Regex::new(conv.regex()).is_ok());
        }
    }

    #[test]
    fn test_int_regex_excludes_negative() {
        let re = regex::Regex::new(&format!("^{}$", Converter::Int.regex())).unwrap();
        assert!(re.is_match("123"));
        assert!(!re.is_match("-5"));
    }
}
