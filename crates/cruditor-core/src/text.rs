//! Small text helpers used across the view layer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use cruditor_core::text::capfirst;
///
/// assert_eq!(capfirst("person"), "Person");
/// assert_eq!(capfirst(""), "");
/// assert_eq!(capfirst("HELLO"), "HELLO");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Converts a string to a URL-friendly slug.
///
/// Converts to lowercase, removes non-alphanumeric characters (except hyphens
/// and spaces), replaces whitespace with hyphens, and collapses runs of
/// hyphens.
///
/// # Examples
///
/// ```
/// use cruditor_core::text::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  Spaced  Out  "), "spaced-out");
/// assert_eq!(slugify("already-slugged"), "already-slugged");
/// ```
pub fn slugify(s: &str) -> String {
    static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
    static MULTI_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

    let s = s.to_lowercase();
    let s = NON_ALNUM.replace_all(&s, "");
    let s = MULTI_HYPHEN.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}
