//! Query string dictionary for HTTP request parameters.
//!
//! [`QueryDict`] is an immutable-by-default, multi-valued dictionary for GET
//! and POST parameters.

use std::collections::HashMap;

use cruditor_core::{CruditorError, CruditorResult};

/// An immutable-by-default dictionary for query string and form data.
///
/// [`copy`](QueryDict::copy) returns a mutable clone; mutating an immutable
/// instance is an error.
///
/// # Examples
///
/// ```
/// use cruditor_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(qd.get_list("color"), Some(&vec!["red".to_string(), "blue".to_string()]));
///
/// let mut mutable = qd.copy();
/// mutable.set("color", "green").unwrap();
/// assert_eq!(mutable.get("color"), Some("green"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryDict {
    data: HashMap<String, Vec<String>>,
    mutable: bool,
}

impl QueryDict {
    /// Creates a new, empty, immutable `QueryDict`.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            mutable: false,
        }
    }

    /// Creates a new, empty, mutable `QueryDict`.
    pub fn new_mutable() -> Self {
        Self {
            data: HashMap::new(),
            mutable: true,
        }
    }

    /// Parses a URL query string (e.g. `"key1=val1&key2=val2"`) into an
    /// immutable `QueryDict`.
    ///
    /// Handles percent-encoding, `+`-as-space, and multiple values per key.
    pub fn parse(query_string: &str) -> Self {
        let mut data: HashMap<String, Vec<String>> = HashMap::new();

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq| (&pair[..eq], &pair[eq + 1..]));
            data.entry(percent_decode(key))
                .or_default()
                .push(percent_decode(value));
        }

        Self {
            data,
            mutable: false,
        }
    }

    /// Returns the last value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns all values for the given key, or `None` if not present.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get(key)
    }

    /// Sets a single value for the given key, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::SuspiciousOperation`] if this `QueryDict`
    /// is immutable.
    pub fn set(&mut self, key: &str, value: &str) -> CruditorResult<()> {
        self.check_mutable()?;
        self.data.insert(key.to_string(), vec![value.to_string()]);
        Ok(())
    }

    /// Appends a value to the list for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::SuspiciousOperation`] if this `QueryDict`
    /// is immutable.
    pub fn append(&mut self, key: &str, value: &str) -> CruditorResult<()> {
        self.check_mutable()?;
        self.data
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    fn check_mutable(&self) -> CruditorResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(CruditorError::SuspiciousOperation(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }

    /// Returns a mutable copy of this `QueryDict`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Encodes this `QueryDict` as a URL query string with sorted keys.
    pub fn urlencode(&self) -> String {
        let mut parts = Vec::new();
        for (key, values) in &self.data {
            for value in values {
                parts.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }
        parts.sort();
        parts.join("&")
    }

    /// Returns `true` if this `QueryDict` is mutable.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

/// Decodes a percent-encoded string, treating `+` as a space.
fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a URL query.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
