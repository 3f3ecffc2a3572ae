//! Error types for the cruditor toolkit.
//!
//! [`CruditorError`] covers the failure modes the view layer can encounter:
//! permission problems, missing objects, configuration mistakes, validation
//! failures, and deletions blocked by protected relations.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists).
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            field_errors,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the cruditor toolkit.
///
/// Each variant maps to an HTTP status code via [`CruditorError::status_code`].
#[derive(Error, Debug)]
pub enum CruditorError {
    /// HTTP 403 Forbidden / Permission Denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested object does not exist in the backing store.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    /// A deletion was blocked by protected related objects.
    ///
    /// Carries human-readable labels of the objects holding the relation.
    #[error("Cannot delete: protected by {} related object(s)", .0.len())]
    ProtectedRelation(Vec<String>),

    /// A view or URL plan is improperly configured.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A potentially malicious or unsupported operation was attempted.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),

    /// A backing-store operation failed.
    #[error("Store error: {0}")]
    StoreError(String),
}

impl CruditorError {
    /// Returns the HTTP status code associated with this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) => 400,
            Self::PermissionDenied(_) | Self::SuspiciousOperation(_) => 403,
            Self::NotFound(_) | Self::DoesNotExist(_) => 404,
            Self::ProtectedRelation(_) => 409,
            Self::ImproperlyConfigured(_) | Self::StoreError(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, CruditorError>`.
pub type CruditorResult<T> = Result<T, CruditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "email".to_string(),
            vec![ValidationError::new("Invalid email.", "invalid")],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert!(err.to_string().contains("email: Invalid email."));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CruditorError::PermissionDenied("x".into()).status_code(), 403);
        assert_eq!(CruditorError::NotFound("x".into()).status_code(), 404);
        assert_eq!(CruditorError::DoesNotExist("x".into()).status_code(), 404);
        assert_eq!(
            CruditorError::ValidationError(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert_eq!(
            CruditorError::ProtectedRelation(vec!["Group: admins".into()]).status_code(),
            409
        );
        assert_eq!(
            CruditorError::ImproperlyConfigured("x".into()).status_code(),
            500
        );
        assert_eq!(
            CruditorError::SuspiciousOperation("x".into()).status_code(),
            403
        );
    }

    #[test]
    fn test_protected_relation_display() {
        let err = CruditorError::ProtectedRelation(vec!["User: admin".into(), "User: guest".into()]);
        assert!(err.to_string().contains("2 related object(s)"));
    }
}
