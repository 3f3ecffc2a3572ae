//! The request-user seam.
//!
//! Cruditor views only need a handful of facts about the requesting user:
//! whether they are active, whether they are staff, and which permissions
//! they hold. How those facts are established (sessions, tokens, ...) is the
//! host application's business.

use std::collections::HashSet;

use serde::Serialize;

/// The user attached to an incoming request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestUser {
    /// The username, empty for anonymous users.
    pub username: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the user may access staff-only views.
    pub is_staff: bool,
    /// Superusers implicitly hold every permission.
    pub is_superuser: bool,
    /// Permission codenames held by this user (e.g. `"accounts.change_user"`).
    pub permissions: HashSet<String>,
}

impl RequestUser {
    /// Creates an active, non-staff user with no permissions.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            permissions: HashSet::new(),
        }
    }

    /// Creates an anonymous (unauthenticated) user.
    pub fn anonymous() -> Self {
        Self {
            username: String::new(),
            is_active: false,
            is_staff: false,
            is_superuser: false,
            permissions: HashSet::new(),
        }
    }

    /// Marks this user as staff.
    #[must_use]
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Marks this user as superuser.
    #[must_use]
    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    /// Grants a permission codename.
    #[must_use]
    pub fn with_permission(mut self, perm: impl Into<String>) -> Self {
        self.permissions.insert(perm.into());
        self
    }

    /// Returns `true` if this user is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.is_active && !self.username.is_empty()
    }

    /// Returns `true` if this user holds the given permission.
    ///
    /// Inactive users never hold permissions; superusers hold all of them.
    pub fn has_perm(&self, perm: &str) -> bool {
        if !self.is_active {
            return false;
        }
        if self.is_superuser {
            return true;
        }
        self.permissions.contains(perm)
    }
}

impl Default for RequestUser {
    fn default() -> Self {
        Self::anonymous()
    }
}
