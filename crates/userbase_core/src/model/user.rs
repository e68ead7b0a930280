//! User domain model.
//!
//! # Responsibility
//! - Define the stored `User` record and its export field names.
//! - Define `NewUser`, the unsaved registration draft.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the repository and never change.
//! - A `NewUser` that passes `validate()` has non-empty name and email.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Repository-assigned identifier. Sequential, starting at 1.
pub type UserId = u64;

/// Stored user record.
///
/// Serialized as `{ id, name, email, created_at }` with `created_at` in RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique, monotonically increasing identifier.
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Creation instant recorded by the repository.
    pub created_at: DateTime<Utc>,
}

/// Registration input that has not been stored yet.
///
/// Carries no identifier or timestamp; both are assigned on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Validation errors for registration drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("email cannot be empty")]
    EmptyEmail,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks the draft before it may reach a repository.
    ///
    /// Only the empty string is rejected; surrounding whitespace is kept as-is.
    /// Name is checked before email.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(())
    }

    /// Turns the draft into a stored record with the given identity.
    pub(crate) fn into_user(self, id: UserId, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            created_at,
        }
    }
}
