//! Domain model for registered users.
//!
//! # Responsibility
//! - Define the canonical user record returned by repositories and services.
//! - Define the registration draft validated before any repository write.
//!
//! # Invariants
//! - Every stored user is identified by a repository-assigned `UserId`.
//! - Users are never updated or deleted once stored.

pub mod user;
