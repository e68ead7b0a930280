//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define the user data access contract used by the service layer.
//! - Keep storage details out of service/business orchestration.
//!
//! # Invariants
//! - Repositories assign identifiers and creation timestamps; callers never do.
//! - Repository APIs return semantic errors (`NotFound`) for missing records.

pub mod user_repo;
