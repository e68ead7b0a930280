//! User registration and lookup service.
//!
//! # Responsibility
//! - Validate registration input before it reaches the repository.
//! - Poll the caller's context before lookups.
//!
//! # Invariants
//! - Rejected registrations never touch the repository.
//! - A lookup with a done context never touches the repository.
//! - Repository and context errors reach the caller unchanged.

use crate::context::{Context, ContextError};
use crate::model::user::{NewUser, User, UserId, UserValidationError};
use crate::repo::user_repo::{RepoError, UserRepository};
use log::warn;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by `UserService`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] UserValidationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Use-case service over a user repository.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers a user after checking that name and email are non-empty.
    ///
    /// # Contract
    /// - Returns `ServiceError::Validation` for empty input, with no repository call.
    /// - Otherwise returns the stored record with its assigned id and timestamp.
    pub fn register_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> ServiceResult<User> {
        let draft = NewUser::new(name, email);
        if let Err(err) = draft.validate() {
            warn!("event=user_register module=service status=rejected reason={err}");
            return Err(err.into());
        }

        Ok(self.repo.create(draft)?)
    }

    /// Fetches a user unless `ctx` is already done.
    ///
    /// The context is checked once, before the repository call. A cancellation
    /// that lands while the lookup runs is not observed.
    pub fn get_user(&self, ctx: &Context, id: UserId) -> ServiceResult<User> {
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }

        Ok(self.repo.get_by_id(id)?)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repo.list()
    }
}
