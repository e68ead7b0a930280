//! User repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide create/get/list over canonical user storage.
//! - Keep the storage map and identifier counter behind a single lock.
//!
//! # Invariants
//! - Identifiers start at 1 and increase by one per successful create.
//! - Every operation holds the lock for its full duration; there is no
//!   separate read path.
//! - `list` order is unspecified and must not be relied upon.

use crate::model::user::{NewUser, User, UserId};
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("user not found: {0}")]
    NotFound(UserId),
}

/// Repository interface for user storage.
pub trait UserRepository: Send + Sync {
    /// Stores a draft, assigning the next identifier and the current time.
    fn create(&self, draft: NewUser) -> RepoResult<User>;
    /// Returns the record with `id`, or `RepoError::NotFound`.
    fn get_by_id(&self, id: UserId) -> RepoResult<User>;
    /// Returns a snapshot of all records in unspecified order.
    fn list(&self) -> Vec<User>;
    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    fn create(&self, draft: NewUser) -> RepoResult<User> {
        (**self).create(draft)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        (**self).get_by_id(id)
    }

    fn list(&self) -> Vec<User> {
        (**self).list()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<T: UserRepository + ?Sized> UserRepository for &T {
    fn create(&self, draft: NewUser) -> RepoResult<User> {
        (**self).create(draft)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        (**self).get_by_id(id)
    }

    fn list(&self) -> Vec<User> {
        (**self).list()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

struct UserTable {
    users: HashMap<UserId, User>,
    next_id: UserId,
}

/// Mutex-guarded in-memory user repository.
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(UserTable {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    // A panic while holding the guard cannot leave the table half-written:
    // each mutation is one insert followed by one increment.
    fn lock(&self) -> MutexGuard<'_, UserTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, draft: NewUser) -> RepoResult<User> {
        let mut table = self.lock();

        let id = table.next_id;
        let user = draft.into_user(id, Utc::now());
        table.users.insert(id, user.clone());
        table.next_id += 1;

        debug!("event=user_create module=repo status=ok id={id}");
        Ok(user)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        let table = self.lock();
        match table.users.get(&id) {
            Some(user) => Ok(user.clone()),
            None => {
                debug!("event=user_lookup module=repo status=not_found id={id}");
                Err(RepoError::NotFound(id))
            }
        }
    }

    fn list(&self) -> Vec<User> {
        let table = self.lock();
        table.users.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.lock().users.len()
    }
}
