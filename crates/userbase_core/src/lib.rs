//! Core domain logic for Userbase.
//! In-memory user storage, a validating service layer, and a channel-fed logger.

pub mod async_log;
pub mod config;
pub mod context;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod util;

pub use async_log::{AsyncLogger, AsyncLoggerBuilder, LogError, LogSender, LoggerHandle};
pub use config::AppConfig;
pub use context::{CancelHandle, Context, ContextError};
pub use export::users_to_json;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::user::{NewUser, User, UserId, UserValidationError};
pub use repo::user_repo::{InMemoryUserRepository, RepoError, RepoResult, UserRepository};
pub use service::user_service::{ServiceError, ServiceResult, UserService};
pub use util::sum;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
