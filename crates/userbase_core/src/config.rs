//! Driver configuration.
//!
//! All values are compiled-in defaults; nothing is read from files, flags or the
//! environment.

use crate::logging::{default_log_level, LogTarget};
use std::time::Duration;

pub const APP_NAME: &str = "Backend Fundamentals Practice";
pub const APP_VERSION: &str = "1.0.0";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    /// Deadline applied to the context used for user lookups.
    pub lookup_timeout: Duration,
    pub log_level: String,
    pub log_target: LogTarget,
    /// Async logger channel capacity; `0` is an unbuffered handoff.
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            app_version: APP_VERSION.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            log_level: default_log_level().to_string(),
            log_target: LogTarget::Stderr,
            log_capacity: 0,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.app_name.trim().is_empty() {
            return Err("app_name cannot be blank".to_string());
        }
        if self.lookup_timeout.is_zero() {
            return Err("lookup_timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Banner printed at startup, e.g. `Backend Fundamentals Practice v1.0.0`.
    pub fn banner(&self) -> String {
        format!("{} v{}", self.app_name, self.app_version)
    }
}
