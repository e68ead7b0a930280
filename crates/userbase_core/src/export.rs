//! JSON rendering of user listings.

use crate::model::user::User;

/// Renders users as a pretty-printed JSON array.
///
/// Each element carries `id`, `name`, `email` and an RFC 3339 `created_at`.
pub fn users_to_json(users: &[User]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(users)
}
