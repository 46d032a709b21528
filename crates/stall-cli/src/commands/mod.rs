pub mod chat;
pub mod menu;
pub mod orders;
pub mod say;

use uuid::Uuid;

/// Session id for a CLI run: the one given, or a fresh UUID.
pub fn session_id(given: Option<String>) -> String {
    given.unwrap_or_else(|| Uuid::new_v4().to_string())
}
