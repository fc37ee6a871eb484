//! Chat identity - the two sides of a support conversation

use serde::{Deserialize, Serialize};

/// String under which the admin side is addressed and stored. Room names and
/// the `sender`/`receiver` columns use it as-is.
pub const ADMIN_ID: &str = "admin";

/// A resolved party in a conversation.
///
/// Sender and receiver are persisted as plain strings, where the admin side
/// shares a single reserved identifier. Keeping the distinction in an enum
/// means a token carrying `role: "admin"` can never be confused with a user
/// whose id happens to equal the sentinel string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    User(String),
    Admin,
}

impl Identity {
    /// String encoding used at the store boundary and as room name.
    pub fn as_str(&self) -> &str {
        match self {
            Identity::User(id) => id.as_str(),
            Identity::Admin => ADMIN_ID,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin)
    }

    pub fn role(&self) -> &'static str {
        match self {
            Identity::User(_) => "user",
            Identity::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
