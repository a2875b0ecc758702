use serde::{Deserialize, Serialize};

/// Represents an account that can authenticate with Basic credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Login name sent as the Basic username
    pub account: String,
    /// Display name or user-friendly label
    pub label: String,
    /// Whether the user has administrator privileges
    pub is_admin: bool,
}

impl User {
    pub fn new(id: String, account: String, label: String, is_admin: bool) -> Self {
        Self {
            id,
            account,
            label,
            is_admin,
        }
    }
}
