//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Random URL-safe identifier (also used as document ID)
    pub id: String,
    /// Lowercase-normalized email, unique across all users
    pub email: String,
    /// Argon2 password hash
    pub password_hash: String,
    /// Display name shown on shared lists
    pub display_name: String,
    /// Always present; missing fields fall back to defaults
    #[serde(default)]
    pub preferences: UserPreferences,
    /// When the account was created
    pub created_at: String,
    /// Last profile modification
    pub updated_at: String,
    /// Last successful login
    pub last_active: String,
}

/// Per-user preference set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Whether to send email notifications for claims
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    /// Preferred currency code for item prices
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Hide already-claimed items on the owner's own view
    #[serde(default)]
    pub hide_claimed_items: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            currency: default_currency(),
            hide_claimed_items: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}
