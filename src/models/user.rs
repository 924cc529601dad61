//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

/// Default mascot shown by the client.
pub const DEFAULT_MASCOT_NAME: &str = "Kiwi";

/// Color theme chosen in settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Matcha,
    Sparkles,
    Coffee,
}

fn default_true() -> bool {
    true
}

fn default_mascot_name() -> String {
    DEFAULT_MASCOT_NAME.to_string()
}

/// User profile stored in Firestore.
///
/// Document ID is the user ID issued by the authentication provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (subject of the session token)
    pub id: String,
    /// Email address (may be None if not shared)
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub current_theme: Theme,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_mascot_name")]
    pub mascot_name: String,
    /// Set once the onboarding survey is submitted
    #[serde(default)]
    pub has_completed_onboarding: bool,
    #[serde(default = "default_true")]
    pub is_first_time: bool,
    /// When the profile was created (RFC3339)
    pub created_at: String,
    /// Last modification (RFC3339)
    pub updated_at: String,
}

impl User {
    /// Fresh profile for a first-time user.
    pub fn new(id: &str, now: &str) -> Self {
        Self {
            id: id.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            current_theme: Theme::default(),
            dark_mode: false,
            notifications_enabled: true,
            mascot_name: default_mascot_name(),
            has_completed_onboarding: false,
            is_first_time: true,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Record that the onboarding survey was answered.
    pub fn complete_onboarding(&mut self, now: &str) {
        self.has_completed_onboarding = true;
        self.is_first_time = false;
        self.updated_at = now.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(user, User::new("u1", "2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_complete_onboarding() {
        let mut user = User::new("u1", "2024-01-01T00:00:00Z");
        user.complete_onboarding("2024-01-02T00:00:00Z");

        assert!(user.has_completed_onboarding);
        assert!(!user.is_first_time);
        assert_eq!(user.updated_at, "2024-01-02T00:00:00Z");
        assert_eq!(user.created_at, "2024-01-01T00:00:00Z");
    }
}
