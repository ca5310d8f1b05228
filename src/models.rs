use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod workout;

pub use auth::AuthResult;
pub use workout::{NewWorkoutSession, WorkoutSession};

/// Token lifetime assumed when the provider omits `expires_in`
pub const DEFAULT_EXPIRES_IN: i64 = 3600;

static NAME_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._-]+").expect("static regex"));

/// Authenticated session as issued by the identity provider
///
/// Field names follow the provider's wire format so the same shape is used
/// for API responses and for the persisted blob.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    /// Absolute expiry in epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: BackendUser,
}

fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the provider left it out
    #[must_use]
    pub fn with_derived_expiry(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now.saturating_add(self.expires_in));
        }
        self
    }

    /// Whether the access token is past its expiry at `now` (epoch seconds).
    /// Sessions without an expiry never report expired.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    #[must_use]
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// User object returned by the identity provider
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BackendUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Application-facing user, always derived from the active session
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&BackendUser> for User {
    fn from(user: &BackendUser) -> Self {
        let email = user.email.clone().unwrap_or_default();
        let metadata = user.user_metadata.as_ref();
        let name = metadata
            .and_then(|m| non_blank(m.full_name.as_deref()))
            .or_else(|| metadata.and_then(|m| non_blank(m.name.as_deref())))
            .unwrap_or_else(|| name_from_email(&email));

        Self {
            id: user.id.clone(),
            email,
            name,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Turn the local part of an email into a display name:
/// `jane.doe-smith@x.io` becomes `Jane Doe Smith`
#[must_use]
pub fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let spaced = NAME_SEPARATORS.replace_all(local, " ");

    let formatted = spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if formatted.is_empty() {
        "User".to_string()
    } else {
        formatted
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
