//! Test fixtures providing pre-built test objects

use crate::models::{BackendUser, Session, UserMetadata};
use crate::settings::{BackendSettings, TrainerSettings};
use chrono::{Duration, Utc};

use super::constants::{
    TEST_ACCESS_TOKEN, TEST_BACKEND_URL, TEST_EMAIL, TEST_REFRESH_TOKEN, TEST_USER_ID, TEST_USER_NAME,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Storage key used by fixture-backed session stores
    pub const SESSION_KEY: &'static str = "test/session";

    /// Provider user with a `full_name` in its metadata
    #[must_use]
    pub fn backend_user() -> BackendUser {
        BackendUser {
            id: TEST_USER_ID.to_string(),
            email: Some(TEST_EMAIL.to_string()),
            user_metadata: Some(UserMetadata {
                full_name: Some(TEST_USER_NAME.to_string()),
                name: None,
            }),
        }
    }

    /// Session valid for the next hour
    #[must_use]
    pub fn session() -> Session {
        Session {
            access_token: TEST_ACCESS_TOKEN.to_string(),
            refresh_token: TEST_REFRESH_TOKEN.to_string(),
            expires_in: 3600,
            expires_at: Some((Utc::now() + Duration::hours(1)).timestamp()),
            token_type: "bearer".to_string(),
            user: Self::backend_user(),
        }
    }

    /// Session whose access token expired an hour ago
    #[must_use]
    pub fn expired_session() -> Session {
        Session {
            access_token: "expired-access-token".to_string(),
            expires_at: Some((Utc::now() - Duration::hours(1)).timestamp()),
            ..Self::session()
        }
    }

    /// Settings pointing at the fixture backend
    #[must_use]
    pub fn settings() -> TrainerSettings {
        Self::settings_for(TEST_BACKEND_URL)
    }

    /// Settings pointing at `base_url`, e.g. an in-process mock server
    #[must_use]
    pub fn settings_for(base_url: &str) -> TrainerSettings {
        TrainerSettings {
            backend: BackendSettings {
                url: base_url.to_string(),
                api_key: "test-api-key".to_string(),
                ..BackendSettings::default()
            },
            ..TrainerSettings::default()
        }
    }
}
