//! Profile sync
//!
//! After a session is adopted the user's profile row is upserted so the
//! rest of the backend can join on it. The sync is fire-and-forget: it runs
//! on a detached task and its failure never reaches the caller.

use crate::gateway::{Gateway, RequestOptions};
use crate::identity::service::{IdentityBackend, IdentityError};
use crate::models::User;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

const PROFILE_UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";

/// Profile row written on every sign-in
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpsert {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

impl From<&User> for ProfileUpsert {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.name.clone(),
        }
    }
}

/// Upsert the profile row, merging with an existing row for the same id
///
/// # Errors
///
/// Returns an error if the request fails or the backend rejects it
pub async fn upsert_profile(
    gateway: &Gateway,
    access_token: &str,
    profile: &ProfileUpsert,
) -> Result<(), IdentityError> {
    let body = serde_json::json!([profile]);
    gateway
        .request(
            "/rest/v1/profiles",
            RequestOptions::post()
                .bearer(access_token)
                .prefer(PROFILE_UPSERT_PREFER)
                .json(body),
        )
        .await?;
    Ok(())
}

/// Run the profile upsert on a detached task
///
/// Requires a running tokio runtime; outside one the sync is skipped and
/// `None` is returned. The handle may be dropped; the task keeps running
/// until the runtime shuts down.
pub fn spawn_profile_sync(
    backend: Arc<dyn IdentityBackend>,
    access_token: String,
    profile: ProfileUpsert,
) -> Option<JoinHandle<()>> {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!("No async runtime available, skipping profile sync for {}", profile.id);
        return None;
    };

    Some(runtime.spawn(async move {
        match backend.upsert_profile(&access_token, &profile).await {
            Ok(()) => debug!("Profile synced for user {}", profile.id),
            Err(e) => warn!("Profile sync failed for user {}: {e}", profile.id),
        }
    }))
}
