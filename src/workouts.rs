//! Workout session records
//!
//! Thin typed wrapper over the `workout_sessions` table. Row ownership is
//! enforced by the backend from the bearer token.

use crate::gateway::{Gateway, GatewayError, RequestOptions};
use crate::models::workout::WORKOUT_COLUMNS;
use crate::models::{NewWorkoutSession, WorkoutSession};
use chrono::Utc;
use log::debug;

const WORKOUTS_PATH: &str = "/rest/v1/workout_sessions";

#[derive(Clone)]
pub struct WorkoutsApi {
    gateway: Gateway,
}

impl WorkoutsApi {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Workout sessions of `user_id`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows cannot be decoded
    pub async fn list(&self, access_token: &str, user_id: &str) -> Result<Vec<WorkoutSession>, GatewayError> {
        let path = list_path(user_id);
        let sessions: Vec<WorkoutSession> = self
            .gateway
            .request_json(&path, RequestOptions::get().bearer(access_token))
            .await?;
        debug!("Fetched {} workout sessions", sessions.len());
        Ok(sessions)
    }

    /// Record a workout session and return the stored row
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns no row
    pub async fn create(
        &self,
        access_token: &str,
        workout: &NewWorkoutSession,
    ) -> Result<WorkoutSession, GatewayError> {
        let row = serde_json::to_value([workout.to_row(Utc::now())])
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        let created: Vec<WorkoutSession> = self
            .gateway
            .request_json(
                WORKOUTS_PATH,
                RequestOptions::post()
                    .bearer(access_token)
                    .prefer("return=representation")
                    .json(row),
            )
            .await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode(format!("{WORKOUTS_PATH}: no row returned")))
    }
}

fn list_path(user_id: &str) -> String {
    format!(
        "{WORKOUTS_PATH}?user_id=eq.{}&order=created_at.desc&select={WORKOUT_COLUMNS}",
        urlencoding::encode(user_id)
    )
}
