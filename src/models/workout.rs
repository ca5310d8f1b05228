use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Columns requested when listing workout sessions
pub const WORKOUT_COLUMNS: &str =
    "id,user_id,title,notes,duration_minutes,calories_burned,started_at,completed_at,created_at";

/// Stored workout session row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub duration_minutes: Option<u32>,
    pub calories_burned: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a workout session
#[derive(Clone, Debug, Default)]
pub struct NewWorkoutSession {
    pub title: String,
    pub notes: Option<String>,
    pub duration_minutes: Option<u32>,
    pub calories_burned: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert row in the backend's column naming; the owner comes from the
/// bearer token, not the body
#[derive(Serialize, Debug)]
pub(crate) struct WorkoutSessionRow<'a> {
    title: &'a str,
    notes: Option<&'a str>,
    duration_minutes: Option<u32>,
    calories_burned: Option<u32>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl NewWorkoutSession {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_row(&self, now: DateTime<Utc>) -> WorkoutSessionRow<'_> {
        WorkoutSessionRow {
            title: &self.title,
            notes: self.notes.as_deref(),
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
            started_at: self.started_at.unwrap_or(now),
            completed_at: self.completed_at,
        }
    }
}
