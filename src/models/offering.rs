use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A subject taught by one teacher to one batch; the unit the engine places.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubjectOffering {
    pub id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub batch_id: i64,
    pub sessions_per_week: i64,
    pub max_sessions_per_day: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOfferingRequest {
    pub subject_id: i64,
    pub teacher_id: i64,
    pub batch_id: i64,
    #[serde(default = "default_sessions_per_week")]
    pub sessions_per_week: i64,
    #[serde(default = "default_max_per_day")]
    pub max_sessions_per_day: i64,
}

fn default_sessions_per_week() -> i64 {
    5
}

fn default_max_per_day() -> i64 {
    2
}
