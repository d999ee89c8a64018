use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub teacher_id: Option<i64>,
    pub sessions_per_week: i64,
    pub is_lab: bool,
    /// Periods per lab session; `None` uses the configured default.
    pub lab_duration: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubjectRequest {
    pub name: String,
    pub teacher_id: Option<i64>,
    #[serde(default = "default_sessions_per_week")]
    pub sessions_per_week: i64,
    #[serde(default)]
    pub is_lab: bool,
    #[serde(default)]
    pub lab_duration: Option<i64>,
}

fn default_sessions_per_week() -> i64 {
    5
}
