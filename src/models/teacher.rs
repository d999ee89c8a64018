use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub max_sessions_per_day: i64,
    pub max_sessions_per_week: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeacherRequest {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    #[serde(default = "default_max_per_day")]
    pub max_sessions_per_day: i64,
    #[serde(default = "default_max_per_week")]
    pub max_sessions_per_week: i64,
}

fn default_max_per_day() -> i64 {
    2
}

fn default_max_per_week() -> i64 {
    10
}
