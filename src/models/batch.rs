use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One cohort; it receives a single weekly timetable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Batch {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatchRequest {
    pub name: String,
    pub department: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
}
