use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scheduling::{Day, HalfDay, Slot};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Timetable {
    pub id: i64,
    pub batch_id: i64,
    pub version: i64,
    pub run_id: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableSummary {
    pub id: i64,
    pub batch_id: i64,
    pub version: i64,
    pub run_id: String,
    pub created_at: String,
}

impl From<Timetable> for TimetableSummary {
    fn from(tt: Timetable) -> Self {
        Self {
            id: tt.id,
            batch_id: tt.batch_id,
            version: tt.version,
            run_id: tt.run_id,
            created_at: tt.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimetableEntry {
    pub id: i64,
    pub timetable_id: i64,
    pub batch_id: i64,
    pub offering_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub room_id: i64,
    #[sqlx(try_from = "String")]
    pub day_of_week: Day,
    pub period_number: i64,
    pub lab_part: Option<i64>,
}

impl TimetableEntry {
    pub fn slot(&self) -> Slot {
        Slot {
            day: self.day_of_week,
            period: self.period_number as u8,
        }
    }
}

/// Entry as the timetable grid renders it, with display names resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub entry_id: i64,
    pub day_of_week: Day,
    pub period_number: i64,
    pub half_day: HalfDay,
    pub subject_id: i64,
    pub subject_name: Option<String>,
    pub teacher_id: i64,
    pub teacher_name: Option<String>,
    pub room_id: i64,
    pub room_name: Option<String>,
    pub lab_part: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableDetail {
    pub id: i64,
    pub batch_id: i64,
    pub version: i64,
    pub created_at: String,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateResponse {
    pub message: String,
    pub timetable: Timetable,
}

/// Drag-and-drop target. A missing field keeps the entry's current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub day_of_week: Option<Day>,
    pub period_number: Option<i64>,
}
