use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum RoomType {
    Classroom,
    Lab,
    Auditorium,
}

#[derive(Debug, Error)]
#[error("unknown room type '{0}'")]
pub struct UnknownRoomType(String);

impl RoomType {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Classroom => "CLASSROOM",
            RoomType::Lab => "LAB",
            RoomType::Auditorium => "AUDITORIUM",
        }
    }
}

impl TryFrom<String> for RoomType {
    type Error = UnknownRoomType;

    /// Anything starting with "LAB" counts as a lab ("LAB", "LAB-CS", ...).
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.starts_with("LAB") {
            return Ok(RoomType::Lab);
        }
        match normalized.as_str() {
            "CLASSROOM" | "CLASS" => Ok(RoomType::Classroom),
            "AUDITORIUM" => Ok(RoomType::Auditorium),
            _ => Err(UnknownRoomType(value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: Option<i64>,
    #[sqlx(try_from = "String")]
    pub room_type: RoomType,
    /// Homeroom reservation: only this batch may be placed here.
    pub assigned_batch_id: Option<i64>,
}

impl Room {
    pub fn usable_by(&self, batch_id: i64) -> bool {
        self.assigned_batch_id.is_none_or(|owner| owner == batch_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomRequest {
    pub name: String,
    pub capacity: Option<i64>,
    #[serde(default = "default_room_type")]
    pub room_type: RoomType,
    pub assigned_batch_id: Option<i64>,
}

fn default_room_type() -> RoomType {
    RoomType::Classroom
}
