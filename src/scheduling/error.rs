use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::scheduling::slot::Slot;

/// The constraint that kept a session out of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    BatchSlotsExhausted,
    TeacherUnavailable,
    TeacherSaturated,
    OfferingDailyCap,
    OfferingHalfDayCap,
    RoomSaturated,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BlockReason::BatchSlotsExhausted => "batch slot exhaustion",
            BlockReason::TeacherUnavailable => "teacher already booked",
            BlockReason::TeacherSaturated => "teacher saturation",
            BlockReason::OfferingDailyCap => "offering daily cap",
            BlockReason::OfferingHalfDayCap => "offering half-day cap",
            BlockReason::RoomSaturated => "room saturation",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(
        "Cannot schedule {subject} (offering {offering_id}): placed {placed} of {required} sessions, blocked by {reason}"
    )]
    Unsatisfiable {
        offering_id: i64,
        subject: String,
        placed: u32,
        required: u32,
        reason: BlockReason,
    },

    #[error("{slot} already holds another class for this batch")]
    SlotOccupied { slot: Slot },

    #[error("Teacher {teacher} is busy on {slot}")]
    TeacherConflict { teacher: String, slot: Slot },

    #[error("Room {room} is booked on {slot} and no other compatible room is free")]
    RoomConflict { room: String, slot: Slot },

    #[error("Moving to {slot} exceeds {limit}")]
    LoadExceeded { slot: Slot, limit: String },

    #[error("Entry {entry_id} is part {part} of a lab block and cannot be moved on its own")]
    LabBlockLocked { entry_id: i64, part: i64 },

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),
}
