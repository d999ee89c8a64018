use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{BatchId, OfferingId, RoomId, SubjectId, TeacherId, TimetableEntry};
use crate::scheduling::slot::{Day, Slot};

/// A session placed into a slot and room, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub offering_id: OfferingId,
    pub batch_id: BatchId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
    pub slot: Slot,
    pub lab_part: Option<u8>,
}

impl From<&TimetableEntry> for Placement {
    fn from(entry: &TimetableEntry) -> Self {
        Self {
            offering_id: entry.offering_id,
            batch_id: entry.batch_id,
            subject_id: entry.subject_id,
            teacher_id: entry.teacher_id,
            room_id: entry.room_id,
            slot: entry.slot(),
            lab_part: entry.lab_part.map(|p| p as u8),
        }
    }
}

/// Occupancy accumulated during one generation run.
///
/// Teacher and room bookings are shared by every batch in the run; a fresh
/// context is seeded from the entries already committed for batches that
/// are not being regenerated.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    teachers: HashSet<(TeacherId, Slot)>,
    rooms: HashSet<(RoomId, Slot)>,
    batches: HashSet<(BatchId, Slot)>,
    teacher_day: HashMap<(TeacherId, Day), u32>,
    teacher_week: HashMap<TeacherId, u32>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            teachers: HashSet::new(),
            rooms: HashSet::new(),
            batches: HashSet::new(),
            teacher_day: HashMap::new(),
            teacher_week: HashMap::new(),
        }
    }

    pub fn seeded<'a>(entries: impl IntoIterator<Item = &'a TimetableEntry>) -> Self {
        let mut ctx = Self::new();
        for entry in entries {
            ctx.book(&Placement::from(entry));
        }
        ctx
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn book(&mut self, placement: &Placement) {
        let slot = placement.slot;
        self.teachers.insert((placement.teacher_id, slot));
        self.rooms.insert((placement.room_id, slot));
        self.batches.insert((placement.batch_id, slot));
        *self
            .teacher_day
            .entry((placement.teacher_id, slot.day))
            .or_default() += 1;
        *self.teacher_week.entry(placement.teacher_id).or_default() += 1;
    }

    pub fn teacher_busy(&self, teacher_id: TeacherId, slot: Slot) -> bool {
        self.teachers.contains(&(teacher_id, slot))
    }

    pub fn room_busy(&self, room_id: RoomId, slot: Slot) -> bool {
        self.rooms.contains(&(room_id, slot))
    }

    pub fn batch_busy(&self, batch_id: BatchId, slot: Slot) -> bool {
        self.batches.contains(&(batch_id, slot))
    }

    pub fn teacher_day_load(&self, teacher_id: TeacherId, day: Day) -> u32 {
        self.teacher_day.get(&(teacher_id, day)).copied().unwrap_or(0)
    }

    pub fn teacher_week_load(&self, teacher_id: TeacherId) -> u32 {
        self.teacher_week.get(&teacher_id).copied().unwrap_or(0)
    }
}
