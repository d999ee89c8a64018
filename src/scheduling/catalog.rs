use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    Batch, BatchId, EntryView, OfferingId, Room, RoomId, Subject, SubjectId, SubjectOffering,
    Teacher, TeacherId, TimetableEntry,
};
use crate::scheduling::slot::HalfDay;

/// Point-in-time copy of every entity the scheduler reads.
///
/// Maps are ordered by id so iteration (and therefore placement) is
/// reproducible for identical input data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub teachers: BTreeMap<TeacherId, Teacher>,
    pub batches: BTreeMap<BatchId, Batch>,
    pub subjects: BTreeMap<SubjectId, Subject>,
    pub offerings: BTreeMap<OfferingId, SubjectOffering>,
    pub rooms: BTreeMap<RoomId, Room>,
}

impl Catalog {
    pub fn new(
        teachers: Vec<Teacher>,
        batches: Vec<Batch>,
        subjects: Vec<Subject>,
        offerings: Vec<SubjectOffering>,
        rooms: Vec<Room>,
    ) -> Self {
        Self {
            teachers: teachers.into_iter().map(|t| (t.id, t)).collect(),
            batches: batches.into_iter().map(|b| (b.id, b)).collect(),
            subjects: subjects.into_iter().map(|s| (s.id, s)).collect(),
            offerings: offerings.into_iter().map(|o| (o.id, o)).collect(),
            rooms: rooms.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn teacher_name(&self, id: TeacherId) -> String {
        self.teachers
            .get(&id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    pub fn room_name(&self, id: RoomId) -> String {
        self.rooms
            .get(&id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    pub fn view(&self, entry: &TimetableEntry) -> EntryView {
        EntryView {
            entry_id: entry.id,
            day_of_week: entry.day_of_week,
            period_number: entry.period_number,
            half_day: HalfDay::of(entry.period_number as u8),
            subject_id: entry.subject_id,
            subject_name: self.subjects.get(&entry.subject_id).map(|s| s.name.clone()),
            teacher_id: entry.teacher_id,
            teacher_name: self.teachers.get(&entry.teacher_id).map(|t| t.name.clone()),
            room_id: entry.room_id,
            room_name: self.rooms.get(&entry.room_id).map(|r| r.name.clone()),
            lab_part: entry.lab_part,
        }
    }
}

/// Where teachers, batches, subjects, offerings and rooms come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn snapshot(&self) -> Result<Catalog, AppError>;
}

/// A fixed catalog, for tests and tooling that build their data in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Catalog);

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn snapshot(&self) -> Result<Catalog, AppError> {
        Ok(self.0.clone())
    }
}
