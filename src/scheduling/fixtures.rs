use crate::models::{Batch, Room, RoomType, Subject, SubjectOffering, Teacher};
use crate::scheduling::catalog::Catalog;

/// Builds catalogs with sequential ids, one counter per entity kind.
#[derive(Default)]
pub(crate) struct CatalogBuilder {
    teachers: Vec<Teacher>,
    batches: Vec<Batch>,
    subjects: Vec<Subject>,
    offerings: Vec<SubjectOffering>,
    rooms: Vec<Room>,
}

impl CatalogBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn teacher(&mut self, name: &str, per_day: i64, per_week: i64) -> i64 {
        let id = self.teachers.len() as i64 + 1;
        self.teachers.push(Teacher {
            id,
            name: name.to_string(),
            email: format!("{}@college.edu", name.to_lowercase()),
            department: None,
            max_sessions_per_day: per_day,
            max_sessions_per_week: per_week,
        });
        id
    }

    pub(crate) fn batch(&mut self, name: &str) -> i64 {
        let id = self.batches.len() as i64 + 1;
        self.batches.push(Batch {
            id,
            name: name.to_string(),
            department: None,
            semester: None,
            academic_year: None,
        });
        id
    }

    pub(crate) fn subject(&mut self, name: &str, is_lab: bool) -> i64 {
        let id = self.subjects.len() as i64 + 1;
        self.subjects.push(Subject {
            id,
            name: name.to_string(),
            teacher_id: None,
            sessions_per_week: 5,
            is_lab,
            lab_duration: None,
        });
        id
    }

    pub(crate) fn lab_duration(&mut self, subject_id: i64, periods: i64) {
        if let Some(subject) = self.subjects.iter_mut().find(|s| s.id == subject_id) {
            subject.lab_duration = Some(periods);
        }
    }

    pub(crate) fn offering(
        &mut self,
        subject_id: i64,
        teacher_id: i64,
        batch_id: i64,
        sessions_per_week: i64,
        max_sessions_per_day: i64,
    ) -> i64 {
        let id = self.offerings.len() as i64 + 1;
        self.offerings.push(SubjectOffering {
            id,
            subject_id,
            teacher_id,
            batch_id,
            sessions_per_week,
            max_sessions_per_day,
        });
        id
    }

    pub(crate) fn room(&mut self, name: &str, room_type: RoomType) -> i64 {
        let id = self.rooms.len() as i64 + 1;
        self.rooms.push(Room {
            id,
            name: name.to_string(),
            capacity: Some(60),
            room_type,
            assigned_batch_id: None,
        });
        id
    }

    pub(crate) fn reserve(&mut self, room_id: i64, batch_id: i64) {
        if let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) {
            room.assigned_batch_id = Some(batch_id);
        }
    }

    pub(crate) fn build(self) -> Catalog {
        Catalog::new(
            self.teachers,
            self.batches,
            self.subjects,
            self.offerings,
            self.rooms,
        )
    }
}
