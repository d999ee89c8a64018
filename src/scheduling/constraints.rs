use crate::models::{BatchId, OfferingId, SubjectId, SubjectOffering, TeacherId};
use crate::scheduling::catalog::Catalog;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::policy::SchedulePolicy;

/// One offering resolved against its subject and teacher: everything the
/// engine needs to place its weekly sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub offering_id: OfferingId,
    pub batch_id: BatchId,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub teacher_id: TeacherId,
    pub is_lab: bool,
    /// The subject's own lab block length, if it sets one.
    pub lab_duration: Option<u8>,
    pub sessions_per_week: u32,
    pub max_per_day: u32,
    pub teacher_max_per_day: u32,
    pub teacher_max_per_week: u32,
}

impl Catalog {
    /// Offerings of `batch_id`, most sessions first, then by offering id.
    pub fn offerings_for(&self, batch_id: BatchId) -> Result<Vec<Requirement>, ScheduleError> {
        if !self.batches.contains_key(&batch_id) {
            return Err(ScheduleError::NotFound {
                entity: "batch",
                id: batch_id,
            });
        }

        let mut requirements = self
            .offerings
            .values()
            .filter(|o| o.batch_id == batch_id)
            .map(|o| self.resolve(o))
            .collect::<Result<Vec<_>, _>>()?;

        requirements.sort_by(|a, b| {
            b.sessions_per_week
                .cmp(&a.sessions_per_week)
                .then(a.offering_id.cmp(&b.offering_id))
        });
        Ok(requirements)
    }

    pub fn resolve(&self, offering: &SubjectOffering) -> Result<Requirement, ScheduleError> {
        let subject = self.subjects.get(&offering.subject_id).ok_or_else(|| {
            ScheduleError::InvalidConfiguration(format!(
                "offering {} references missing subject {}",
                offering.id, offering.subject_id
            ))
        })?;
        let teacher = self.teachers.get(&offering.teacher_id).ok_or_else(|| {
            ScheduleError::InvalidConfiguration(format!(
                "offering {} references missing teacher {}",
                offering.id, offering.teacher_id
            ))
        })?;

        Ok(Requirement {
            offering_id: offering.id,
            batch_id: offering.batch_id,
            subject_id: subject.id,
            subject_name: subject.name.clone(),
            teacher_id: teacher.id,
            is_lab: subject.is_lab,
            lab_duration: subject
                .lab_duration
                .map(|d| lab_duration(d, offering.id))
                .transpose()?,
            sessions_per_week: count(offering.sessions_per_week, "sessions per week", offering.id)?,
            max_per_day: count(offering.max_sessions_per_day, "max sessions per day", offering.id)?,
            teacher_max_per_day: count(teacher.max_sessions_per_day, "teacher max per day", offering.id)?,
            teacher_max_per_week: count(
                teacher.max_sessions_per_week,
                "teacher max per week",
                offering.id,
            )?,
        })
    }
}

fn count(value: i64, what: &str, offering_id: OfferingId) -> Result<u32, ScheduleError> {
    u32::try_from(value).map_err(|_| {
        ScheduleError::InvalidConfiguration(format!(
            "offering {offering_id}: {what} must be a non-negative count, got {value}"
        ))
    })
}

fn lab_duration(value: i64, offering_id: OfferingId) -> Result<u8, ScheduleError> {
    u8::try_from(value)
        .ok()
        .filter(|d| (1..=SchedulePolicy::MAX_LAB_BLOCK_PERIODS).contains(d))
        .ok_or_else(|| {
            ScheduleError::InvalidConfiguration(format!(
                "offering {offering_id}: lab duration must be 1..={}, got {value}",
                SchedulePolicy::MAX_LAB_BLOCK_PERIODS
            ))
        })
}
