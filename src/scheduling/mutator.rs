use crate::models::{RoomId, TimetableEntry};
use crate::scheduling::catalog::Catalog;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::grid::SlotGrid;
use crate::scheduling::policy::SchedulePolicy;
use crate::scheduling::run::RunContext;
use crate::scheduling::slot::{HalfDay, Slot};

/// Where a validated move puts the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub slot: Slot,
    pub room_id: RoomId,
    pub room_changed: bool,
    /// The entry already sits at the target; nothing to write.
    pub unchanged: bool,
}

/// Validates drag-and-drop moves against the committed schedule.
///
/// Only the moved entry is considered; no other entry is ever relocated.
pub struct Mutator<'a> {
    catalog: &'a Catalog,
    policy: SchedulePolicy,
}

impl<'a> Mutator<'a> {
    pub fn new(catalog: &'a Catalog, policy: SchedulePolicy) -> Self {
        Self { catalog, policy }
    }

    /// `committed` holds every entry of every timetable, `entry` included.
    pub fn plan_move(
        &self,
        entry: &TimetableEntry,
        committed: &[TimetableEntry],
        target: Slot,
    ) -> Result<MoveOutcome, ScheduleError> {
        if target == entry.slot() {
            return Ok(MoveOutcome {
                slot: target,
                room_id: entry.room_id,
                room_changed: false,
                unchanged: true,
            });
        }
        if let Some(part) = entry.lab_part {
            return Err(ScheduleError::LabBlockLocked {
                entry_id: entry.id,
                part,
            });
        }

        let others: Vec<&TimetableEntry> = committed.iter().filter(|e| e.id != entry.id).collect();

        if others
            .iter()
            .any(|e| e.timetable_id == entry.timetable_id && e.slot() == target)
        {
            return Err(ScheduleError::SlotOccupied { slot: target });
        }

        let ctx = RunContext::seeded(others.iter().copied());

        if ctx.teacher_busy(entry.teacher_id, target) {
            return Err(ScheduleError::TeacherConflict {
                teacher: self.catalog.teacher_name(entry.teacher_id),
                slot: target,
            });
        }

        let room_id = if ctx.room_busy(entry.room_id, target) {
            let is_lab = self
                .catalog
                .subjects
                .get(&entry.subject_id)
                .is_some_and(|s| s.is_lab);
            SlotGrid::new(&self.catalog.rooms, self.policy)
                .first_free_room(&ctx, &[target], is_lab, entry.batch_id)
                .ok_or_else(|| ScheduleError::RoomConflict {
                    room: self.catalog.room_name(entry.room_id),
                    slot: target,
                })?
        } else {
            entry.room_id
        };

        self.check_load(entry, &others, &ctx, target)?;

        Ok(MoveOutcome {
            slot: target,
            room_id,
            room_changed: room_id != entry.room_id,
            unchanged: false,
        })
    }

    fn check_load(
        &self,
        entry: &TimetableEntry,
        others: &[&TimetableEntry],
        ctx: &RunContext,
        target: Slot,
    ) -> Result<(), ScheduleError> {
        let teacher = self
            .catalog
            .teachers
            .get(&entry.teacher_id)
            .ok_or(ScheduleError::NotFound {
                entity: "teacher",
                id: entry.teacher_id,
            })?;

        let day_load = i64::from(ctx.teacher_day_load(teacher.id, target.day));
        if day_load + 1 > teacher.max_sessions_per_day {
            return Err(ScheduleError::LoadExceeded {
                slot: target,
                limit: format!(
                    "{}'s limit of {} sessions per day",
                    teacher.name, teacher.max_sessions_per_day
                ),
            });
        }

        let week_load = i64::from(ctx.teacher_week_load(teacher.id));
        if week_load + 1 > teacher.max_sessions_per_week {
            return Err(ScheduleError::LoadExceeded {
                slot: target,
                limit: format!(
                    "{}'s limit of {} sessions per week",
                    teacher.name, teacher.max_sessions_per_week
                ),
            });
        }

        let Some(offering) = self.catalog.offerings.get(&entry.offering_id) else {
            return Ok(());
        };
        let subject = self
            .catalog
            .subjects
            .get(&entry.subject_id)
            .map(|s| s.name.as_str())
            .unwrap_or("this subject");
        // Lab blocks count once, by their first part.
        let sessions: Vec<&&TimetableEntry> = others
            .iter()
            .filter(|e| e.offering_id == entry.offering_id && e.day_of_week == target.day)
            .filter(|e| e.lab_part.is_none_or(|p| p == 1))
            .collect();

        if sessions.len() as i64 + 1 > offering.max_sessions_per_day {
            return Err(ScheduleError::LoadExceeded {
                slot: target,
                limit: format!(
                    "the limit of {} {} sessions per day",
                    offering.max_sessions_per_day, subject
                ),
            });
        }

        let max_per_day = u32::try_from(offering.max_sessions_per_day).unwrap_or(0);
        if let Some(cap) = self.policy.half_day_cap(max_per_day) {
            let half = target.half_day();
            let same_half = sessions
                .iter()
                .filter(|e| HalfDay::of(e.period_number as u8) == half)
                .count() as u32;
            if same_half + 1 > cap {
                return Err(ScheduleError::LoadExceeded {
                    slot: target,
                    limit: format!("the limit of {cap} {subject} session(s) per half-day"),
                });
            }
        }
        Ok(())
    }
}
