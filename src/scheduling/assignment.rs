use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::models::{BatchId, RoomId};
use crate::scheduling::catalog::Catalog;
use crate::scheduling::constraints::Requirement;
use crate::scheduling::error::{BlockReason, ScheduleError};
use crate::scheduling::grid::SlotGrid;
use crate::scheduling::policy::SchedulePolicy;
use crate::scheduling::run::{Placement, RunContext};
use crate::scheduling::slot::{Day, HalfDay, SLOTS_PER_WEEK, Slot};

/// Greedy, deterministic placement of one batch's offerings.
///
/// Each session goes to the first slot (Mon→Fri, period 1→8) that passes
/// every check, in the lowest-id compatible room. There is no backtracking:
/// a session that fits nowhere fails the whole batch.
pub struct AssignmentEngine<'a> {
    catalog: &'a Catalog,
    policy: SchedulePolicy,
}

impl<'a> AssignmentEngine<'a> {
    pub fn new(catalog: &'a Catalog, policy: SchedulePolicy) -> Self {
        Self { catalog, policy }
    }

    /// Places every session of `batch_id` and books it into `ctx`.
    ///
    /// On error `ctx` is left exactly as it was passed in.
    pub fn assign_batch(
        &self,
        batch_id: BatchId,
        ctx: &mut RunContext,
    ) -> Result<Vec<Placement>, ScheduleError> {
        let requirements = self.catalog.offerings_for(batch_id)?;
        self.check_demand(&requirements)?;

        let grid = SlotGrid::new(&self.catalog.rooms, self.policy);
        let mut scratch = ctx.clone();
        let mut placements = Vec::new();

        for req in &requirements {
            if req.sessions_per_week == 0 {
                debug!("skipping offering {} ({}): no sessions", req.offering_id, req.subject_name);
                continue;
            }
            self.place_requirement(req, &grid, &mut scratch, &mut placements)?;
        }

        *ctx = scratch;
        Ok(placements)
    }

    /// Rejects demand that cannot fit the 40-slot week before placing
    /// anything.
    fn check_demand(&self, requirements: &[Requirement]) -> Result<(), ScheduleError> {
        let mut total: u32 = 0;
        for req in requirements {
            let periods = req
                .sessions_per_week
                .saturating_mul(u32::from(self.policy.block_len(req.is_lab, req.lab_duration)));
            if periods > SLOTS_PER_WEEK {
                return Err(ScheduleError::InvalidConfiguration(format!(
                    "{} (offering {}) needs {} periods per week but a week has {}",
                    req.subject_name, req.offering_id, periods, SLOTS_PER_WEEK
                )));
            }
            total += periods;
            if total > SLOTS_PER_WEEK {
                return Err(ScheduleError::Unsatisfiable {
                    offering_id: req.offering_id,
                    subject: req.subject_name.clone(),
                    placed: 0,
                    required: req.sessions_per_week,
                    reason: BlockReason::BatchSlotsExhausted,
                });
            }
        }
        Ok(())
    }

    fn place_requirement(
        &self,
        req: &Requirement,
        grid: &SlotGrid<'_>,
        ctx: &mut RunContext,
        placements: &mut Vec<Placement>,
    ) -> Result<(), ScheduleError> {
        let block_len = self.policy.block_len(req.is_lab, req.lab_duration);
        let mut load = OfferingLoad::default();

        for placed in 0..req.sessions_per_week {
            let mut tally = BlockTally::default();
            let mut chosen = None;

            for start in Slot::all() {
                match self.try_slot(req, start, block_len, grid, ctx, &load) {
                    Ok(found) => {
                        chosen = Some(found);
                        break;
                    }
                    Err(reason) => tally.record(reason),
                }
            }

            let Some((block, room_id)) = chosen else {
                return Err(ScheduleError::Unsatisfiable {
                    offering_id: req.offering_id,
                    subject: req.subject_name.clone(),
                    placed,
                    required: req.sessions_per_week,
                    reason: tally.dominant(),
                });
            };

            load.record(block[0]);
            for (i, slot) in block.iter().enumerate() {
                let placement = Placement {
                    offering_id: req.offering_id,
                    batch_id: req.batch_id,
                    subject_id: req.subject_id,
                    teacher_id: req.teacher_id,
                    room_id,
                    slot: *slot,
                    lab_part: (block_len > 1).then_some(i as u8 + 1),
                };
                debug!(
                    "placed {} for batch {} on {} in room {}",
                    req.subject_name, req.batch_id, slot, room_id
                );
                ctx.book(&placement);
                placements.push(placement);
            }
        }
        Ok(())
    }

    fn try_slot(
        &self,
        req: &Requirement,
        start: Slot,
        block_len: u8,
        grid: &SlotGrid<'_>,
        ctx: &RunContext,
        load: &OfferingLoad,
    ) -> Result<(Vec<Slot>, RoomId), BlockReason> {
        let block = start
            .block(block_len, self.policy.lab_block_within_half_day)
            .ok_or(BlockReason::BatchSlotsExhausted)?;

        if block.iter().any(|s| ctx.batch_busy(req.batch_id, *s)) {
            return Err(BlockReason::BatchSlotsExhausted);
        }
        if block.iter().any(|s| ctx.teacher_busy(req.teacher_id, *s)) {
            return Err(BlockReason::TeacherUnavailable);
        }

        let len = u32::from(block_len);
        if ctx.teacher_day_load(req.teacher_id, start.day) + len > req.teacher_max_per_day
            || ctx.teacher_week_load(req.teacher_id) + len > req.teacher_max_per_week
        {
            return Err(BlockReason::TeacherSaturated);
        }
        if load.on_day(start.day) + 1 > req.max_per_day {
            return Err(BlockReason::OfferingDailyCap);
        }
        if let Some(cap) = self.policy.half_day_cap(req.max_per_day) {
            if load.in_half_day(start) + 1 > cap {
                return Err(BlockReason::OfferingHalfDayCap);
            }
        }

        let room_id = grid
            .first_free_room(ctx, &block, req.is_lab, req.batch_id)
            .ok_or(BlockReason::RoomSaturated)?;
        Ok((block, room_id))
    }
}

/// Sessions of one offering placed so far, by day and by half-day. A lab
/// block counts once, in the half-day it starts in.
#[derive(Default)]
struct OfferingLoad {
    per_day: HashMap<Day, u32>,
    per_half_day: HashMap<(Day, HalfDay), u32>,
}

impl OfferingLoad {
    fn record(&mut self, start: Slot) {
        *self.per_day.entry(start.day).or_default() += 1;
        *self.per_half_day.entry((start.day, start.half_day())).or_default() += 1;
    }

    fn on_day(&self, day: Day) -> u32 {
        self.per_day.get(&day).copied().unwrap_or(0)
    }

    fn in_half_day(&self, slot: Slot) -> u32 {
        self.per_half_day
            .get(&(slot.day, slot.half_day()))
            .copied()
            .unwrap_or(0)
    }
}

/// Counts, per reason, how many slots rejected one session.
#[derive(Default)]
struct BlockTally {
    counts: BTreeMap<BlockReason, u32>,
}

impl BlockTally {
    fn record(&mut self, reason: BlockReason) {
        *self.counts.entry(reason).or_default() += 1;
    }

    /// Batch exhaustion only when nothing else blocked a slot; otherwise the
    /// most frequent teacher/room/offering reason (ties go to the earlier
    /// variant).
    fn dominant(&self) -> BlockReason {
        let mut best: Option<(BlockReason, u32)> = None;
        for (reason, count) in &self.counts {
            if *reason == BlockReason::BatchSlotsExhausted {
                continue;
            }
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((*reason, *count));
            }
        }
        best.map(|(reason, _)| reason)
            .unwrap_or(BlockReason::BatchSlotsExhausted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::RoomType;
    use crate::models::TimetableEntry;
    use crate::scheduling::fixtures::CatalogBuilder;

    fn slot(day: Day, period: u8) -> Slot {
        Slot { day, period }
    }

    #[test]
    fn one_session_per_day_lands_on_first_period_of_each_day() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Smith", 1, 10);
        let s = b.subject("Maths", false);
        b.offering(s, t, batch, 5, 2);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        let mut ctx = RunContext::new();
        let placements = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut ctx)
            .unwrap();

        let slots: Vec<Slot> = placements.iter().map(|p| p.slot).collect();
        assert_eq!(
            slots,
            Day::ALL.iter().map(|d| slot(*d, 1)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn over_subscribed_batch_fails_before_placing_anything() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t1 = b.teacher("Smith", 8, 40);
        let t2 = b.teacher("Jones", 8, 40);
        let s1 = b.subject("Maths", false);
        let s2 = b.subject("Physics", false);
        b.offering(s1, t1, batch, 30, 8);
        let second = b.offering(s2, t2, batch, 30, 8);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        let mut ctx = RunContext::new();
        let err = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut ctx)
            .unwrap_err();

        match err {
            ScheduleError::Unsatisfiable {
                offering_id,
                placed,
                reason,
                ..
            } => {
                assert_eq!(offering_id, second);
                assert_eq!(placed, 0);
                assert_eq!(reason, BlockReason::BatchSlotsExhausted);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ctx.teacher_week_load(t1), 0);
    }

    #[test]
    fn more_than_forty_sessions_is_invalid_configuration() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Smith", 8, 60);
        let s = b.subject("Maths", false);
        b.offering(s, t, batch, 41, 8);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        let err = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut RunContext::new())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_session_offerings_produce_no_entries() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Smith", 2, 10);
        let s = b.subject("Seminar", false);
        b.offering(s, t, batch, 0, 2);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        let placements = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut RunContext::new())
            .unwrap();
        assert!(placements.is_empty());
    }

    #[test]
    fn teacher_booked_by_another_batch_is_avoided() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Smith", 2, 10);
        let s = b.subject("Maths", false);
        b.offering(s, t, batch, 1, 1);
        b.room("101", RoomType::Classroom);
        b.room("102", RoomType::Classroom);
        let catalog = b.build();

        let booked = TimetableEntry {
            id: 1,
            timetable_id: 9,
            batch_id: 2,
            offering_id: 50,
            subject_id: 50,
            teacher_id: t,
            room_id: 2,
            day_of_week: Day::Mon,
            period_number: 1,
            lab_part: None,
        };
        let mut ctx = RunContext::seeded([&booked]);
        let placements = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut ctx)
            .unwrap();

        assert_eq!(placements[0].slot, slot(Day::Mon, 2));
        assert_eq!(placements[0].room_id, 1);
        assert_eq!(ctx.teacher_week_load(t), 2);
    }

    #[test]
    fn lab_without_lab_room_reports_room_saturation() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Wilson", 4, 10);
        let s = b.subject("CS Lab", true);
        let lab = b.offering(s, t, batch, 1, 1);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        let err = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut RunContext::new())
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Unsatisfiable {
                offering_id: lab,
                subject: "CS Lab".to_string(),
                placed: 0,
                required: 1,
                reason: BlockReason::RoomSaturated,
            }
        );
    }

    #[test]
    fn weekly_cap_reports_teacher_saturation() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Smith", 8, 3);
        let s = b.subject("Maths", false);
        b.offering(s, t, batch, 5, 8);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        let err = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut RunContext::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Unsatisfiable {
                placed: 3,
                reason: BlockReason::TeacherSaturated,
                ..
            }
        ));
    }

    #[test]
    fn lab_blocks_are_contiguous_in_one_room() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Wilson", 8, 20);
        let s = b.subject("CS Lab", true);
        b.offering(s, t, batch, 2, 1);
        b.room("Lab-1", RoomType::Lab);
        let catalog = b.build();
        let policy = SchedulePolicy {
            lab_block_periods: 3,
            ..SchedulePolicy::default()
        };

        let placements = AssignmentEngine::new(&catalog, policy)
            .assign_batch(batch, &mut RunContext::new())
            .unwrap();

        let got: Vec<(Slot, Option<u8>)> =
            placements.iter().map(|p| (p.slot, p.lab_part)).collect();
        assert_eq!(
            got,
            vec![
                (slot(Day::Mon, 1), Some(1)),
                (slot(Day::Mon, 2), Some(2)),
                (slot(Day::Mon, 3), Some(3)),
                (slot(Day::Tue, 1), Some(1)),
                (slot(Day::Tue, 2), Some(2)),
                (slot(Day::Tue, 3), Some(3)),
            ]
        );
    }

    #[test]
    fn full_week_has_no_slot_collisions_and_is_reproducible() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let teachers: Vec<i64> = (0..5).map(|i| b.teacher(&format!("T{i}"), 8, 10)).collect();
        for (i, t) in teachers.iter().enumerate() {
            let s = b.subject(&format!("S{i}"), false);
            b.offering(s, *t, batch, 8, 8);
        }
        b.room("101", RoomType::Classroom);
        let catalog = b.build();
        let engine = AssignmentEngine::new(&catalog, SchedulePolicy::default());

        let first = engine.assign_batch(batch, &mut RunContext::new()).unwrap();
        let second = engine.assign_batch(batch, &mut RunContext::new()).unwrap();

        assert_eq!(first.len(), 40);
        let distinct: HashSet<Slot> = first.iter().map(|p| p.slot).collect();
        assert_eq!(distinct.len(), 40);
        assert_eq!(first, second);
    }

    #[test]
    fn dominant_reason_prefers_non_batch_blockers() {
        let mut tally = BlockTally::default();
        for _ in 0..30 {
            tally.record(BlockReason::BatchSlotsExhausted);
        }
        assert_eq!(tally.dominant(), BlockReason::BatchSlotsExhausted);

        tally.record(BlockReason::RoomSaturated);
        tally.record(BlockReason::TeacherSaturated);
        tally.record(BlockReason::TeacherSaturated);
        assert_eq!(tally.dominant(), BlockReason::TeacherSaturated);
    }

    fn place_two_a_day(policy: SchedulePolicy) -> Vec<Slot> {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Smith", 8, 20);
        let s = b.subject("Maths", false);
        b.offering(s, t, batch, 4, 2);
        b.room("101", RoomType::Classroom);
        let catalog = b.build();

        AssignmentEngine::new(&catalog, policy)
            .assign_batch(batch, &mut RunContext::new())
            .unwrap()
            .iter()
            .map(|p| p.slot)
            .collect()
    }

    #[test]
    fn half_day_separation_splits_sessions_across_the_day() {
        assert_eq!(
            place_two_a_day(SchedulePolicy::default()),
            vec![
                slot(Day::Mon, 1),
                slot(Day::Mon, 2),
                slot(Day::Tue, 1),
                slot(Day::Tue, 2)
            ]
        );

        let separated = SchedulePolicy {
            subject_half_day_separation: true,
            ..SchedulePolicy::default()
        };
        assert_eq!(
            place_two_a_day(separated),
            vec![
                slot(Day::Mon, 1),
                slot(Day::Mon, 5),
                slot(Day::Tue, 1),
                slot(Day::Tue, 5)
            ]
        );
    }

    #[test]
    fn subject_lab_duration_overrides_policy_block_length() {
        let mut b = CatalogBuilder::new();
        let batch = b.batch("CSE-A");
        let t = b.teacher("Wilson", 8, 20);
        let long_lab = b.subject("CS Lab", true);
        b.lab_duration(long_lab, 3);
        let short_lab = b.subject("Physics Lab", true);
        b.offering(long_lab, t, batch, 1, 1);
        b.offering(short_lab, t, batch, 1, 1);
        b.room("Lab-1", RoomType::Lab);
        let catalog = b.build();

        let placements = AssignmentEngine::new(&catalog, SchedulePolicy::default())
            .assign_batch(batch, &mut RunContext::new())
            .unwrap();

        let got: Vec<(i64, Slot, Option<u8>)> = placements
            .iter()
            .map(|p| (p.subject_id, p.slot, p.lab_part))
            .collect();
        assert_eq!(
            got,
            vec![
                (long_lab, slot(Day::Mon, 1), Some(1)),
                (long_lab, slot(Day::Mon, 2), Some(2)),
                (long_lab, slot(Day::Mon, 3), Some(3)),
                (short_lab, slot(Day::Mon, 4), None),
            ]
        );
    }
}
