use std::collections::{BTreeMap, BTreeSet};

use crate::models::{BatchId, Room, RoomId, RoomType};
use crate::scheduling::policy::SchedulePolicy;
use crate::scheduling::run::RunContext;
use crate::scheduling::slot::Slot;

const TEACHING_ROOMS: &[RoomType] = &[RoomType::Classroom, RoomType::Auditorium];
const LAB_ROOMS: &[RoomType] = &[RoomType::Lab];

/// The room pool seen through the type-compatibility policy.
pub struct SlotGrid<'a> {
    rooms: &'a BTreeMap<RoomId, Room>,
    policy: SchedulePolicy,
}

impl<'a> SlotGrid<'a> {
    pub fn new(rooms: &'a BTreeMap<RoomId, Room>, policy: SchedulePolicy) -> Self {
        Self { rooms, policy }
    }

    /// Compatible rooms that are free at `slot` in this run.
    ///
    /// Labs only go to LAB rooms. Other sessions use classrooms and
    /// auditoriums, and fall back to LAB rooms only when none of those is
    /// free and the policy allows it.
    pub fn available_rooms(
        &self,
        ctx: &RunContext,
        slot: Slot,
        requires_lab: bool,
        batch_id: BatchId,
    ) -> BTreeSet<RoomId> {
        if requires_lab {
            return self.free_rooms(ctx, slot, LAB_ROOMS, batch_id);
        }
        let rooms = self.free_rooms(ctx, slot, TEACHING_ROOMS, batch_id);
        if rooms.is_empty() && self.policy.lab_room_overflow {
            return self.free_rooms(ctx, slot, LAB_ROOMS, batch_id);
        }
        rooms
    }

    /// Lowest-id room that is available for every slot of `block`.
    pub fn first_free_room(
        &self,
        ctx: &RunContext,
        block: &[Slot],
        requires_lab: bool,
        batch_id: BatchId,
    ) -> Option<RoomId> {
        let (first, rest) = block.split_first()?;
        let mut candidates = self.available_rooms(ctx, *first, requires_lab, batch_id);
        for slot in rest {
            let free = self.available_rooms(ctx, *slot, requires_lab, batch_id);
            candidates.retain(|id| free.contains(id));
        }
        candidates.first().copied()
    }

    fn free_rooms(
        &self,
        ctx: &RunContext,
        slot: Slot,
        types: &[RoomType],
        batch_id: BatchId,
    ) -> BTreeSet<RoomId> {
        self.rooms
            .values()
            .filter(|r| types.contains(&r.room_type))
            .filter(|r| r.usable_by(batch_id))
            .filter(|r| !ctx.room_busy(r.id, slot))
            .map(|r| r.id)
            .collect()
    }
}
