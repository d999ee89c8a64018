use serde::{Deserialize, Serialize};

/// Tunable placement rules shared by the engine and the mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePolicy {
    /// Contiguous periods a lab session occupies when its subject sets no
    /// `lab_duration`. `1` treats labs like any other session.
    pub lab_block_periods: u8,
    /// Lab blocks may not straddle the morning/afternoon boundary.
    pub lab_block_within_half_day: bool,
    /// Non-lab sessions may take a free LAB room when every classroom and
    /// auditorium is booked.
    pub lab_room_overflow: bool,
    /// Spread an offering's sessions across the two halves of a day.
    pub subject_half_day_separation: bool,
}

impl SchedulePolicy {
    pub const MAX_LAB_BLOCK_PERIODS: u8 = 4;

    /// Periods one session occupies. A subject's own lab duration wins over
    /// the policy default.
    pub fn block_len(&self, is_lab: bool, lab_duration: Option<u8>) -> u8 {
        if is_lab {
            lab_duration.unwrap_or(self.lab_block_periods).max(1)
        } else {
            1
        }
    }

    /// Sessions an offering may hold in one half-day, or `None` when
    /// separation is off. Offerings allowed up to two a day get one per
    /// half; busier ones get half their daily cap.
    pub fn half_day_cap(&self, max_per_day: u32) -> Option<u32> {
        if !self.subject_half_day_separation {
            return None;
        }
        Some(if max_per_day <= 2 { 1 } else { (max_per_day / 2).max(1) })
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            lab_block_periods: 1,
            lab_block_within_half_day: true,
            lab_room_overflow: true,
            subject_half_day_separation: false,
        }
    }
}
