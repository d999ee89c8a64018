use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scheduling::error::ScheduleError;

pub const DAYS_PER_WEEK: usize = 5;
pub const PERIODS_PER_DAY: u8 = 8;
pub const SLOTS_PER_WEEK: u32 = DAYS_PER_WEEK as u32 * PERIODS_PER_DAY as u32;

/// Last period of the morning session; the afternoon starts right after it.
pub const MORNING_LAST_PERIOD: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    pub const ALL: [Day; DAYS_PER_WEEK] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ScheduleError;

    /// Accepts the short form stored in the database ("Mon") as well as
    /// full English names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Day::Mon),
            "tue" | "tuesday" => Ok(Day::Tue),
            "wed" | "wednesday" => Ok(Day::Wed),
            "thu" | "thursday" => Ok(Day::Thu),
            "fri" | "friday" => Ok(Day::Fri),
            other => Err(ScheduleError::InvalidSlot(format!("unknown day of week '{other}'"))),
        }
    }
}

impl TryFrom<String> for Day {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfDay {
    #[serde(rename = "AM")]
    Morning,
    #[serde(rename = "PM")]
    Afternoon,
}

impl HalfDay {
    pub fn of(period: u8) -> Self {
        if period <= MORNING_LAST_PERIOD {
            HalfDay::Morning
        } else {
            HalfDay::Afternoon
        }
    }
}

/// A (day, period) coordinate in the weekly grid. Periods are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub day: Day,
    pub period: u8,
}

impl Slot {
    pub fn new(day: Day, period: i64) -> Result<Self, ScheduleError> {
        if !(1..=PERIODS_PER_DAY as i64).contains(&period) {
            return Err(ScheduleError::InvalidSlot(format!(
                "period {period} is outside 1..={PERIODS_PER_DAY}"
            )));
        }
        Ok(Self {
            day,
            period: period as u8,
        })
    }

    /// Every slot of the week, Mon→Fri and period 1→8 within a day.
    pub fn all() -> impl Iterator<Item = Slot> {
        Day::ALL.into_iter().flat_map(|day| {
            (1..=PERIODS_PER_DAY).map(move |period| Slot { day, period })
        })
    }

    pub fn half_day(&self) -> HalfDay {
        HalfDay::of(self.period)
    }

    /// The `len` consecutive slots starting here, or `None` when the block
    /// runs past the last period (or across the lunch break when
    /// `within_half_day` is set).
    pub fn block(&self, len: u8, within_half_day: bool) -> Option<Vec<Slot>> {
        let last = self.period.checked_add(len.checked_sub(1)?)?;
        if last > PERIODS_PER_DAY {
            return None;
        }
        if within_half_day && HalfDay::of(last) != self.half_day() {
            return None;
        }
        Some(
            (self.period..=last)
                .map(|period| Slot {
                    day: self.day,
                    period,
                })
                .collect(),
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} period {}", self.day, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_forty_slots_in_scan_order() {
        let slots: Vec<Slot> = Slot::all().collect();
        assert_eq!(slots.len() as u32, SLOTS_PER_WEEK);
        assert_eq!(slots[0], Slot { day: Day::Mon, period: 1 });
        assert_eq!(slots[8], Slot { day: Day::Tue, period: 1 });
        assert_eq!(slots[39], Slot { day: Day::Fri, period: 8 });
    }

    #[test]
    fn period_bounds_are_checked() {
        assert!(Slot::new(Day::Wed, 0).is_err());
        assert!(Slot::new(Day::Wed, 9).is_err());
        assert_eq!(Slot::new(Day::Wed, 8).unwrap().period, 8);
    }

    #[test]
    fn day_parses_short_and_long_names() {
        assert_eq!("Thu".parse::<Day>().unwrap(), Day::Thu);
        assert_eq!("friday".parse::<Day>().unwrap(), Day::Fri);
        assert!("Sat".parse::<Day>().is_err());
    }

    #[test]
    fn blocks_respect_day_and_half_day_edges() {
        let p3 = Slot { day: Day::Mon, period: 3 };
        assert_eq!(p3.block(2, true).unwrap().len(), 2);
        assert!(p3.block(3, true).is_none());
        assert_eq!(p3.block(3, false).unwrap().len(), 3);

        let p7 = Slot { day: Day::Mon, period: 7 };
        assert!(p7.block(3, false).is_none());
        assert_eq!(p7.block(1, true).unwrap(), vec![p7]);
    }
}
