//! Timetable generation: constraint model, slot grid, greedy assignment
//! engine and the single-entry move validator.
//!
//! Everything here is synchronous and free of I/O. The service layer loads
//! a [`Catalog`] snapshot plus the committed entries, runs the engine or
//! the mutator, and persists the result in one transaction.

pub mod assignment;
pub mod catalog;
pub mod constraints;
pub mod error;
pub mod grid;
pub mod mutator;
pub mod policy;
pub mod run;
pub mod slot;

#[cfg(test)]
pub(crate) mod fixtures;

pub use assignment::AssignmentEngine;
pub use catalog::{Catalog, CatalogSource, StaticCatalog};
pub use constraints::Requirement;
pub use error::{BlockReason, ScheduleError};
pub use grid::SlotGrid;
pub use mutator::{MoveOutcome, Mutator};
pub use policy::SchedulePolicy;
pub use run::{Placement, RunContext};
pub use slot::{Day, HalfDay, Slot, PERIODS_PER_DAY, SLOTS_PER_WEEK};
