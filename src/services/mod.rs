pub mod retry;
pub mod timetable_service;

pub use timetable_service::TimetableService;
