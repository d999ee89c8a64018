pub mod batch;
pub mod offering;
pub mod room;
pub mod subject;
pub mod teacher;
pub mod timetable;

pub type TeacherId = i64;
pub type BatchId = i64;
pub type SubjectId = i64;
pub type OfferingId = i64;
pub type RoomId = i64;
pub type TimetableId = i64;
pub type EntryId = i64;

pub use batch::{Batch, NewBatchRequest};
pub use offering::{NewOfferingRequest, SubjectOffering};
pub use room::{NewRoomRequest, Room, RoomType};
pub use subject::{NewSubjectRequest, Subject};
pub use teacher::{NewTeacherRequest, Teacher};
pub use timetable::{
    EntryView, RegenerateResponse, Timetable, TimetableDetail, TimetableEntry, TimetableSummary,
    UpdateEntryRequest,
};
