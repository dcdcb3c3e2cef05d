//! Schedule coordination domain models.
//!
//! Value types shared by the stores, the confirmation coordinator, the
//! visibility filter and the table builder.
//!
//! # Domain Mappings
//!
//! | u-rota | Venue | Keyed by |
//! |--------|-------|----------|
//! | Submission | Availability / open-hope entry | date + person id |
//! | TimeSlotAssignment | Program segment with theme and performers | date + time of day |
//! | HourRecord | Logged hours for the monthly table | date + person name |
//! | GlobalNote | Board notice shown to everyone | fixed `GLOBAL` id |
//!
//! Composite keys are plain structs with structural equality, usable
//! directly as map keys.

mod calendar;
mod hours;
mod note;
mod role;
mod status;
mod submission;
mod time_slot;
mod viewer;

pub use calendar::{CalendarDate, MonthSpan, TimeOfDay, WeekdayLabels};
pub use hours::{HourKey, HourRecord};
pub use note::{GlobalNote, GLOBAL_NOTE_ID};
pub use role::RoleCode;
pub use status::Confirmation;
pub use submission::{Submission, SubmissionKey};
pub use time_slot::{Performers, TimeSlotAssignment, TimeSlotKey};
pub use viewer::Viewer;
