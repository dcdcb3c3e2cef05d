//! Shift coordination for a small venue.
//!
//! Collects per-person availability, assigns performers to timed program
//! slots, confirms a day's schedule, and projects logged hours into a
//! monthly actor-by-day table.
//!
//! # Modules
//!
//! - **`models`**: Value types: `CalendarDate`, `TimeOfDay`, `Submission`,
//!   `TimeSlotAssignment`, `HourRecord`, `GlobalNote`, `Viewer`
//! - **`store`**: Keyed persistence ports with in-memory and SQLite backends
//! - **`coordination`**: Day confirmation across submissions and time slots
//! - **`visibility`**: What a non-admin viewer may read
//! - **`table`**: Monthly hours table with row, column and grand totals
//! - **`service`**: Validated, authorized entry point for a presentation layer
//! - **`validation`**: Field-level input checks
//! - **`config`** / **`roster`**: TOML configuration and the actor roster
//!
//! # Confirmation
//!
//! Every date is either open (`N`) or confirmed (`Y`). Members see all rows
//! of a confirmed day but only their own rows of an open day. The flag is
//! day-wide and changes only through [`ConfirmationCoordinator`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_rota::{ScheduleService, StaticRoster, Stores, Viewer};
//!
//! let roster = StaticRoster::new(["Kim", "Lee"]).unwrap();
//! let service = ScheduleService::new(Stores::in_memory(), Arc::new(roster));
//!
//! let kim = Viewer::member("U1", "Kim");
//! service
//!     .submit_availability(&kim, "2025-02-10", "U1", "Kim", "", true)
//!     .unwrap();
//! let visible = service.get_visible_submissions(2025, 2, &kim).unwrap();
//! assert_eq!(visible.len(), 1);
//! ```

pub mod config;
pub mod coordination;
pub mod error;
pub mod models;
pub mod roster;
pub mod service;
pub mod store;
pub mod table;
pub mod validation;
pub mod visibility;

pub use config::Config;
pub use coordination::{ConfirmationCoordinator, ConfirmationReport};
pub use error::{Result, ScheduleError};
pub use models::{
    CalendarDate, Confirmation, GlobalNote, HourRecord, MonthSpan, RoleCode, Submission,
    TimeOfDay, TimeSlotAssignment, Viewer, WeekdayLabels,
};
pub use roster::{RosterProvider, StaticRoster};
pub use service::{ScheduleService, SlotInput};
pub use store::Stores;
pub use table::{RowView, ScheduleTable, TableBuilder};
