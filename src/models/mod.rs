//! Timetabling domain models.
//!
//! Provides the core data types for representing a weekly school
//! timetable and the elective banding problem.
//!
//! # Domain Mappings
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | `TimeGrid` | Weekday count and per-day period caps |
//! | `Cell` | One (day, period) position in the week |
//! | `ClassKey` | A home class: grade + class number |
//! | `Block` | Atomic schedulable unit (teacher × subject × classes × hours) |
//! | `Timetable` | Class → cell → placement table |
//! | `TeacherLoad` | Teacher → occupied-cell sets |
//! | `ElectiveGroup` | One elective teaching section (a "group") |
//! | Band | Labeled partition of the elective slot set |

mod block;
mod elective;
mod grid;
mod roster;
mod timetable;

pub use block::{Block, BlockEntry};
pub use elective::{ElectiveGroup, ElectiveStudent, GroupId};
pub use grid::{Cell, TimeGrid};
pub use roster::{
    home_class_count, AvailabilityConstraint, ConstraintIndex, FixedSubject, SubjectInfo,
    SubjectKind, TeacherRow,
};
pub use timetable::{ClassKey, LinkedPos, Placement, TeacherLoad, Timetable};
