//! Elective band assignment engine.
//!
//! Turns a grade's elective teaching groups, student choices, and reserved
//! elective slots into a banded assignment:
//!
//! 1. `balance` gates divisibility of group counts by the home-class count.
//! 2. `bands` allocates band labels and places groups on them without
//!    putting two same-teacher groups on one label.
//! 3. `students` assigns each student to one group per chosen subject with
//!    seeded-shuffle backtracking.
//! 4. `slots` partitions the elective slot indices across bands and draws
//!    each group's weekly slots, then reports residual conflicts.
//!
//! `pipeline` chains the phases with skip/halt semantics.

mod balance;
mod bands;
mod pipeline;
mod slots;
mod students;

pub use balance::{validate_band_balance, BandBalanceError};
pub use bands::assign_bands;
pub use pipeline::{
    ElectiveInput, ElectiveOutcome, ElectivePipeline, ElectiveResult, GroupStat,
};
pub use slots::{
    assign_slots, partition_slots, validate_conflicts, ConflictReport, StudentConflict,
    TeacherConflict,
};
pub use students::{assign_students, FailedStudent, StudentAssignment};
