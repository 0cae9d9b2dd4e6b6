//! School timetabling framework for the U-Engine ecosystem.
//!
//! Provides domain models and two engines: constraint-based weekly
//! timetable generation, and elective band assignment (grouping elective
//! teaching sections into labeled bands and assigning students to them).
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimeGrid`, `Cell`, `ClassKey`,
//!   `Timetable`, `TeacherLoad`, `Block`, roster rows, elective groups
//! - **`blocks`**: Block Builder — roster rows to schedulable blocks
//! - **`generator`**: Multi-attempt constraint search over the weekly grid
//! - **`elective`**: Band balance validation, band assignment, student
//!   group assignment, slot distribution, conflict validation
//! - **`output`**: Persistence record shapes for the caller's storage layer
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling refs)
//!
//! # Architecture
//!
//! The crate is a pure computation layer. A run is a function of its
//! immutable inputs: the caller loads teacher/subject/student rosters and
//! hands them in, the engines return structured results (including
//! shortfall and conflict reports), and the caller persists what it is
//! prepared to commit. Search attempts operate on independent deep copies
//! of a shared baseline, so the `parallel` feature can fan them out across
//! rayon workers with a deterministic max-by-placed reduction.

pub mod blocks;
pub mod elective;
pub mod generator;
pub mod models;
pub mod output;
pub mod validation;
