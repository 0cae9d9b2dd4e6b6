//! Timetable generation: constraint evaluation, placement, and the
//! bounded multi-attempt search driver.
//!
//! # Algorithm
//!
//! Fixed subjects are pre-placed once into a shared baseline. Each attempt
//! clones the baseline, visits slots periods-ascending (weekday order is
//! natural on attempt 0, a seeded permutation after), anchors elective
//! blocks first, then places regular blocks most-constrained-first. Each
//! block gets two passes: the first under the default consecutive-run
//! ceilings, the second with both ceilings relaxed by one, counting every
//! relaxed-pass period as a consecutive warning. The attempt with the most
//! placed periods wins; full placement ends the run early.
//!
//! Shortfall is not an error: the driver always returns the best partial
//! schedule with per-block placed/needed reports.

mod placer;
mod rules;
mod search;

pub use placer::apply_placement;
pub use rules::{can_place, PlacementRules};
pub use search::{BlockReport, GenerationOutcome, Generator, GeneratorConfig};
