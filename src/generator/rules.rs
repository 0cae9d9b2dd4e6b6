//! Placement legality: the five-condition constraint evaluator.
//!
//! `can_place` is a pure predicate over the current schedule state. The
//! conditions are evaluated in a fixed order and short-circuit on the
//! first failure:
//!
//! 1. Class-cell vacancy for every affected class across the linked span
//! 2. Teacher-cell vacancy for every entry's teacher
//! 3. Hard availability constraints (whole-day or per-period)
//! 4. Same-subject consecutive run per affected class within the ceiling
//! 5. Teacher consecutive occupied-cell run within the ceiling

use crate::models::{Block, Cell, ClassKey, ConstraintIndex, TeacherLoad, TimeGrid, Timetable};

/// Consecutive-run ceilings for placement legality.
///
/// Defaults: at most 2 same-subject periods in a row per class, at most 4
/// occupied periods in a row per teacher. The fallback pass relaxes both
/// by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRules {
    /// Maximum contiguous same-subject run per class per day.
    pub max_subject_run: u8,
    /// Maximum contiguous occupied-period run per teacher per day.
    pub max_teacher_run: u8,
}

impl PlacementRules {
    /// The fallback ceilings: both limits raised by one.
    pub fn relaxed(self) -> Self {
        Self {
            max_subject_run: self.max_subject_run + 1,
            max_teacher_run: self.max_teacher_run + 1,
        }
    }
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            max_subject_run: 2,
            max_teacher_run: 4,
        }
    }
}

/// Whether a block may legally occupy `[start_period, start_period +
/// linked_periods)` on `day`.
///
/// Pure: reads the timetable, busy sets, and constraint index, mutates
/// nothing.
pub fn can_place(
    block: &Block,
    day: u8,
    start_period: u8,
    grid: &TimeGrid,
    timetable: &Timetable,
    load: &TeacherLoad,
    constraints: &ConstraintIndex,
    rules: PlacementRules,
) -> bool {
    let linked = block.linked_periods.max(1);
    let end_period = start_period + linked - 1;
    if start_period < 1 || end_period > grid.periods_on(day) {
        return false;
    }

    let affected = block.affected_classes();

    // 1. Class-cell vacancy.
    for class in &affected {
        let key = ClassKey::new(block.grade.clone(), class.clone());
        for period in start_period..=end_period {
            if !timetable.is_free(&key, Cell::new(day, period)) {
                return false;
            }
        }
    }

    // 2. Teacher-cell vacancy.
    for entry in &block.entries {
        for period in start_period..=end_period {
            if load.is_busy(entry.teacher_key(), Cell::new(day, period)) {
                return false;
            }
        }
    }

    // 3. Hard availability.
    for entry in &block.entries {
        for period in start_period..=end_period {
            if constraints.forbids(entry.teacher_key(), day, period) {
                return false;
            }
        }
    }

    // 4. Same-subject consecutive run per affected class.
    for class in &affected {
        let key = ClassKey::new(block.grade.clone(), class.clone());
        let subject = block.subject_for_class(class);
        let run = subject_run_with_span(&key, subject, day, start_period, linked, grid, timetable);
        if run > rules.max_subject_run {
            return false;
        }
    }

    // 5. Teacher consecutive load.
    for entry in &block.entries {
        let run = teacher_run_with_span(entry.teacher_key(), day, start_period, linked, grid, load);
        if run > rules.max_teacher_run {
            return false;
        }
    }

    true
}

/// Contiguous same-subject run the class would have if the span were
/// placed: scan outward from the span on the same day.
fn subject_run_with_span(
    class: &ClassKey,
    subject: &str,
    day: u8,
    start_period: u8,
    linked: u8,
    grid: &TimeGrid,
    timetable: &Timetable,
) -> u8 {
    let mut lo = start_period;
    let mut hi = start_period + linked - 1;
    while lo > 1 && timetable.subject_at(class, Cell::new(day, lo - 1)) == Some(subject) {
        lo -= 1;
    }
    while hi < grid.periods_on(day)
        && timetable.subject_at(class, Cell::new(day, hi + 1)) == Some(subject)
    {
        hi += 1;
    }
    hi - lo + 1
}

/// Contiguous occupied run the teacher would have if the span were placed.
fn teacher_run_with_span(
    teacher_key: &str,
    day: u8,
    start_period: u8,
    linked: u8,
    grid: &TimeGrid,
    load: &TeacherLoad,
) -> u8 {
    let mut lo = start_period;
    let mut hi = start_period + linked - 1;
    while lo > 1 && load.is_busy(teacher_key, Cell::new(day, lo - 1)) {
        lo -= 1;
    }
    while hi < grid.periods_on(day) && load.is_busy(teacher_key, Cell::new(day, hi + 1)) {
        hi += 1;
    }
    hi - lo + 1
}
