//! Timetable (solution) model.
//!
//! A timetable is a keyed table: home class → cell → placement. The key
//! types are explicit structs rather than concatenated strings, so a
//! malformed grade or class number cannot silently collide with another
//! key. `TeacherLoad` tracks the cells each teacher occupies.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::grid::{Cell, TimeGrid};

/// Identifies one home class: grade + class number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassKey {
    /// Grade label (e.g. "1").
    pub grade: String,
    /// Class number within the grade (e.g. "3").
    pub class_no: String,
}

impl ClassKey {
    /// Creates a class key.
    pub fn new(grade: impl Into<String>, class_no: impl Into<String>) -> Self {
        Self {
            grade: grade.into(),
            class_no: class_no.into(),
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.grade, self.class_no)
    }
}

/// Position of a cell within a linked multi-period session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkedPos {
    /// First period of the session.
    Top,
    /// Interior period.
    Middle,
    /// Last period of the session.
    Bottom,
}

impl LinkedPos {
    /// Mark for position `index` in a session of `count` linked periods.
    ///
    /// Returns `None` for single-period sessions.
    pub fn for_span(index: u8, count: u8) -> Option<Self> {
        if count <= 1 {
            None
        } else if index == 0 {
            Some(Self::Top)
        } else if index == count - 1 {
            Some(Self::Bottom)
        } else {
            Some(Self::Middle)
        }
    }
}

/// One scheduled lesson in a class's cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Block that produced this placement. `None` for fixed subjects.
    pub block_id: Option<String>,
    /// Subject taught.
    pub subject: String,
    /// Teacher display name.
    pub teacher_name: String,
    /// Teacher identifier (may be empty for fixed subjects).
    pub teacher_id: String,
    /// Whether this cell belongs to an elective rotation.
    pub is_elective: bool,
    /// Whether this cell was pre-placed as a fixed subject.
    pub is_fixed: bool,
    /// Position within a linked session, if any.
    pub linked_pos: Option<LinkedPos>,
}

impl Placement {
    /// Creates a fixed-subject placement.
    pub fn fixed(subject: impl Into<String>, linked_pos: Option<LinkedPos>) -> Self {
        Self {
            block_id: None,
            subject: subject.into(),
            teacher_name: "(fixed)".to_string(),
            teacher_id: String::new(),
            is_elective: false,
            is_fixed: true,
            linked_pos,
        }
    }
}

/// The weekly timetable: class → cell → placement.
///
/// Invariant: at most one placement per `(ClassKey, Cell)`. `set` replaces;
/// callers check vacancy through the constraint evaluator before committing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    cells: HashMap<ClassKey, HashMap<Cell, Placement>>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// The placement in a class's cell, if any.
    pub fn get(&self, class: &ClassKey, cell: Cell) -> Option<&Placement> {
        self.cells.get(class).and_then(|m| m.get(&cell))
    }

    /// Whether a class's cell is empty.
    pub fn is_free(&self, class: &ClassKey, cell: Cell) -> bool {
        self.get(class, cell).is_none()
    }

    /// The subject in a class's cell, if any.
    pub fn subject_at(&self, class: &ClassKey, cell: Cell) -> Option<&str> {
        self.get(class, cell).map(|p| p.subject.as_str())
    }

    /// Writes a placement into a class's cell.
    pub fn set(&mut self, class: ClassKey, cell: Cell, placement: Placement) {
        self.cells.entry(class).or_default().insert(cell, placement);
    }

    /// All classes that have at least one placement.
    pub fn classes(&self) -> impl Iterator<Item = &ClassKey> {
        self.cells.keys()
    }

    /// All placements for one class.
    pub fn class_cells(&self, class: &ClassKey) -> Option<&HashMap<Cell, Placement>> {
        self.cells.get(class)
    }

    /// Total number of placements.
    pub fn placement_count(&self) -> usize {
        self.cells.values().map(|m| m.len()).sum()
    }
}

/// Occupied-cell sets per teacher.
///
/// Teacher key is the id when present, otherwise the display name (roster
/// rows are not guaranteed to carry member ids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherLoad {
    busy: HashMap<String, HashSet<Cell>>,
}

impl TeacherLoad {
    /// Creates an empty load map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a cell as occupied for a teacher. Returns `false` if the cell
    /// was already occupied.
    pub fn occupy(&mut self, teacher_key: &str, cell: Cell) -> bool {
        self.busy
            .entry(teacher_key.to_string())
            .or_default()
            .insert(cell)
    }

    /// Whether a teacher occupies a cell.
    pub fn is_busy(&self, teacher_key: &str, cell: Cell) -> bool {
        self.busy
            .get(teacher_key)
            .is_some_and(|s| s.contains(&cell))
    }

    /// All cells occupied by a teacher.
    pub fn cells_for(&self, teacher_key: &str) -> Option<&HashSet<Cell>> {
        self.busy.get(teacher_key)
    }

    /// All teacher keys with at least one occupied cell.
    pub fn teachers(&self) -> impl Iterator<Item = &str> {
        self.busy.keys().map(String::as_str)
    }

    /// Longest contiguous occupied-period run for a teacher on any day.
    pub fn max_consecutive_run(&self, teacher_key: &str, grid: &TimeGrid) -> u8 {
        let Some(cells) = self.busy.get(teacher_key) else {
            return 0;
        };
        let mut best = 0u8;
        for day in 0..grid.days() {
            let mut run = 0u8;
            for period in 1..=grid.periods_on(day) {
                if cells.contains(&Cell::new(day, period)) {
                    run += 1;
                    best = best.max(run);
                } else {
                    run = 0;
                }
            }
        }
        best
    }
}
