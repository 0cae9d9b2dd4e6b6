//! Block (schedulable unit) model.
//!
//! A block is the unit of search: one teacher teaching one subject to one
//! class (regular subjects), or a bundle of elective teaching sections
//! that must occupy the same cells across a grade (elective rotations).

use serde::{Deserialize, Serialize};

/// One teaching section inside a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockEntry {
    /// Teacher identifier (may be empty).
    pub teacher_id: String,
    /// Teacher display name.
    pub teacher_name: String,
    /// Subject this entry teaches.
    pub subject: String,
    /// Classes this entry covers.
    pub classes: Vec<String>,
    /// Weekly hours per class declared on the roster row.
    pub hours_per_class: u32,
}

impl BlockEntry {
    /// The key used in busy-set and constraint lookups: id, else name.
    pub fn teacher_key(&self) -> &str {
        if self.teacher_id.is_empty() {
            &self.teacher_name
        } else {
            &self.teacher_id
        }
    }
}

/// An atomic schedulable unit.
///
/// Regular blocks carry exactly one entry covering one class; elective
/// blocks bundle every section of one (grade, band-group) bucket so the
/// whole rotation lands in shared cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Stable identifier within the run.
    pub id: String,
    /// Human-readable label for reports.
    pub name: String,
    /// Grade this block schedules into.
    pub grade: String,
    /// Whether this is an elective rotation.
    pub is_elective: bool,
    /// Declared elective category this block was bucketed under.
    pub band_group: Option<String>,
    /// Consecutive periods placed together per session.
    pub linked_periods: u8,
    /// Weekly periods still required, net of fixed-subject coverage.
    pub hours_per_week: u32,
    /// Teaching sections in this block.
    pub entries: Vec<BlockEntry>,
}

impl Block {
    /// Distinct classes this block occupies when placed, sorted.
    ///
    /// For electives this is the set of classes actually present on the
    /// roster rows, not the full 1..=class_count range.
    pub fn affected_classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self
            .entries
            .iter()
            .flat_map(|e| e.classes.iter().cloned())
            .collect();
        classes.sort();
        classes.dedup();
        classes
    }

    /// The entry covering a class, if any. First match wins when sections
    /// overlap.
    pub fn entry_for_class(&self, class_no: &str) -> Option<&BlockEntry> {
        self.entries
            .iter()
            .find(|e| e.classes.iter().any(|c| c == class_no))
    }

    /// Subject shown for a class: the covering entry's subject, falling
    /// back to the first entry.
    pub fn subject_for_class(&self, class_no: &str) -> &str {
        self.entry_for_class(class_no)
            .or_else(|| self.entries.first())
            .map(|e| e.subject.as_str())
            .unwrap_or("")
    }
}
