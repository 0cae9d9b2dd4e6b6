//! Elective teaching group and student models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier for an elective teaching group within one run.
pub type GroupId = u32;

/// One elective teaching section ("group"): a teacher offering a subject
/// to students drawn from every home class of the grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectiveGroup {
    /// Run-local identifier.
    pub id: GroupId,
    /// Elective subject.
    pub subject: String,
    /// Group number within the subject (display label).
    pub group_no: String,
    /// Teacher identifier (may be empty).
    pub teacher_id: String,
    /// Teacher display name.
    pub teacher_name: String,
    /// Weekly hours the group meets.
    pub hours: u32,
    /// Assigned band label; `None` until band assignment runs.
    pub band: Option<char>,
    /// Enrolled student ids.
    pub students: Vec<String>,
    /// Assigned elective slot indices.
    pub slots: Vec<usize>,
}

impl ElectiveGroup {
    /// Creates an unassigned group.
    pub fn new(
        id: GroupId,
        subject: impl Into<String>,
        group_no: impl Into<String>,
        teacher_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            group_no: group_no.into(),
            teacher_id: String::new(),
            teacher_name: teacher_name.into(),
            hours: 3,
            band: None,
            students: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Sets the teacher id.
    pub fn with_teacher_id(mut self, id: impl Into<String>) -> Self {
        self.teacher_id = id.into();
        self
    }

    /// Sets the weekly hours.
    pub fn with_hours(mut self, hours: u32) -> Self {
        self.hours = hours;
        self
    }

    /// The key used in collision checks: id, else name.
    pub fn teacher_key(&self) -> &str {
        if self.teacher_id.is_empty() {
            &self.teacher_name
        } else {
            &self.teacher_id
        }
    }
}

/// One student in the elective pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectiveStudent {
    /// Student identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Home class number.
    pub class_no: String,
    /// Student number within the home class.
    pub number: String,
    /// Elected subjects, in declaration order.
    pub electives: Vec<String>,
    /// Subject → assigned group id; filled by the student assigner.
    pub group_map: HashMap<String, GroupId>,
}

impl ElectiveStudent {
    /// Creates a student with no assignments.
    pub fn new(id: impl Into<String>, name: impl Into<String>, class_no: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_no: class_no.into(),
            number: String::new(),
            electives: Vec::new(),
            group_map: HashMap::new(),
        }
    }

    /// Sets the student number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the elected subjects.
    pub fn with_electives(mut self, electives: Vec<String>) -> Self {
        self.electives = electives;
        self
    }
}
