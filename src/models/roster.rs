//! Roster input models.
//!
//! The caller loads these from its storage layer and hands them to the
//! engines as immutable input: teacher assignment rows, the per-subject
//! demand/type table, hard availability constraints, and pre-placed fixed
//! subjects.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One teacher-assignment row: a teacher teaching a subject to a set of
/// classes in one grade for a weekly hour count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherRow {
    /// Teacher identifier (may be empty; the name is the fallback key).
    pub teacher_id: String,
    /// Teacher display name.
    pub name: String,
    /// Subject taught.
    pub subject: String,
    /// Grade label.
    pub grade: String,
    /// Class numbers this row covers.
    pub classes: Vec<String>,
    /// Weekly hours per class.
    pub weekly_hours: u32,
}

impl TeacherRow {
    /// Creates a row with the common fields; hours default to 4.
    pub fn new(name: impl Into<String>, subject: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            teacher_id: String::new(),
            name: name.into(),
            subject: subject.into(),
            grade: grade.into(),
            classes: Vec::new(),
            weekly_hours: 4,
        }
    }

    /// Sets the teacher id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.teacher_id = id.into();
        self
    }

    /// Sets the covered classes.
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// Sets weekly hours per class.
    pub fn with_weekly_hours(mut self, hours: u32) -> Self {
        self.weekly_hours = hours;
        self
    }

    /// The key used in constraint and busy-set lookups: id, else name.
    pub fn teacher_key(&self) -> &str {
        if self.teacher_id.is_empty() {
            &self.name
        } else {
            &self.teacher_id
        }
    }
}

/// Whether a subject runs as regular class teaching or elective rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    /// Taught to whole home classes.
    Regular,
    /// Taught in banded teaching groups drawn from all classes.
    Elective,
}

/// Per-(grade, subject) demand and type row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectInfo {
    /// Grade label.
    pub grade: String,
    /// Subject name.
    pub subject: String,
    /// Regular or elective.
    pub kind: SubjectKind,
    /// Weekly hour demand.
    pub weekly_demand: u32,
    /// Number of classes that take the subject.
    pub class_demand: u32,
    /// Declared elective category, if any (e.g. "science").
    pub band_group: Option<String>,
}

impl SubjectInfo {
    /// Creates a regular subject row.
    pub fn regular(grade: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            grade: grade.into(),
            subject: subject.into(),
            kind: SubjectKind::Regular,
            weekly_demand: 0,
            class_demand: 0,
            band_group: None,
        }
    }

    /// Creates an elective subject row.
    pub fn elective(grade: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::Elective,
            ..Self::regular(grade, subject)
        }
    }

    /// Sets the weekly demand.
    pub fn with_weekly_demand(mut self, demand: u32) -> Self {
        self.weekly_demand = demand;
        self
    }

    /// Sets the class demand.
    pub fn with_class_demand(mut self, demand: u32) -> Self {
        self.class_demand = demand;
        self
    }

    /// Sets the declared band group.
    pub fn with_band_group(mut self, group: impl Into<String>) -> Self {
        self.band_group = Some(group.into());
        self
    }
}

/// A hard availability constraint: a teacher cannot teach on a day, or in
/// one period of a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConstraint {
    /// Teacher key (id or name).
    pub teacher_key: String,
    /// Weekday index.
    pub day: u8,
    /// Blocked period; `None` blocks the whole day.
    pub period: Option<u8>,
}

impl AvailabilityConstraint {
    /// Blocks a whole day.
    pub fn whole_day(teacher_key: impl Into<String>, day: u8) -> Self {
        Self {
            teacher_key: teacher_key.into(),
            day,
            period: None,
        }
    }

    /// Blocks one period of a day.
    pub fn period(teacher_key: impl Into<String>, day: u8, period: u8) -> Self {
        Self {
            teacher_key: teacher_key.into(),
            day,
            period: Some(period),
        }
    }
}

/// Constraint lookups indexed by teacher key.
///
/// Built once per run; read-only during search.
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    by_teacher: HashMap<String, Vec<AvailabilityConstraint>>,
}

impl ConstraintIndex {
    /// Indexes a constraint list.
    pub fn from_slice(constraints: &[AvailabilityConstraint]) -> Self {
        let mut by_teacher: HashMap<String, Vec<AvailabilityConstraint>> = HashMap::new();
        for c in constraints {
            by_teacher
                .entry(c.teacher_key.clone())
                .or_default()
                .push(c.clone());
        }
        Self { by_teacher }
    }

    /// Whether a teacher is barred from a (day, period).
    pub fn forbids(&self, teacher_key: &str, day: u8, period: u8) -> bool {
        self.by_teacher
            .get(teacher_key)
            .is_some_and(|cs| {
                cs.iter()
                    .any(|c| c.day == day && c.period.is_none_or(|p| p == period))
            })
    }
}

/// A pre-placed fixed subject: occupies a period span on one day for every
/// class of a grade (or of all grades) before search begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedSubject {
    /// Grade the placement applies to; `None` = every grade.
    pub grade: Option<String>,
    /// Weekday index.
    pub day: u8,
    /// First occupied period, 1-based.
    pub period_start: u8,
    /// Number of consecutive periods.
    pub period_count: u8,
    /// Subject name shown in the cell.
    pub subject: String,
}

impl FixedSubject {
    /// Creates a single-period fixed subject for one grade.
    pub fn new(grade: impl Into<String>, day: u8, period_start: u8, subject: impl Into<String>) -> Self {
        Self {
            grade: Some(grade.into()),
            day,
            period_start,
            period_count: 1,
            subject: subject.into(),
        }
    }

    /// Creates a fixed subject applying to all grades.
    pub fn all_grades(day: u8, period_start: u8, subject: impl Into<String>) -> Self {
        Self {
            grade: None,
            day,
            period_start,
            period_count: 1,
            subject: subject.into(),
        }
    }

    /// Sets the span length.
    pub fn with_period_count(mut self, count: u8) -> Self {
        self.period_count = count.max(1);
        self
    }

    /// Whether this entry applies to a grade.
    pub fn applies_to(&self, grade: &str) -> bool {
        self.grade.as_deref().is_none_or(|g| g == grade)
    }
}

/// Number of home classes in a grade, derived from the roster.
///
/// The roster does not carry a class count directly; the highest class
/// number mentioned for the grade is taken, with a fallback of 10 when the
/// grade has no parseable class numbers.
pub fn home_class_count(grade: &str, teachers: &[TeacherRow]) -> u32 {
    let mut max_class = 0u32;
    for t in teachers {
        if t.grade != grade {
            continue;
        }
        for c in &t.classes {
            if let Ok(n) = c.trim().parse::<u32>() {
                max_class = max_class.max(n);
            }
        }
    }
    if max_class > 0 {
        max_class
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_key_fallback() {
        let with_id = TeacherRow::new("Kim", "Math", "1").with_id("t-17");
        assert_eq!(with_id.teacher_key(), "t-17");
        let without = TeacherRow::new("Kim", "Math", "1");
        assert_eq!(without.teacher_key(), "Kim");
    }

    #[test]
    fn test_constraint_index() {
        let idx = ConstraintIndex::from_slice(&[
            AvailabilityConstraint::whole_day("t1", 2),
            AvailabilityConstraint::period("t2", 0, 1),
        ]);
        assert!(idx.forbids("t1", 2, 1));
        assert!(idx.forbids("t1", 2, 7));
        assert!(!idx.forbids("t1", 3, 1));
        assert!(idx.forbids("t2", 0, 1));
        assert!(!idx.forbids("t2", 0, 2));
        assert!(!idx.forbids("t3", 0, 1));
    }

    #[test]
    fn test_fixed_subject_applies() {
        let fs = FixedSubject::new("1", 0, 1, "Assembly");
        assert!(fs.applies_to("1"));
        assert!(!fs.applies_to("2"));
        let all = FixedSubject::all_grades(0, 1, "Assembly");
        assert!(all.applies_to("1"));
        assert!(all.applies_to("3"));
    }

    #[test]
    fn test_home_class_count() {
        let teachers = vec![
            TeacherRow::new("A", "Math", "1").with_classes(vec!["1".into(), "2".into(), "6".into()]),
            TeacherRow::new("B", "Korean", "1").with_classes(vec!["4".into()]),
            TeacherRow::new("C", "Math", "2").with_classes(vec!["9".into()]),
        ];
        assert_eq!(home_class_count("1", &teachers), 6);
        assert_eq!(home_class_count("2", &teachers), 9);
        // Unknown grade: fallback
        assert_eq!(home_class_count("3", &teachers), 10);
    }
}
