//! Input validation for timetable runs.
//!
//! Checks structural integrity of roster rows, subject declarations, and
//! elective input before any generation phase runs. Detects:
//! - Duplicate IDs
//! - Empty class lists
//! - Zero-hour rows and groups
//! - Student elective choices with no offering group

use crate::elective::ElectiveInput;
use crate::models::{SubjectInfo, TeacherRow};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A subject is declared twice for one grade.
    DuplicateSubjectInfo,
    /// A roster row lists no classes.
    EmptyClassList,
    /// A roster row or group declares zero weekly hours.
    ZeroHours,
    /// A student elected a subject no group offers.
    UnknownElectiveSubject,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates roster rows and subject declarations.
///
/// Checks:
/// 1. No duplicate non-empty teacher IDs
/// 2. All rows list at least one class
/// 3. All rows declare at least one weekly hour
/// 4. No subject declared twice for the same grade
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(teachers: &[TeacherRow], subjects: &[SubjectInfo]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut teacher_ids = HashSet::new();
    for row in teachers {
        if !row.teacher_id.is_empty() && !teacher_ids.insert(row.teacher_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", row.teacher_id),
            ));
        }
        if row.classes.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyClassList,
                format!("Teacher '{}' lists no classes", row.name),
            ));
        }
        if row.weekly_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroHours,
                format!("Teacher '{}' declares zero weekly hours", row.name),
            ));
        }
    }

    let mut declared = HashSet::new();
    for info in subjects {
        if !declared.insert((info.grade.as_str(), info.subject.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSubjectInfo,
                format!(
                    "Subject '{}' declared twice for grade {}",
                    info.subject, info.grade
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates one grade's elective input.
///
/// Checks:
/// 1. No duplicate group IDs
/// 2. No duplicate student IDs
/// 3. All groups declare at least one weekly hour
/// 4. Every elected subject has at least one offering group
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_elective_input(input: &ElectiveInput) -> ValidationResult {
    let mut errors = Vec::new();

    let mut group_ids = HashSet::new();
    let mut offered = HashSet::new();
    for group in &input.groups {
        if !group_ids.insert(group.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group ID: {}", group.id),
            ));
        }
        if group.hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroHours,
                format!(
                    "Group {} ({}) declares zero weekly hours",
                    group.id, group.subject
                ),
            ));
        }
        offered.insert(group.subject.as_str());
    }

    let mut student_ids = HashSet::new();
    for student in &input.students {
        if !student_ids.insert(student.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", student.id),
            ));
        }
        for subject in &student.electives {
            if !offered.contains(subject.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownElectiveSubject,
                    format!(
                        "Student '{}' elected '{}' which no group offers",
                        student.id, subject
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElectiveGroup, ElectiveStudent};

    fn row(id: &str, name: &str) -> TeacherRow {
        let mut r = TeacherRow::new(name, "Math", "1")
            .with_classes(vec!["1".into()])
            .with_weekly_hours(4);
        r.teacher_id = id.into();
        r
    }

    #[test]
    fn test_valid_roster_passes() {
        let teachers = vec![row("t1", "Kim"), row("t2", "Lee")];
        let subjects = vec![SubjectInfo::regular("1", "Math")];
        assert!(validate_roster(&teachers, &subjects).is_ok());
    }

    #[test]
    fn test_duplicate_teacher_id() {
        let teachers = vec![row("t1", "Kim"), row("t1", "Lee")];
        let errors = validate_roster(&teachers, &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_empty_teacher_ids_do_not_collide() {
        let teachers = vec![row("", "Kim"), row("", "Lee")];
        assert!(validate_roster(&teachers, &[]).is_ok());
    }

    #[test]
    fn test_empty_class_list_and_zero_hours() {
        let mut r = row("t1", "Kim");
        r.classes.clear();
        r.weekly_hours = 0;
        let errors = validate_roster(&[r], &[]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyClassList));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::ZeroHours));
    }

    #[test]
    fn test_duplicate_subject_declaration() {
        let subjects = vec![
            SubjectInfo::regular("1", "Math"),
            SubjectInfo::elective("1", "Math"),
        ];
        let errors = validate_roster(&[], &subjects).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateSubjectInfo);
    }

    #[test]
    fn test_elective_input_checks() {
        let input = ElectiveInput::new("1", 10)
            .with_groups(vec![
                ElectiveGroup::new(1, "Physics", "1", "Kim"),
                ElectiveGroup::new(1, "Ethics", "1", "Lee").with_hours(0),
            ])
            .with_students(vec![
                ElectiveStudent::new("s1", "Park", "1")
                    .with_electives(vec!["Astronomy".into()]),
                ElectiveStudent::new("s1", "Choi", "2"),
            ]);

        let errors = validate_elective_input(&input).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId
            && e.message.contains("group ID")));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::ZeroHours));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownElectiveSubject));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId
            && e.message.contains("student ID")));
    }
}
