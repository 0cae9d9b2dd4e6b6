//! Block Builder: roster rows → schedulable blocks.
//!
//! # Algorithm
//!
//! 1. Regular subjects: one block per (teacher, class) pair. Weekly hours
//!    are the roster's declared hours minus any fixed-subject periods
//!    already covering that subject in that grade; non-positive nets are
//!    skipped.
//! 2. Elective subjects: sections are bucketed by (grade, band-group),
//!    with an unlabeled bucket when no band-group is declared. Each bucket
//!    becomes one block whose hours are `rotations × max section hours`,
//!    where `rotations` is the bucket's distinct subject count over the
//!    grade's home-class count, rounded to the nearest integer (minimum 1).
//!    The rounding is a soft fallback only — `validate_band_balance` is
//!    the hard gate on divisibility.
//!
//! The builder is a pure function over its input slices: no side effects,
//! deterministic output order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{
    home_class_count, Block, BlockEntry, FixedSubject, SubjectInfo, SubjectKind, TeacherRow,
};

/// Builds the ordered block list for a run.
///
/// Regular blocks come first in roster order, then one elective block per
/// (grade, band-group) bucket.
pub fn build_blocks(
    teachers: &[TeacherRow],
    subjects: &[SubjectInfo],
    fixed: &[FixedSubject],
) -> Vec<Block> {
    let kind_of: HashMap<(&str, &str), SubjectKind> = subjects
        .iter()
        .map(|s| ((s.grade.as_str(), s.subject.as_str()), s.kind))
        .collect();
    let band_group_of: HashMap<(&str, &str), Option<&str>> = subjects
        .iter()
        .map(|s| {
            (
                (s.grade.as_str(), s.subject.as_str()),
                s.band_group.as_deref(),
            )
        })
        .collect();

    let mut blocks = Vec::new();
    let mut next_id = 0u32;

    // Elective sections bucketed by (grade, band-group); None = unlabeled.
    let mut elective_buckets: BTreeMap<(String, Option<String>), Vec<&TeacherRow>> =
        BTreeMap::new();

    for row in teachers {
        if row.grade.is_empty() || row.subject.is_empty() {
            continue;
        }
        let key = (row.grade.as_str(), row.subject.as_str());
        let kind = kind_of.get(&key).copied().unwrap_or(SubjectKind::Regular);

        if kind == SubjectKind::Elective {
            let label = band_group_of
                .get(&key)
                .copied()
                .flatten()
                .map(str::to_string);
            elective_buckets
                .entry((row.grade.clone(), label))
                .or_default()
                .push(row);
            continue;
        }

        let net_hours = row
            .weekly_hours
            .saturating_sub(fixed_coverage(fixed, &row.grade, &row.subject));
        if net_hours == 0 {
            continue;
        }
        for class in &row.classes {
            next_id += 1;
            blocks.push(Block {
                id: format!("blk_{next_id}"),
                name: format!("G{} {} (class {})", row.grade, row.subject, class),
                grade: row.grade.clone(),
                is_elective: false,
                band_group: None,
                linked_periods: 1,
                hours_per_week: net_hours,
                entries: vec![BlockEntry {
                    teacher_id: row.teacher_id.clone(),
                    teacher_name: row.name.clone(),
                    subject: row.subject.clone(),
                    classes: vec![class.clone()],
                    hours_per_class: row.weekly_hours,
                }],
            });
        }
    }

    for ((grade, label), rows) in &elective_buckets {
        let distinct_subjects: BTreeSet<&str> =
            rows.iter().map(|r| r.subject.as_str()).collect();
        let home_classes = home_class_count(grade, teachers);
        let rotations =
            ((distinct_subjects.len() as f64 / home_classes as f64).round() as u32).max(1);
        let max_hours = rows.iter().map(|r| r.weekly_hours).max().unwrap_or(0);
        let overlap: u32 = distinct_subjects
            .iter()
            .map(|s| fixed_coverage(fixed, grade, s))
            .sum();
        let hours = (rotations * max_hours).saturating_sub(overlap);
        if hours == 0 {
            continue;
        }

        next_id += 1;
        blocks.push(Block {
            id: format!("elec_{next_id}"),
            name: match label {
                Some(l) => format!("G{grade} {l} electives"),
                None => format!("G{grade} electives"),
            },
            grade: grade.clone(),
            is_elective: true,
            band_group: label.clone(),
            linked_periods: 1,
            hours_per_week: hours,
            entries: rows
                .iter()
                .map(|r| BlockEntry {
                    teacher_id: r.teacher_id.clone(),
                    teacher_name: r.name.clone(),
                    subject: r.subject.clone(),
                    classes: r.classes.clone(),
                    hours_per_class: r.weekly_hours,
                })
                .collect(),
        });
    }

    blocks
}

/// Fixed-subject periods already covering a (grade, subject).
fn fixed_coverage(fixed: &[FixedSubject], grade: &str, subject: &str) -> u32 {
    fixed
        .iter()
        .filter(|fs| fs.subject == subject && fs.applies_to(grade))
        .map(|fs| fs.period_count as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_teacher(name: &str, classes: &[&str], hours: u32) -> TeacherRow {
        TeacherRow::new(name, "Math", "1")
            .with_classes(classes.iter().map(|c| c.to_string()).collect())
            .with_weekly_hours(hours)
    }

    #[test]
    fn test_regular_split_per_class() {
        let teachers = vec![math_teacher("Kim", &["1", "2", "3"], 4)];
        let subjects = vec![SubjectInfo::regular("1", "Math")];
        let blocks = build_blocks(&teachers, &subjects, &[]);

        assert_eq!(blocks.len(), 3);
        for (i, b) in blocks.iter().enumerate() {
            assert!(!b.is_elective);
            assert_eq!(b.hours_per_week, 4);
            assert_eq!(b.entries.len(), 1);
            assert_eq!(b.entries[0].classes, vec![(i + 1).to_string()]);
        }
    }

    #[test]
    fn test_unlisted_subject_defaults_to_regular() {
        let teachers = vec![math_teacher("Kim", &["1"], 4)];
        let blocks = build_blocks(&teachers, &[], &[]);
        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].is_elective);
    }

    #[test]
    fn test_fixed_subject_nets_hours() {
        let teachers = vec![math_teacher("Kim", &["1"], 4)];
        let subjects = vec![SubjectInfo::regular("1", "Math")];
        let fixed = vec![FixedSubject::new("1", 0, 1, "Math")];
        let blocks = build_blocks(&teachers, &subjects, &fixed);
        assert_eq!(blocks[0].hours_per_week, 3);
    }

    #[test]
    fn test_fully_fixed_subject_skipped() {
        let teachers = vec![math_teacher("Kim", &["1"], 2)];
        let subjects = vec![SubjectInfo::regular("1", "Math")];
        let fixed = vec![FixedSubject::new("1", 0, 1, "Math").with_period_count(2)];
        let blocks = build_blocks(&teachers, &subjects, &fixed);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_elective_bucket_per_band_group() {
        let mut teachers = vec![
            TeacherRow::new("Kim", "Physics", "1")
                .with_classes(vec!["1".into()])
                .with_weekly_hours(3),
            TeacherRow::new("Lee", "Chemistry", "1")
                .with_classes(vec!["2".into()])
                .with_weekly_hours(3),
            TeacherRow::new("Park", "Ethics", "1")
                .with_classes(vec!["1".into()])
                .with_weekly_hours(3),
        ];
        // Two home classes in the grade.
        teachers.push(math_teacher("Choi", &["1", "2"], 4));
        let subjects = vec![
            SubjectInfo::regular("1", "Math"),
            SubjectInfo::elective("1", "Physics").with_band_group("science"),
            SubjectInfo::elective("1", "Chemistry").with_band_group("science"),
            SubjectInfo::elective("1", "Ethics"),
        ];

        let blocks = build_blocks(&teachers, &subjects, &[]);
        let electives: Vec<&Block> = blocks.iter().filter(|b| b.is_elective).collect();
        assert_eq!(electives.len(), 2);

        let science = electives
            .iter()
            .find(|b| b.band_group.as_deref() == Some("science"))
            .unwrap();
        assert_eq!(science.entries.len(), 2);
        // 2 subjects / 2 home classes → 1 rotation × 3 hours.
        assert_eq!(science.hours_per_week, 3);

        let unlabeled = electives.iter().find(|b| b.band_group.is_none()).unwrap();
        assert_eq!(unlabeled.entries.len(), 1);
        // 1 subject / 2 classes rounds to 1 rotation.
        assert_eq!(unlabeled.hours_per_week, 3);
    }

    #[test]
    fn test_elective_fixed_overlap() {
        let teachers = vec![
            TeacherRow::new("Kim", "Physics", "1")
                .with_classes(vec!["1".into()])
                .with_weekly_hours(3),
            math_teacher("Choi", &["1"], 4),
        ];
        let subjects = vec![
            SubjectInfo::regular("1", "Math"),
            SubjectInfo::elective("1", "Physics").with_band_group("science"),
        ];
        let fixed = vec![FixedSubject::new("1", 4, 6, "Physics")];
        let blocks = build_blocks(&teachers, &subjects, &fixed);
        let science = blocks.iter().find(|b| b.is_elective).unwrap();
        assert_eq!(science.hours_per_week, 2);
    }

    #[test]
    fn test_rows_without_grade_or_subject_skipped() {
        let mut row = math_teacher("Kim", &["1"], 4);
        row.grade = String::new();
        let blocks = build_blocks(&[row], &[], &[]);
        assert!(blocks.is_empty());
    }
}
