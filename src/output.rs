//! External record shapes.
//!
//! Flat serializable rows for the caller to persist: a full timetable
//! replacement set, elective group memberships, band slot rows, and the
//! class-view elective overlay. Builders are pure and return rows in a
//! deterministic sort order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::elective::partition_slots;
use crate::models::{Cell, ElectiveGroup, ElectiveStudent, GroupId, Timetable};

/// Subject shown in overlay rows for classes with no elective plurality.
const OVERLAY_PLACEHOLDER: &str = "Self-study";

/// One timetable cell as a flat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRecord {
    /// Grade label.
    pub grade: String,
    /// Class number within the grade.
    pub class_no: String,
    /// Weekday index, 0-based.
    pub day: u8,
    /// Period, 1-based.
    pub period: u8,
    /// Subject taught.
    pub subject: String,
    /// Teacher identifier (may be empty).
    pub teacher_id: String,
    /// Teacher display name.
    pub teacher_name: String,
}

/// One student's membership in one elective group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembershipRecord {
    /// Student identifier.
    pub student_id: String,
    /// Student display name.
    pub student_name: String,
    /// Grade label.
    pub grade: String,
    /// Home class number.
    pub homeroom_class: String,
    /// Student number within the home class.
    pub student_num: String,
    /// Elective subject.
    pub subject: String,
    /// Group number within the subject.
    pub group_no: String,
    /// Assigned band label.
    pub band: char,
    /// Teacher identifier (may be empty).
    pub teacher_id: String,
    /// Teacher display name.
    pub teacher_name: String,
}

/// One band's claim on one elective slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSlotRecord {
    /// Band label.
    pub band: char,
    /// Weekday index, 0-based.
    pub day: u8,
    /// Period, 1-based.
    pub period: u8,
}

/// The elective record sets, built only for a clean assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectiveRecords {
    /// One row per (student, chosen subject).
    pub memberships: Vec<GroupMembershipRecord>,
    /// One row per (band, slot).
    pub band_slots: Vec<BandSlotRecord>,
    /// Class-view overlay rows, one per (home class, elective slot).
    pub overlay: Vec<TimetableRecord>,
}

/// Flattens a timetable into sorted replacement rows.
pub fn timetable_records(timetable: &Timetable) -> Vec<TimetableRecord> {
    let mut rows = Vec::with_capacity(timetable.placement_count());
    for class in timetable.classes() {
        let Some(cells) = timetable.class_cells(class) else {
            continue;
        };
        for (&cell, placement) in cells {
            rows.push(TimetableRecord {
                grade: class.grade.clone(),
                class_no: class.class_no.clone(),
                day: cell.day,
                period: cell.period,
                subject: placement.subject.clone(),
                teacher_id: placement.teacher_id.clone(),
                teacher_name: placement.teacher_name.clone(),
            });
        }
    }
    rows.sort_by(|a, b| {
        (&a.grade, &a.class_no, a.day, a.period).cmp(&(&b.grade, &b.class_no, b.day, b.period))
    });
    rows
}

/// Builds membership rows for every assigned (student, subject) pair.
///
/// Rows follow the student slice order, then the student's declaration
/// order of subjects.
pub fn membership_records(
    students: &[ElectiveStudent],
    groups: &[ElectiveGroup],
    grade: &str,
) -> Vec<GroupMembershipRecord> {
    let by_id: HashMap<GroupId, &ElectiveGroup> = groups.iter().map(|g| (g.id, g)).collect();

    let mut rows = Vec::new();
    for student in students {
        for subject in &student.electives {
            let Some(&gid) = student.group_map.get(subject) else {
                continue;
            };
            let Some(group) = by_id.get(&gid) else {
                continue;
            };
            let Some(band) = group.band else { continue };
            rows.push(GroupMembershipRecord {
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                grade: grade.to_string(),
                homeroom_class: student.class_no.clone(),
                student_num: student.number.clone(),
                subject: subject.clone(),
                group_no: group.group_no.clone(),
                band,
                teacher_id: group.teacher_id.clone(),
                teacher_name: group.teacher_name.clone(),
            });
        }
    }
    rows
}

/// Builds one row per (band, elective slot), in band order.
pub fn band_slot_records(groups: &[ElectiveGroup], slots: &[Cell]) -> Vec<BandSlotRecord> {
    let bands: Vec<char> = groups
        .iter()
        .filter_map(|g| g.band)
        .collect::<std::collections::BTreeSet<char>>()
        .into_iter()
        .collect();

    let mut rows = Vec::new();
    for (band, indices) in partition_slots(&bands, slots.len()) {
        for index in indices {
            let cell = slots[index];
            rows.push(BandSlotRecord {
                band,
                day: cell.day,
                period: cell.period,
            });
        }
    }
    rows
}

/// Class-view overlay: for every home class and elective slot, the subject
/// held by the plurality of that class's students (ties broken by subject
/// name), or a self-study placeholder when none of them meet then.
pub fn elective_overlay(
    students: &[ElectiveStudent],
    groups: &[ElectiveGroup],
    slots: &[Cell],
    grade: &str,
    home_classes: u32,
) -> Vec<TimetableRecord> {
    let by_id: HashMap<GroupId, &ElectiveGroup> = groups.iter().map(|g| (g.id, g)).collect();

    let mut rows = Vec::new();
    for class in 1..=home_classes {
        let class_no = class.to_string();
        for (index, cell) in slots.iter().enumerate() {
            // subject → (attendee count, group) for this class in this slot
            let mut tally: HashMap<&str, (u32, &ElectiveGroup)> = HashMap::new();
            for student in students.iter().filter(|s| s.class_no == class_no) {
                for gid in student.group_map.values() {
                    let Some(group) = by_id.get(gid) else { continue };
                    if group.slots.contains(&index) {
                        tally
                            .entry(group.subject.as_str())
                            .or_insert((0, group))
                            .0 += 1;
                    }
                }
            }

            let winner = tally
                .into_iter()
                .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.0.cmp(a.0)));
            let (subject, teacher_id, teacher_name) = match winner {
                Some((subject, (_, group))) => (
                    subject.to_string(),
                    group.teacher_id.clone(),
                    group.teacher_name.clone(),
                ),
                None => (OVERLAY_PLACEHOLDER.to_string(), String::new(), String::new()),
            };
            rows.push(TimetableRecord {
                grade: grade.to_string(),
                class_no: class_no.clone(),
                day: cell.day,
                period: cell.period,
                subject,
                teacher_id,
                teacher_name,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassKey, Placement};

    #[test]
    fn test_timetable_records_sorted() {
        let mut tt = Timetable::new();
        tt.set(
            ClassKey::new("1", "2"),
            Cell::new(0, 1),
            Placement::fixed("Assembly", None),
        );
        tt.set(
            ClassKey::new("1", "1"),
            Cell::new(1, 3),
            Placement::fixed("Assembly", None),
        );
        tt.set(
            ClassKey::new("1", "1"),
            Cell::new(0, 2),
            Placement::fixed("Assembly", None),
        );

        let rows = timetable_records(&tt);
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].class_no.as_str(), rows[0].day, rows[0].period), ("1", 0, 2));
        assert_eq!((rows[1].class_no.as_str(), rows[1].day, rows[1].period), ("1", 1, 3));
        assert_eq!(rows[2].class_no.as_str(), "2");
    }

    #[test]
    fn test_membership_rows_follow_declaration_order() {
        let mut g1 = ElectiveGroup::new(1, "Physics", "1", "Kim");
        g1.band = Some('A');
        let mut g2 = ElectiveGroup::new(2, "Ethics", "1", "Lee");
        g2.band = Some('B');
        let mut s = ElectiveStudent::new("s1", "Park", "3").with_number("12");
        s.electives = vec!["Ethics".into(), "Physics".into()];
        s.group_map.insert("Physics".into(), 1);
        s.group_map.insert("Ethics".into(), 2);

        let rows = membership_records(&[s], &[g1, g2], "2");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject, "Ethics");
        assert_eq!(rows[0].band, 'B');
        assert_eq!(rows[1].subject, "Physics");
        assert_eq!(rows[1].grade, "2");
        assert_eq!(rows[1].homeroom_class, "3");
    }

    #[test]
    fn test_band_slot_rows_mirror_partition() {
        let mut g1 = ElectiveGroup::new(1, "Physics", "1", "Kim");
        g1.band = Some('A');
        let mut g2 = ElectiveGroup::new(2, "Ethics", "1", "Lee");
        g2.band = Some('B');
        let slots = vec![Cell::new(0, 6), Cell::new(1, 6), Cell::new(2, 6), Cell::new(3, 6)];

        let rows = band_slot_records(&[g1, g2], &slots);
        assert_eq!(rows.len(), 4);
        assert!(rows[0..2].iter().all(|r| r.band == 'A'));
        assert!(rows[2..4].iter().all(|r| r.band == 'B'));
        assert_eq!((rows[2].day, rows[2].period), (2, 6));
    }

    #[test]
    fn test_overlay_plurality_and_placeholder() {
        let mut physics = ElectiveGroup::new(1, "Physics", "1", "Kim");
        physics.band = Some('A');
        physics.slots = vec![0];
        let mut ethics = ElectiveGroup::new(2, "Ethics", "1", "Lee");
        ethics.band = Some('A');
        ethics.slots = vec![0];

        // Class 1: two Physics students, one Ethics. Class 2: nobody.
        let mut students = Vec::new();
        for (id, gid, subject) in [("s1", 1, "Physics"), ("s2", 1, "Physics"), ("s3", 2, "Ethics")]
        {
            let mut s = ElectiveStudent::new(id, id, "1");
            s.group_map.insert(subject.to_string(), gid);
            students.push(s);
        }
        let slots = vec![Cell::new(4, 6)];

        let rows = elective_overlay(&students, &[physics, ethics], &slots, "1", 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class_no, "1");
        assert_eq!(rows[0].subject, "Physics");
        assert_eq!(rows[0].teacher_name, "Kim");
        assert_eq!(rows[1].class_no, "2");
        assert_eq!(rows[1].subject, OVERLAY_PLACEHOLDER);
        assert!(rows[1].teacher_name.is_empty());
    }
}
