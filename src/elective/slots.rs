//! Slot partitioning and conflict reporting.
//!
//! Elective slot indices are split evenly across the bands in use, with
//! any remainder going to the earliest bands. Within a band, each
//! teacher's groups draw their weekly slots round-robin from the band's
//! share with a per-teacher cursor, so one teacher's groups never draw
//! the same slot twice. Scarcity shorts the draw rather than duplicating.
//!
//! `validate_conflicts` audits the finished assignment: a student whose
//! groups meet in the same slot is a hard conflict (blocks persistence
//! records), a teacher with two groups on one slot is a soft warning.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{ElectiveGroup, ElectiveStudent, GroupId};

/// Splits `slot_count` slot indices across bands, remainder to the
/// earliest bands. Returns `(band, indices)` pairs in band order.
pub fn partition_slots(bands_in_use: &[char], slot_count: usize) -> Vec<(char, Vec<usize>)> {
    if bands_in_use.is_empty() {
        return Vec::new();
    }
    let base = slot_count / bands_in_use.len();
    let remainder = slot_count % bands_in_use.len();

    let mut next = 0usize;
    bands_in_use
        .iter()
        .enumerate()
        .map(|(i, &band)| {
            let share = base + usize::from(i < remainder);
            let indices = (next..next + share).collect();
            next += share;
            (band, indices)
        })
        .collect()
}

/// Draws each group's weekly slots from its band's share, in place.
pub fn assign_slots(groups: &mut [ElectiveGroup], slot_count: usize) {
    let bands: Vec<char> = groups
        .iter()
        .filter_map(|g| g.band)
        .collect::<BTreeSet<char>>()
        .into_iter()
        .collect();
    let shares: HashMap<char, Vec<usize>> =
        partition_slots(&bands, slot_count).into_iter().collect();

    let mut cursor: HashMap<String, usize> = HashMap::new();
    let mut used: HashMap<String, HashSet<usize>> = HashMap::new();

    for group in groups.iter_mut() {
        let Some(band) = group.band else { continue };
        let share = &shares[&band];
        if share.is_empty() {
            group.slots.clear();
            continue;
        }

        let teacher = group.teacher_key().to_string();
        let mut pos = cursor.get(&teacher).copied().unwrap_or(0);
        let taken_before = used.entry(teacher.clone()).or_default();

        let mut drawn = Vec::new();
        let mut scanned = 0;
        while drawn.len() < group.hours as usize && scanned < share.len() {
            let slot = share[pos % share.len()];
            pos += 1;
            scanned += 1;
            if taken_before.insert(slot) {
                drawn.push(slot);
            }
        }
        cursor.insert(teacher, pos % share.len());

        drawn.sort_unstable();
        group.slots = drawn;
    }
}

/// A student whose assigned groups meet in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentConflict {
    /// Student identifier.
    pub student_id: String,
    /// Colliding slot index.
    pub slot: usize,
    /// Subjects meeting in that slot.
    pub subjects: Vec<String>,
}

/// A teacher with two groups meeting in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherConflict {
    /// Teacher key (id, else name).
    pub teacher: String,
    /// Double-booked slot index.
    pub slot: usize,
    /// Group ids meeting in that slot.
    pub groups: Vec<GroupId>,
}

/// Residual conflicts after slot assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Hard conflicts; any entry blocks persistence records.
    pub student_conflicts: Vec<StudentConflict>,
    /// Soft warnings.
    pub teacher_conflicts: Vec<TeacherConflict>,
}

impl ConflictReport {
    /// Whether persistence records may be built.
    pub fn blocks_persistence(&self) -> bool {
        !self.student_conflicts.is_empty()
    }
}

/// Audits the finished assignment for slot collisions.
pub fn validate_conflicts(
    students: &[ElectiveStudent],
    groups: &[ElectiveGroup],
) -> ConflictReport {
    let by_id: HashMap<GroupId, &ElectiveGroup> = groups.iter().map(|g| (g.id, g)).collect();

    let mut report = ConflictReport::default();

    for student in students {
        let mut per_slot: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        let mut subjects: Vec<&String> = student.group_map.keys().collect();
        subjects.sort();
        for subject in subjects {
            let Some(group) = by_id.get(&student.group_map[subject]) else {
                continue;
            };
            for &slot in &group.slots {
                per_slot.entry(slot).or_default().push(subject);
            }
        }
        for (slot, subs) in per_slot {
            if subs.len() > 1 {
                report.student_conflicts.push(StudentConflict {
                    student_id: student.id.clone(),
                    slot,
                    subjects: subs.into_iter().map(str::to_string).collect(),
                });
            }
        }
    }

    let mut teacher_slots: BTreeMap<(String, usize), Vec<GroupId>> = BTreeMap::new();
    for group in groups {
        for &slot in &group.slots {
            teacher_slots
                .entry((group.teacher_key().to_string(), slot))
                .or_default()
                .push(group.id);
        }
    }
    for ((teacher, slot), ids) in teacher_slots {
        if ids.len() > 1 {
            report.teacher_conflicts.push(TeacherConflict {
                teacher,
                slot,
                groups: ids,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: GroupId, subject: &str, teacher: &str, band: char, hours: u32) -> ElectiveGroup {
        let mut g =
            ElectiveGroup::new(id, subject, (id + 1).to_string(), teacher).with_hours(hours);
        g.band = Some(band);
        g
    }

    #[test]
    fn test_partition_even() {
        let parts = partition_slots(&['A', 'B'], 6);
        assert_eq!(parts, vec![('A', vec![0, 1, 2]), ('B', vec![3, 4, 5])]);
    }

    #[test]
    fn test_partition_remainder_to_earliest() {
        let parts = partition_slots(&['A', 'B', 'C'], 7);
        assert_eq!(parts[0], ('A', vec![0, 1, 2]));
        assert_eq!(parts[1], ('B', vec![3, 4]));
        assert_eq!(parts[2], ('C', vec![5, 6]));
    }

    #[test]
    fn test_partition_no_bands() {
        assert!(partition_slots(&[], 6).is_empty());
    }

    #[test]
    fn test_groups_draw_full_hours() {
        let mut groups = vec![
            group(1, "Physics", "Kim", 'A', 3),
            group(2, "Ethics", "Lee", 'B', 3),
        ];
        assign_slots(&mut groups, 6);
        assert_eq!(groups[0].slots, vec![0, 1, 2]);
        assert_eq!(groups[1].slots, vec![3, 4, 5]);
    }

    #[test]
    fn test_same_teacher_groups_draw_disjoint_slots() {
        // Kim runs two 3-hour groups on one band with exactly 6 slots.
        let mut groups = vec![
            group(1, "Physics", "Kim", 'A', 3),
            group(2, "Chemistry", "Kim", 'A', 3),
        ];
        assign_slots(&mut groups, 6);

        let a: HashSet<usize> = groups[0].slots.iter().copied().collect();
        let b: HashSet<usize> = groups[1].slots.iter().copied().collect();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
        assert!(a.is_disjoint(&b));
    }

    #[test]
    fn test_scarcity_shorts_the_draw() {
        // 4 slots on the band, two 3-hour groups by one teacher: the
        // second draw gets only the single leftover slot.
        let mut groups = vec![
            group(1, "Physics", "Kim", 'A', 3),
            group(2, "Chemistry", "Kim", 'A', 3),
        ];
        assign_slots(&mut groups, 4);

        assert_eq!(groups[0].slots.len(), 3);
        assert_eq!(groups[1].slots.len(), 1);
        let a: HashSet<usize> = groups[0].slots.iter().copied().collect();
        assert!(!a.contains(&groups[1].slots[0]));
    }

    #[test]
    fn test_student_conflict_detected() {
        let mut g1 = group(1, "Physics", "Kim", 'A', 2);
        g1.slots = vec![0, 1];
        let mut g2 = group(2, "Ethics", "Lee", 'A', 2);
        g2.slots = vec![1, 2];
        let mut s = ElectiveStudent::new("s1", "s1", "1");
        s.group_map.insert("Physics".into(), 1);
        s.group_map.insert("Ethics".into(), 2);

        let report = validate_conflicts(&[s], &[g1, g2]);
        assert_eq!(report.student_conflicts.len(), 1);
        assert_eq!(report.student_conflicts[0].slot, 1);
        assert_eq!(report.student_conflicts[0].subjects, vec!["Ethics", "Physics"]);
        assert!(report.blocks_persistence());
    }

    #[test]
    fn test_teacher_conflict_is_soft() {
        let mut g1 = group(1, "Physics", "Kim", 'A', 1);
        g1.slots = vec![0];
        let mut g2 = group(2, "Chemistry", "Kim", 'B', 1);
        g2.slots = vec![0];

        let report = validate_conflicts(&[], &[g1, g2]);
        assert!(report.student_conflicts.is_empty());
        assert_eq!(report.teacher_conflicts.len(), 1);
        assert_eq!(report.teacher_conflicts[0].groups, vec![1, 2]);
        assert!(!report.blocks_persistence());
    }

    #[test]
    fn test_disjoint_band_draws_never_conflict() {
        let mut groups = vec![
            group(1, "Physics", "Kim", 'A', 3),
            group(2, "Physics", "Lee", 'B', 3),
            group(3, "Ethics", "Park", 'A', 3),
            group(4, "Ethics", "Choi", 'B', 3),
        ];
        assign_slots(&mut groups, 6);

        let report = validate_conflicts(&[], &groups);
        assert!(report.teacher_conflicts.is_empty());
    }
}
