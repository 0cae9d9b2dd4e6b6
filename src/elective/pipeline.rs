//! Elective pipeline orchestration.
//!
//! Chains balance validation, band assignment, student assignment, slot
//! assignment, and conflict auditing over one grade's input. Degenerate
//! input (no groups, no students, no slots) skips with a reason; a band
//! balance violation halts before any phase mutates state. Persistence
//! records are built only for a clean run: zero assignment failures and
//! zero student slot conflicts. Teacher slot conflicts warn but do not
//! block.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Cell, ElectiveGroup, ElectiveStudent, GroupId};
use crate::output::{band_slot_records, elective_overlay, membership_records, ElectiveRecords};

use super::{
    assign_bands, assign_slots, assign_students, validate_band_balance, validate_conflicts,
    BandBalanceError, ConflictReport, StudentAssignment,
};

/// One grade's input to the elective pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectiveInput {
    /// Grade label.
    pub grade: String,
    /// Teaching groups, bands and slots unassigned.
    pub groups: Vec<ElectiveGroup>,
    /// Students with their chosen subjects.
    pub students: Vec<ElectiveStudent>,
    /// Reserved elective cells; the index into this list is the slot index.
    pub slots: Vec<Cell>,
    /// Elective subject → declared band-group label.
    pub band_groups: HashMap<String, String>,
    /// Home classes in the grade.
    pub home_classes: u32,
    /// Shuffle seed for the student assigner.
    pub seed: u64,
}

impl ElectiveInput {
    /// Creates an input for one grade with the default seed.
    pub fn new(grade: impl Into<String>, home_classes: u32) -> Self {
        Self {
            grade: grade.into(),
            home_classes,
            seed: 42,
            ..Self::default()
        }
    }

    /// Sets the teaching groups.
    pub fn with_groups(mut self, groups: Vec<ElectiveGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Sets the students.
    pub fn with_students(mut self, students: Vec<ElectiveStudent>) -> Self {
        self.students = students;
        self
    }

    /// Sets the reserved elective cells.
    pub fn with_slots(mut self, slots: Vec<Cell>) -> Self {
        self.slots = slots;
        self
    }

    /// Sets the subject → band-group map.
    pub fn with_band_groups(mut self, band_groups: HashMap<String, String>) -> Self {
        self.band_groups = band_groups;
        self
    }

    /// Sets the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Per-group summary after assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStat {
    /// Group identifier.
    pub id: GroupId,
    /// Elective subject.
    pub subject: String,
    /// Group number within the subject.
    pub group_no: String,
    /// Assigned band label.
    pub band: Option<char>,
    /// Enrolled student count.
    pub size: u32,
}

/// The full result of a completed pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectiveResult {
    /// Groups with bands, students, and slots assigned.
    pub groups: Vec<ElectiveGroup>,
    /// Students with their group maps filled.
    pub students: Vec<ElectiveStudent>,
    /// Student assignment statistics.
    pub assignment: StudentAssignment,
    /// Residual slot conflicts.
    pub conflicts: ConflictReport,
    /// Per-group summaries, in group order.
    pub group_stats: Vec<GroupStat>,
    /// Persistence records; `None` when failures or student conflicts
    /// remain.
    pub records: Option<ElectiveRecords>,
}

/// Pipeline outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElectiveOutcome {
    /// Nothing to do.
    Skipped {
        /// Which precondition was empty.
        reason: String,
    },
    /// Band balance violated; no state was mutated.
    Unbalanced {
        /// One error per uneven band-group.
        errors: Vec<BandBalanceError>,
    },
    /// All phases ran.
    Assigned(Box<ElectiveResult>),
}

/// Runs the elective phases over one grade.
#[derive(Debug, Clone)]
pub struct ElectivePipeline {
    input: ElectiveInput,
}

impl ElectivePipeline {
    /// Creates a pipeline over one grade's input.
    pub fn new(input: ElectiveInput) -> Self {
        Self { input }
    }

    /// Runs balance → bands → students → slots → conflict audit.
    pub fn run(self) -> ElectiveOutcome {
        let ElectiveInput {
            grade,
            mut groups,
            mut students,
            slots,
            band_groups,
            home_classes,
            seed,
        } = self.input;

        if groups.is_empty() {
            return ElectiveOutcome::skipped("no elective groups");
        }
        if students.is_empty() {
            return ElectiveOutcome::skipped("no students");
        }
        if slots.is_empty() {
            return ElectiveOutcome::skipped("no elective slots");
        }

        if let Err(errors) = validate_band_balance(&groups, &band_groups, home_classes) {
            return ElectiveOutcome::Unbalanced { errors };
        }

        assign_bands(&mut groups, &band_groups, home_classes);
        let assignment = assign_students(&mut students, &mut groups, seed);
        assign_slots(&mut groups, slots.len());
        let conflicts = validate_conflicts(&students, &groups);

        let group_stats = groups
            .iter()
            .map(|g| GroupStat {
                id: g.id,
                subject: g.subject.clone(),
                group_no: g.group_no.clone(),
                band: g.band,
                size: g.students.len() as u32,
            })
            .collect();

        let records = if assignment.fail == 0 && !conflicts.blocks_persistence() {
            Some(ElectiveRecords {
                memberships: membership_records(&students, &groups, &grade),
                band_slots: band_slot_records(&groups, &slots),
                overlay: elective_overlay(&students, &groups, &slots, &grade, home_classes),
            })
        } else {
            None
        };

        ElectiveOutcome::Assigned(Box::new(ElectiveResult {
            groups,
            students,
            assignment,
            conflicts,
            group_stats,
            records,
        }))
    }
}

impl ElectiveOutcome {
    fn skipped(reason: &str) -> Self {
        Self::Skipped {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: GroupId, subject: &str, teacher: &str) -> ElectiveGroup {
        ElectiveGroup::new(id, subject, (id + 1).to_string(), teacher)
    }

    fn student(id: &str, class_no: &str, electives: &[&str]) -> ElectiveStudent {
        ElectiveStudent::new(id, id, class_no)
            .with_electives(electives.iter().map(|s| s.to_string()).collect())
    }

    fn week_slots(count: u8) -> Vec<Cell> {
        (0..count).map(|i| Cell::new(i % 5, 6 + i / 5)).collect()
    }

    /// 10 home classes, 2 subjects, 5 groups each: one band, clean run.
    fn balanced_input() -> ElectiveInput {
        let mut groups = Vec::new();
        for (subject, teachers) in [
            ("Physics", ["P1", "P2", "P3", "P4", "P5"]),
            ("Ethics", ["E1", "E2", "E3", "E4", "E5"]),
        ] {
            for t in teachers {
                groups.push(group(groups.len() as u32 + 1, subject, t).with_hours(3));
            }
        }
        let students: Vec<ElectiveStudent> = (0..40)
            .map(|i| {
                let class_no = (i % 10 + 1).to_string();
                let subject = if i % 2 == 0 { "Physics" } else { "Ethics" };
                student(&format!("s{i}"), &class_no, &[subject])
            })
            .collect();
        let band_groups = HashMap::from([
            ("Physics".to_string(), "science".to_string()),
            ("Ethics".to_string(), "science".to_string()),
        ]);
        ElectiveInput::new("2", 10)
            .with_groups(groups)
            .with_students(students)
            .with_slots(week_slots(3))
            .with_band_groups(band_groups)
    }

    #[test]
    fn test_empty_groups_skip() {
        let input = ElectiveInput::new("1", 10).with_students(vec![student("s1", "1", &[])]);
        match ElectivePipeline::new(input).run() {
            ElectiveOutcome::Skipped { reason } => assert!(reason.contains("groups")),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_slots_skip() {
        let input = ElectiveInput::new("1", 10)
            .with_groups(vec![group(1, "Physics", "Kim")])
            .with_students(vec![student("s1", "1", &["Physics"])]);
        match ElectivePipeline::new(input).run() {
            ElectiveOutcome::Skipped { reason } => assert!(reason.contains("slots")),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_halts_before_mutation() {
        let groups: Vec<ElectiveGroup> = (0..11)
            .map(|i| group(i + 1, "Physics", &format!("T{i}")))
            .collect();
        let input = ElectiveInput::new("1", 10)
            .with_groups(groups)
            .with_students(vec![student("s1", "1", &["Physics"])])
            .with_slots(week_slots(3))
            .with_band_groups(HashMap::from([(
                "Physics".to_string(),
                "science".to_string(),
            )]));

        match ElectivePipeline::new(input).run() {
            ElectiveOutcome::Unbalanced { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].remainder, 1);
                assert_eq!(errors[0].suggested, [10, 20]);
            }
            other => panic!("expected halt, got {other:?}"),
        }
    }

    #[test]
    fn test_balanced_scenario_assigns_one_band() {
        let ElectiveOutcome::Assigned(result) = ElectivePipeline::new(balanced_input()).run()
        else {
            panic!("expected full run");
        };

        assert_eq!(result.assignment.fail, 0);
        assert_eq!(result.assignment.success, 40);
        // 10 groups over 10 classes: a single band.
        assert!(result.groups.iter().all(|g| g.band == Some('A')));
        assert!(result.conflicts.student_conflicts.is_empty());
        assert!(result.records.is_some());

        let records = result.records.as_ref().unwrap();
        assert_eq!(records.memberships.len(), 40);
        assert_eq!(records.band_slots.len(), 3);
        // Overlay covers every (home class, slot) pair.
        assert_eq!(records.overlay.len(), 30);
        assert_eq!(result.group_stats.len(), 10);
        let enrolled: u32 = result.group_stats.iter().map(|s| s.size).sum();
        assert_eq!(enrolled, 40);
    }

    #[test]
    fn test_failed_assignment_blocks_records() {
        // One shared band-group over 4 home classes yields a single band,
        // so a student taking both subjects cannot be placed.
        let input = ElectiveInput::new("1", 4)
            .with_groups(vec![
                group(1, "Physics", "Kim"),
                group(2, "Physics", "Lee"),
                group(3, "Ethics", "Park"),
                group(4, "Ethics", "Choi"),
            ])
            .with_students(vec![student("s1", "1", &["Physics", "Ethics"])])
            .with_slots(week_slots(3))
            .with_band_groups(HashMap::from([
                ("Physics".to_string(), "science".to_string()),
                ("Ethics".to_string(), "science".to_string()),
            ]));

        let ElectiveOutcome::Assigned(result) = ElectivePipeline::new(input).run() else {
            panic!("expected full run");
        };
        assert!(result.groups.iter().all(|g| g.band == Some('A')));
        assert_eq!(result.assignment.fail, 1);
        assert!(result.records.is_none());
    }

    #[test]
    fn test_fixed_seed_pipeline_determinism() {
        let a = ElectivePipeline::new(balanced_input()).run();
        let b = ElectivePipeline::new(balanced_input()).run();
        let (ElectiveOutcome::Assigned(a), ElectiveOutcome::Assigned(b)) = (a, b) else {
            panic!("expected full runs");
        };
        assert_eq!(a.groups, b.groups);
        assert_eq!(a.students, b.students);
        assert_eq!(a.assignment, b.assignment);
    }
}
