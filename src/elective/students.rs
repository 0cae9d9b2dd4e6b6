//! Student Group Assigner: seeded shuffle plus backtracking.
//!
//! # Algorithm
//!
//! Students are processed in a seeded-shuffle order so no home class is
//! systematically favored. For each student the chosen subjects are
//! restricted to subjects that actually have banded groups, then an
//! exhaustive backtracking search picks one group per subject such that
//! no two picks share a band. Candidates are tried in ascending current
//! enrollment, which balances group sizes as assignments accumulate. A
//! student whose search exhausts is recorded as failed; nothing partial
//! is committed.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{ElectiveGroup, ElectiveStudent, GroupId};

/// How many failed students the report keeps in full.
const FAILED_DETAIL_CAP: usize = 10;

/// A student the backtracking search could not place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedStudent {
    /// Student identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Home class number.
    pub class_no: String,
    /// The subjects that could not be satisfied together.
    pub unmet: Vec<String>,
}

/// Aggregate result of the student assignment phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentAssignment {
    /// Students fully assigned.
    pub success: u32,
    /// Students the search exhausted on.
    pub fail: u32,
    /// Detail rows for failed students, capped at 10.
    pub failed: Vec<FailedStudent>,
}

/// Assigns every student to one group per chosen subject, in place.
///
/// Enrolls successful students into `groups` and fills their `group_map`.
/// The same seed over the same input reproduces the same assignment.
pub fn assign_students(
    students: &mut [ElectiveStudent],
    groups: &mut [ElectiveGroup],
    seed: u64,
) -> StudentAssignment {
    let available: HashSet<&str> = groups
        .iter()
        .filter(|g| g.band.is_some())
        .map(|g| g.subject.as_str())
        .collect();
    let available: HashSet<String> = available.into_iter().map(str::to_string).collect();

    let mut order: Vec<usize> = (0..students.len()).collect();
    order.shuffle(&mut SmallRng::seed_from_u64(seed));

    let mut result = StudentAssignment::default();

    for si in order {
        let wanted: Vec<String> = students[si]
            .electives
            .iter()
            .filter(|s| available.contains(*s))
            .cloned()
            .collect();
        if wanted.is_empty() {
            result.success += 1;
            continue;
        }

        let mut chosen: Vec<usize> = Vec::with_capacity(wanted.len());
        if solve(&wanted, 0, groups, &mut HashSet::new(), &mut chosen) {
            let student = &mut students[si];
            for (&gi, subject) in chosen.iter().zip(&wanted) {
                groups[gi].students.push(student.id.clone());
                student.group_map.insert(subject.clone(), groups[gi].id);
            }
            result.success += 1;
        } else {
            result.fail += 1;
            if result.failed.len() < FAILED_DETAIL_CAP {
                let student = &students[si];
                result.failed.push(FailedStudent {
                    id: student.id.clone(),
                    name: student.name.clone(),
                    class_no: student.class_no.clone(),
                    unmet: wanted,
                });
            }
        }
    }

    result
}

/// Depth-first search over group choices for `wanted[depth..]`.
///
/// `used_bands` holds the bands of confirmed earlier picks; candidates on
/// those bands are pruned. Returns true with `chosen` filled on success.
fn solve(
    wanted: &[String],
    depth: usize,
    groups: &[ElectiveGroup],
    used_bands: &mut HashSet<char>,
    chosen: &mut Vec<usize>,
) -> bool {
    if depth == wanted.len() {
        return true;
    }
    let subject = &wanted[depth];

    let mut candidates: Vec<usize> = groups
        .iter()
        .enumerate()
        .filter(|(_, g)| {
            g.subject == *subject && g.band.is_some_and(|b| !used_bands.contains(&b))
        })
        .map(|(i, _)| i)
        .collect();
    candidates.sort_by_key(|&i| (groups[i].students.len(), groups[i].id));

    for gi in candidates {
        let Some(band) = groups[gi].band else { continue };
        used_bands.insert(band);
        chosen.push(gi);
        if solve(wanted, depth + 1, groups, used_bands, chosen) {
            return true;
        }
        chosen.pop();
        used_bands.remove(&band);
    }
    false
}
