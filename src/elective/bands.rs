//! Band Assigner: places teaching groups on band labels.
//!
//! # Algorithm
//!
//! Declared band-groups are handled in label order, each receiving
//! `total ÷ home_classes` (minimum 1) fresh sequential letters from a
//! global cursor starting at 'A'. Within a bucket, groups are sorted by
//! descending same-bucket teacher pressure so the hardest-to-place
//! teachers claim labels first, then scanned with a rotating base offset
//! for even spread: the first label holding no same-teacher group wins,
//! else the label with the fewest same-teacher collisions. Subjects with
//! no declared band-group form a trailing bucket with its own fresh
//! letters; when nothing is declared at all, exactly four labels are
//! allocated.
//!
//! Invariant: two groups of the same teacher never share a label when
//! label count permits; the fewest-collision fallback only engages when a
//! teacher has more groups than the bucket has labels.

use std::collections::{BTreeMap, HashMap};

use crate::models::ElectiveGroup;

const FALLBACK_LABELS: usize = 4;

/// Assigns a band label to every group, in place.
///
/// `band_groups` maps elective subject to its declared band-group label.
/// Call after `validate_band_balance`; the label counts assume even
/// divisibility.
pub fn assign_bands(
    groups: &mut [ElectiveGroup],
    band_groups: &HashMap<String, String>,
    home_classes: u32,
) {
    let home_classes = home_classes.max(1) as usize;

    let mut declared: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut unlabeled: Vec<usize> = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        match band_groups.get(&group.subject) {
            Some(label) => declared.entry(label.as_str()).or_default().push(i),
            None => unlabeled.push(i),
        }
    }

    let mut next_letter = b'A';

    if declared.is_empty() {
        let labels = alloc_labels(&mut next_letter, FALLBACK_LABELS);
        place_bucket(groups, &unlabeled, &labels);
        return;
    }

    let buckets: Vec<Vec<usize>> = declared.into_values().collect();
    for bucket in &buckets {
        let count = (bucket.len() / home_classes).max(1);
        let labels = alloc_labels(&mut next_letter, count);
        place_bucket(groups, bucket, &labels);
    }

    if !unlabeled.is_empty() {
        let count = (unlabeled.len() / home_classes).max(1);
        let labels = alloc_labels(&mut next_letter, count);
        place_bucket(groups, &unlabeled, &labels);
    }
}

fn alloc_labels(next_letter: &mut u8, count: usize) -> Vec<char> {
    let labels = (0..count)
        .map(|k| (*next_letter + k as u8) as char)
        .collect();
    *next_letter += count as u8;
    labels
}

fn place_bucket(groups: &mut [ElectiveGroup], bucket: &[usize], labels: &[char]) {
    let mut pressure: HashMap<&str, u32> = HashMap::new();
    for &i in bucket {
        *pressure.entry(groups[i].teacher_key()).or_insert(0) += 1;
    }
    let pressure: HashMap<String, u32> = pressure
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let mut order: Vec<usize> = bucket.to_vec();
    order.sort_by_key(|&i| std::cmp::Reverse(pressure[groups[i].teacher_key()]));

    // Same-teacher groups already holding each label, within this bucket.
    let mut holders: HashMap<char, HashMap<String, u32>> = HashMap::new();

    for (seq, &gi) in order.iter().enumerate() {
        let teacher = groups[gi].teacher_key().to_string();
        let base = seq % labels.len();

        let mut chosen = None;
        let mut fallback = (u32::MAX, labels[base]);
        for k in 0..labels.len() {
            let label = labels[(base + k) % labels.len()];
            let collisions = holders
                .get(&label)
                .and_then(|m| m.get(&teacher))
                .copied()
                .unwrap_or(0);
            if collisions == 0 {
                chosen = Some(label);
                break;
            }
            if collisions < fallback.0 {
                fallback = (collisions, label);
            }
        }
        let label = chosen.unwrap_or(fallback.1);

        *holders
            .entry(label)
            .or_default()
            .entry(teacher)
            .or_insert(0) += 1;
        groups[gi].band = Some(label);
    }
}
