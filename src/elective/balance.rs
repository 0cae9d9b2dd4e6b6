//! Band balance pre-validation.
//!
//! Banding splits a grade's home classes evenly across band labels, so
//! every declared band-group needs a teaching-group count divisible by the
//! grade's home-class count. The check runs before any assignment phase
//! mutates state; a violation halts the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::models::ElectiveGroup;

/// A band-group whose teaching-group count does not divide evenly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandBalanceError {
    /// Declared band-group label.
    pub band_group: String,
    /// Teaching groups counted under the label.
    pub total_groups: u32,
    /// Home classes in the grade.
    pub home_classes: u32,
    /// `total_groups % home_classes`.
    pub remainder: u32,
    /// The two nearest valid totals.
    pub suggested: [u32; 2],
}

impl fmt::Display for BandBalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "band-group '{}' has {} groups for {} classes (remainder {}); nearest valid totals: {} or {}",
            self.band_group,
            self.total_groups,
            self.home_classes,
            self.remainder,
            self.suggested[0],
            self.suggested[1],
        )
    }
}

/// Checks every declared band-group for even divisibility.
///
/// `band_groups` maps elective subject to its declared band-group label;
/// subjects without an entry are unlabeled and exempt from the check.
/// Returns every violation, in label order.
pub fn validate_band_balance(
    groups: &[ElectiveGroup],
    band_groups: &HashMap<String, String>,
    home_classes: u32,
) -> Result<(), Vec<BandBalanceError>> {
    let home_classes = home_classes.max(1);

    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for group in groups {
        if let Some(label) = band_groups.get(&group.subject) {
            *totals.entry(label.as_str()).or_insert(0) += 1;
        }
    }

    let mut errors = Vec::new();
    for (label, total) in totals {
        let remainder = total % home_classes;
        if remainder == 0 {
            continue;
        }
        let lower = total - remainder;
        let suggested = if lower == 0 {
            [home_classes, home_classes * 2]
        } else {
            [lower, lower + home_classes]
        };
        errors.push(BandBalanceError {
            band_group: label.to_string(),
            total_groups: total,
            home_classes,
            remainder,
            suggested,
        });
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

    fn groups_for(subject: &str, count: u32) -> Vec<ElectiveGroup> {
        (0..count)
            .map(|i| ElectiveGroup::new(i, subject, (i + 1).to_string(), format!("T{i}")))
            .collect()
    }

    fn science_label() -> HashMap<String, String> {
        HashMap::from([("Physics".to_string(), "science".to_string())])
    }

    #[test]
    fn test_divisible_passes() {
        let groups = groups_for("Physics", 20);
        assert!(validate_band_balance(&groups, &science_label(), 10).is_ok());
    }

    #[test]
    fn test_remainder_reported_with_suggestions() {
        let groups = groups_for("Physics", 11);
        let errors = validate_band_balance(&groups, &science_label(), 10).unwrap_err();
        assert_eq!(errors.len(), 1);
        let e = &errors[0];
        assert_eq!(e.band_group, "science");
        assert_eq!(e.total_groups, 11);
        assert_eq!(e.remainder, 1);
        assert_eq!(e.suggested, [10, 20]);
    }

    #[test]
    fn test_fewer_groups_than_classes() {
        let groups = groups_for("Physics", 3);
        let errors = validate_band_balance(&groups, &science_label(), 10).unwrap_err();
        assert_eq!(errors[0].suggested, [10, 20]);
    }

    #[test]
    fn test_unlabeled_subjects_exempt() {
        // 7 Ethics groups carry no band-group label.
        let mut groups = groups_for("Physics", 10);
        groups.extend(groups_for("Ethics", 7));
        assert!(validate_band_balance(&groups, &science_label(), 10).is_ok());
    }

    #[test]
    fn test_display_names_valid_totals() {
        let groups = groups_for("Physics", 11);
        let errors = validate_band_balance(&groups, &science_label(), 10).unwrap_err();
        let msg = errors[0].to_string();
        assert!(msg.contains("science"));
        assert!(msg.contains("10 or 20"));
    }
}
