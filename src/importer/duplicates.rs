// ==========================================
// Customer Visit Planner - Duplicate Arbiter
// ==========================================
// Responsibility: decide, per run-wide policy, whether a repeated
// natural key within one sheet pass is accepted, skipped, or fatal to
// apply. Each pass owns its own tracker; key spaces are deliberately
// not shared across passes.
// ==========================================

use std::collections::HashMap;

use crate::domain::report::ImportSummary;
use crate::domain::types::{DuplicatePolicy, IssueLevel};

/// Blocker recorded when any duplicate is hit under the error policy.
pub const DUPLICATE_ERROR_BLOCKER: &str =
    "Duplicate key errors were found with duplicate policy set to 'error'.";

pub struct DuplicateTracker {
    label: &'static str,
    first_seen: HashMap<String, u32>,
}

impl DuplicateTracker {
    /// `label` names the key kind in issue messages ("customer", "store").
    pub fn new(label: &'static str) -> Self {
        DuplicateTracker {
            label,
            first_seen: HashMap::new(),
        }
    }

    /// Register a key occurrence. Returns true when the row should be
    /// processed, false when the row must be skipped.
    pub fn admit(&mut self, summary: &mut ImportSummary, key: &str, sheet: &str, row: u32) -> bool {
        let first_row = match self.first_seen.get(key) {
            None => {
                self.first_seen.insert(key.to_string(), row);
                return true;
            }
            Some(first) => *first,
        };

        let base = format!(
            "Duplicate {} key '{}' (first seen at row {}).",
            self.label, key, first_row
        );

        match summary.duplicate_policy {
            DuplicatePolicy::LastWins => {
                summary.record_issue(
                    IssueLevel::Warning,
                    sheet,
                    Some(row),
                    format!("{base} Last row wins."),
                );
                true
            }
            DuplicatePolicy::FirstWins => {
                summary.duplicate_rows_skipped += 1;
                summary.record_issue(
                    IssueLevel::Warning,
                    sheet,
                    Some(row),
                    format!("{base} Row skipped (first row kept)."),
                );
                false
            }
            DuplicatePolicy::Error => {
                summary.duplicate_rows_skipped += 1;
                summary.record_issue(
                    IssueLevel::Error,
                    sheet,
                    Some(row),
                    format!("{base} Row skipped (duplicate policy = error)."),
                );
                summary.add_blocker(DUPLICATE_ERROR_BLOCKER);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{UpsertPolicy, ValidationMode};

    fn summary(policy: DuplicatePolicy) -> ImportSummary {
        ImportSummary::new(
            "planner.xlsx",
            UpsertPolicy::Merge,
            ValidationMode::Standard,
            policy,
            false,
        )
    }

    #[test]
    fn test_first_occurrence_always_admitted() {
        let mut s = summary(DuplicatePolicy::Error);
        let mut tracker = DuplicateTracker::new("customer");

        assert!(tracker.admit(&mut s, "C100", "CVM", 4));
        assert_eq!(s.warning_count + s.error_count, 0);
    }

    #[test]
    fn test_last_wins_warns_and_accepts() {
        let mut s = summary(DuplicatePolicy::LastWins);
        let mut tracker = DuplicateTracker::new("customer");

        tracker.admit(&mut s, "C100", "CVM", 4);
        assert!(tracker.admit(&mut s, "C100", "CVM", 9));

        assert_eq!(s.warning_count, 1);
        assert_eq!(s.duplicate_rows_skipped, 0);
        assert!(s.row_issues[0].message.contains("first seen at row 4"));
        assert!(s.row_issues[0].message.contains("Last row wins"));
    }

    #[test]
    fn test_first_wins_warns_and_skips() {
        let mut s = summary(DuplicatePolicy::FirstWins);
        let mut tracker = DuplicateTracker::new("customer");

        tracker.admit(&mut s, "C100", "CVM", 4);
        assert!(!tracker.admit(&mut s, "C100", "CVM", 9));

        assert_eq!(s.warning_count, 1);
        assert_eq!(s.duplicate_rows_skipped, 1);
        assert!(s.blockers.is_empty());
    }

    #[test]
    fn test_error_policy_skips_and_blocks() {
        let mut s = summary(DuplicatePolicy::Error);
        let mut tracker = DuplicateTracker::new("customer");

        tracker.admit(&mut s, "C100", "CVM", 4);
        assert!(!tracker.admit(&mut s, "C100", "CVM", 9));
        tracker.admit(&mut s, "C200", "CVM", 10);
        assert!(!tracker.admit(&mut s, "C200", "CVM", 11));

        assert_eq!(s.error_count, 2);
        assert_eq!(s.duplicate_rows_skipped, 2);
        // the blocker is recorded once no matter how many duplicates
        assert_eq!(s.blockers, vec![DUPLICATE_ERROR_BLOCKER.to_string()]);

        s.finalize();
        assert!(!s.can_apply);
    }

    #[test]
    fn test_key_spaces_are_independent_per_tracker() {
        let mut s = summary(DuplicatePolicy::Error);
        let mut roster = DuplicateTracker::new("customer");
        let mut plan = DuplicateTracker::new("customer");

        assert!(roster.admit(&mut s, "C100", "Get Data - Customers", 2));
        // same key in a different pass is not a duplicate
        assert!(plan.admit(&mut s, "C100", "CVM", 4));
        assert!(s.blockers.is_empty());
    }
}
