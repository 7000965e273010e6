// ==========================================
// Customer Visit Planner - Import Report
// ==========================================
// Responsibility: the single accumulating record every sub-operation of
// an import run reports into - counters, row issues, warnings, blockers.
// One summary per run; constructed up front, finalized once, returned to
// the caller, never persisted.
// ==========================================

use crate::domain::types::{DuplicatePolicy, IssueLevel, UpsertPolicy, ValidationMode};
use serde::Serialize;
use uuid::Uuid;

/// Row issues beyond this cap are counted, not stored.
pub const ROW_ISSUE_LIMIT: usize = 300;

// ==========================================
// RowIssue
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RowIssue {
    pub level: IssueLevel,
    pub sheet: String,
    pub row: Option<u32>,
    pub message: String,
}

// ==========================================
// ImportSummary
// ==========================================
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    // ===== Run identity & echoed settings =====
    pub run_id: String,
    pub filename: String,
    pub dry_run: bool,
    pub upsert_policy: UpsertPolicy,
    pub validation_mode: ValidationMode,
    pub duplicate_policy: DuplicatePolicy,
    pub calendar_year: Option<i32>,

    // ===== Per-entity counters =====
    pub territories_created: u32,
    pub customers_created: u32,
    pub customers_updated: u32,
    pub customers_skipped_existing: u32,
    pub stores_created: u32,
    pub stores_updated: u32,
    pub stores_skipped_existing: u32,
    pub products_created: u32,
    pub products_updated: u32,
    pub products_skipped_existing: u32,
    pub cvm_entries_upserted: u32,
    pub cvm_entries_skipped_existing: u32,
    pub cvm_entries_cleared: u32,

    // ===== Findings =====
    pub warnings: Vec<String>,
    pub warning_count: u32,
    pub error_count: u32,
    pub row_issues: Vec<RowIssue>,
    pub row_issue_limit: usize,
    pub row_issues_truncated: u32,
    pub duplicate_rows_skipped: u32,

    // ===== Apply gate =====
    pub blockers: Vec<String>,
    pub can_apply: bool,
}

impl ImportSummary {
    pub fn new(
        filename: &str,
        upsert_policy: UpsertPolicy,
        validation_mode: ValidationMode,
        duplicate_policy: DuplicatePolicy,
        dry_run: bool,
    ) -> Self {
        ImportSummary {
            run_id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            dry_run,
            upsert_policy,
            validation_mode,
            duplicate_policy,
            calendar_year: None,
            territories_created: 0,
            customers_created: 0,
            customers_updated: 0,
            customers_skipped_existing: 0,
            stores_created: 0,
            stores_updated: 0,
            stores_skipped_existing: 0,
            products_created: 0,
            products_updated: 0,
            products_skipped_existing: 0,
            cvm_entries_upserted: 0,
            cvm_entries_skipped_existing: 0,
            cvm_entries_cleared: 0,
            warnings: Vec::new(),
            warning_count: 0,
            error_count: 0,
            row_issues: Vec::new(),
            row_issue_limit: ROW_ISSUE_LIMIT,
            row_issues_truncated: 0,
            duplicate_rows_skipped: 0,
            blockers: Vec::new(),
            can_apply: true,
        }
    }

    /// Record a row-level finding. Issues past the cap are counted but
    /// dropped so the returned summary stays bounded.
    pub fn record_issue(
        &mut self,
        level: IssueLevel,
        sheet: &str,
        row: Option<u32>,
        message: impl Into<String>,
    ) {
        if self.row_issues.len() < self.row_issue_limit {
            self.row_issues.push(RowIssue {
                level,
                sheet: sheet.to_string(),
                row,
                message: message.into(),
            });
        } else {
            self.row_issues_truncated += 1;
        }

        match level {
            IssueLevel::Error => self.error_count += 1,
            IssueLevel::Warning => self.warning_count += 1,
        }
    }

    /// Severity applied to recoverable findings under the current
    /// validation mode.
    pub fn validation_level(&self) -> IssueLevel {
        match self.validation_mode {
            ValidationMode::Strict => IssueLevel::Error,
            ValidationMode::Standard => IssueLevel::Warning,
        }
    }

    /// Record a sheet-level warning (e.g. a missing sheet). These live in
    /// the flat warning list and do not consume the row-issue cap.
    pub fn add_sheet_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
        self.warning_count += 1;
    }

    /// Record a reason the run as a whole must not be applied. Repeated
    /// reasons are stored once.
    pub fn add_blocker(&mut self, message: &str) {
        if !self.blockers.iter().any(|b| b == message) {
            self.blockers.push(message.to_string());
        }
    }

    /// Close the ledger: under strict validation any row error becomes an
    /// aggregate blocker, then the apply gate is derived.
    pub fn finalize(&mut self) {
        if self.validation_mode == ValidationMode::Strict && self.error_count > 0 {
            let message = format!(
                "Strict validation found {} error(s). Resolve errors before applying import.",
                self.error_count
            );
            self.add_blocker(&message);
        }
        self.can_apply = self.blockers.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mode: ValidationMode) -> ImportSummary {
        ImportSummary::new(
            "planner.xlsx",
            UpsertPolicy::Merge,
            mode,
            DuplicatePolicy::LastWins,
            false,
        )
    }

    #[test]
    fn test_record_issue_counts_by_level() {
        let mut s = summary(ValidationMode::Standard);
        s.record_issue(IssueLevel::Warning, "CVM", Some(4), "bad date");
        s.record_issue(IssueLevel::Error, "CVM", Some(5), "missing code");

        assert_eq!(s.warning_count, 1);
        assert_eq!(s.error_count, 1);
        assert_eq!(s.row_issues.len(), 2);
    }

    #[test]
    fn test_issue_cap_truncates_but_keeps_counting() {
        let mut s = summary(ValidationMode::Standard);
        for row in 0..(ROW_ISSUE_LIMIT as u32 + 25) {
            s.record_issue(IssueLevel::Warning, "CVM", Some(row), "bad date");
        }

        assert_eq!(s.row_issues.len(), ROW_ISSUE_LIMIT);
        assert_eq!(s.row_issues_truncated, 25);
        assert_eq!(s.warning_count, ROW_ISSUE_LIMIT as u32 + 25);
    }

    #[test]
    fn test_sheet_warnings_do_not_consume_cap() {
        let mut s = summary(ValidationMode::Standard);
        s.add_sheet_warning("CVM sheet not found; skipped monthly planning import.");

        assert_eq!(s.warnings.len(), 1);
        assert_eq!(s.warning_count, 1);
        assert!(s.row_issues.is_empty());
    }

    #[test]
    fn test_blockers_are_deduplicated() {
        let mut s = summary(ValidationMode::Standard);
        s.add_blocker("Duplicate key errors were found with duplicate policy set to 'error'.");
        s.add_blocker("Duplicate key errors were found with duplicate policy set to 'error'.");

        assert_eq!(s.blockers.len(), 1);
    }

    #[test]
    fn test_finalize_standard_mode_ignores_errors_for_apply() {
        let mut s = summary(ValidationMode::Standard);
        s.record_issue(IssueLevel::Error, "CVM", Some(4), "missing code");
        s.finalize();

        assert!(s.can_apply);
    }

    #[test]
    fn test_finalize_strict_mode_blocks_on_errors() {
        let mut s = summary(ValidationMode::Strict);
        s.record_issue(IssueLevel::Error, "CVM", Some(4), "missing code");
        s.finalize();

        assert!(!s.can_apply);
        assert_eq!(s.blockers.len(), 1);
        assert!(s.blockers[0].contains("Strict validation found 1 error(s)"));
    }

    #[test]
    fn test_validation_level_follows_mode() {
        assert_eq!(
            summary(ValidationMode::Standard).validation_level(),
            IssueLevel::Warning
        );
        assert_eq!(
            summary(ValidationMode::Strict).validation_level(),
            IssueLevel::Error
        );
    }
}
