// ==========================================
// Customer Visit Planner - Workbook Import Orchestrator
// ==========================================
// Responsibility: validate the upload and run parameters, open the
// workbook, run the four sheet passes in their fixed order (later
// passes must see earlier passes' customer writes), resolve the
// reporting year, and return the finalized summary.
//
// Transaction ownership stays with the caller: on dry_run the caller
// discards all writes after inspecting the summary, otherwise it
// commits only when can_apply is true.
// ==========================================

use chrono::Datelike;
use std::str::FromStr;
use tracing::{info, instrument};

use crate::domain::report::ImportSummary;
use crate::domain::types::{DuplicatePolicy, UpsertPolicy, ValidationMode};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::upsert::TerritoryCache;
use crate::importer::workbook::{validate_workbook_filename, PlannerWorkbook, YEAR_MAX, YEAR_MIN};
use crate::importer::{details, plan_grid, products, roster};
use crate::repository::planner_store::PlannerStore;

// ==========================================
// ImportOptions
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub year_override: Option<i32>,
    pub upsert_policy: UpsertPolicy,
    pub validation_mode: ValidationMode,
    pub duplicate_policy: DuplicatePolicy,
    pub dry_run: bool,
}

impl ImportOptions {
    /// Build options from loose request strings. Values are trimmed and
    /// lowercased; blanks resolve to the defaults
    /// (merge / standard / last_wins).
    pub fn from_raw(
        year_override: Option<i32>,
        upsert_policy: &str,
        validation_mode: &str,
        duplicate_policy: &str,
        dry_run: bool,
    ) -> ImportResult<Self> {
        Ok(ImportOptions {
            year_override,
            upsert_policy: parse_setting(upsert_policy)
                .map_err(ImportError::InvalidUpsertPolicy)?,
            validation_mode: parse_setting(validation_mode)
                .map_err(ImportError::InvalidValidationMode)?,
            duplicate_policy: parse_setting(duplicate_policy)
                .map_err(ImportError::InvalidDuplicatePolicy)?,
            dry_run,
        })
    }
}

fn parse_setting<T>(raw: &str) -> Result<T, String>
where
    T: FromStr<Err = String> + Default,
{
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() {
        Ok(T::default())
    } else {
        cleaned.parse().map_err(|_| raw.trim().to_string())
    }
}

// ==========================================
// import_planner_workbook
// ==========================================

/// Run a full workbook import against the caller's store handle.
///
/// # Parameters
/// - store: the relational store, already inside the run's transaction
/// - content: the uploaded workbook bytes
/// - filename: used only for the extension allow-list and the summary
/// - options: run-wide policies, year override and dry-run flag
///
/// # Returns
/// - Ok(ImportSummary): what happened (or would happen); the caller
///   decides commit/rollback from dry_run and can_apply
/// - Err(ImportError): structural failure before/while opening the
///   workbook; nothing row-level was processed
#[instrument(skip(store, content, options))]
pub fn import_planner_workbook(
    store: &dyn PlannerStore,
    content: &[u8],
    filename: &str,
    options: &ImportOptions,
) -> ImportResult<ImportSummary> {
    validate_workbook_filename(filename)?;
    if content.is_empty() {
        return Err(ImportError::EmptyWorkbook);
    }
    if let Some(year) = options.year_override {
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Err(ImportError::YearOverrideOutOfRange(year));
        }
    }

    let workbook = PlannerWorkbook::from_bytes(content)?;

    let mut summary = ImportSummary::new(
        filename,
        options.upsert_policy,
        options.validation_mode,
        options.duplicate_policy,
        options.dry_run,
    );
    let mut territories = TerritoryCache::default();

    info!(
        run_id = %summary.run_id,
        filename,
        policy = %options.upsert_policy,
        validation = %options.validation_mode,
        duplicates = %options.duplicate_policy,
        dry_run = options.dry_run,
        "workbook import started"
    );

    // 1) Roster: customers + territory/group metadata.
    roster::run(store, &mut summary, &mut territories, &workbook)?;

    // 2) Customer details: stores and contact fields.
    details::run(store, &mut summary, &mut territories, &workbook)?;

    // 3) Plan grid: monthly planned/completed pairs, against the
    //    resolved reporting year.
    let calendar_year = match options
        .year_override
        .or_else(|| workbook.resolve_calendar_year())
    {
        Some(year) => year,
        None => {
            let year = chrono::Utc::now().year();
            summary.add_sheet_warning(format!(
                "Calendar year could not be resolved from workbook. Defaulted to {year}."
            ));
            year
        }
    };
    summary.calendar_year = Some(calendar_year);
    plan_grid::run(store, &mut summary, &mut territories, &workbook, calendar_year)?;

    // 4) Product interaction snapshots.
    products::run(store, &mut summary, &mut territories, &workbook)?;

    summary.finalize();

    info!(
        run_id = %summary.run_id,
        customers_created = summary.customers_created,
        customers_updated = summary.customers_updated,
        cvm_entries = summary.cvm_entries_upserted,
        warnings = summary.warning_count,
        errors = summary.error_count,
        can_apply = summary.can_apply,
        "workbook import finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_blank_values_use_defaults() {
        let options = ImportOptions::from_raw(None, "", "  ", "", false).unwrap();
        assert_eq!(options.upsert_policy, UpsertPolicy::Merge);
        assert_eq!(options.validation_mode, ValidationMode::Standard);
        assert_eq!(options.duplicate_policy, DuplicatePolicy::LastWins);
    }

    #[test]
    fn test_from_raw_normalizes_case_and_whitespace() {
        let options =
            ImportOptions::from_raw(Some(2026), " Create_Only ", "STRICT", "First_Wins", true)
                .unwrap();
        assert_eq!(options.upsert_policy, UpsertPolicy::CreateOnly);
        assert_eq!(options.validation_mode, ValidationMode::Strict);
        assert_eq!(options.duplicate_policy, DuplicatePolicy::FirstWins);
    }

    #[test]
    fn test_from_raw_rejects_unknown_values() {
        assert!(matches!(
            ImportOptions::from_raw(None, "replace", "", "", false),
            Err(ImportError::InvalidUpsertPolicy(v)) if v == "replace"
        ));
        assert!(matches!(
            ImportOptions::from_raw(None, "", "lenient", "", false),
            Err(ImportError::InvalidValidationMode(_))
        ));
        assert!(matches!(
            ImportOptions::from_raw(None, "", "", "both", false),
            Err(ImportError::InvalidDuplicatePolicy(_))
        ));
    }
}
