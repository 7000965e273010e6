// ==========================================
// Customer Visit Planner - Roster Pass
// ==========================================
// Sheet: name starts with "Get Data -", headers on row 1, one customer
// per row from row 2. Populates territory, group/IWS metadata and the
// old-system cross-reference fields.
// ==========================================

use tracing::info;

use crate::domain::planner::CustomerFields;
use crate::domain::report::ImportSummary;
use crate::domain::types::IssueLevel;
use crate::importer::cell::{clean_code, clean_text};
use crate::importer::duplicates::DuplicateTracker;
use crate::importer::error::ImportResult;
use crate::importer::header::{FieldSpec, HeaderMap};
use crate::importer::upsert::{resolve_territory, upsert_customer, TerritoryCache};
use crate::importer::workbook::PlannerWorkbook;
use crate::repository::planner_store::PlannerStore;

const SHEET_PREFIX: &str = "Get Data -";
const HEADER_ROW: u32 = 0;
const FIRST_DATA_ROW: u32 = 1;

const FIELDS: [FieldSpec; 8] = [
    FieldSpec { key: "territory", labels: &["TERRITORY"], fallback: 0 },
    FieldSpec { key: "group", labels: &["GROUP", "GROUP NAME"], fallback: 1 },
    FieldSpec { key: "group_2_iws", labels: &["GROUP 2 IWS", "GROUP 2"], fallback: 2 },
    FieldSpec { key: "iws_code", labels: &["IWS CODE", "IWS"], fallback: 3 },
    FieldSpec { key: "code", labels: &["CUST CODE", "CUSTOMER CODE", "CODE"], fallback: 4 },
    FieldSpec { key: "name", labels: &["CUSTOMER NAME", "NAME"], fallback: 5 },
    FieldSpec { key: "old_value", labels: &["OLD VALUE"], fallback: 6 },
    FieldSpec { key: "old_name", labels: &["OLD NAME"], fallback: 7 },
];

pub(crate) fn run(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    territories: &mut TerritoryCache,
    workbook: &PlannerWorkbook,
) -> ImportResult<()> {
    let sheet = match workbook.sheet_by_prefix(SHEET_PREFIX) {
        Some(sheet) => sheet,
        None => {
            summary.add_sheet_warning("Get Data sheet not found; skipped customer master import.");
            return Ok(());
        }
    };

    let columns = HeaderMap::resolve(sheet.row(HEADER_ROW), &FIELDS);
    let mut seen_customers = DuplicateTracker::new("customer");
    let last_row = match sheet.last_row() {
        Some(last) => last,
        None => return Ok(()),
    };

    let mut rows_processed = 0u32;
    for row in FIRST_DATA_ROW..=last_row {
        let display_row = row + 1;

        let cust_code = clean_code(sheet.cell(row, columns.col("code") as u32));
        let customer_name = clean_text(sheet.cell(row, columns.col("name") as u32));

        // Blank padding rows go silently; a populated row without a code
        // is a data error.
        if cust_code.is_empty() && customer_name.is_empty() && !sheet.row_is_populated(row) {
            continue;
        }
        if cust_code.is_empty() {
            summary.record_issue(
                IssueLevel::Error,
                sheet.name(),
                Some(display_row),
                "Skipped row: missing customer code.",
            );
            continue;
        }
        if customer_name.is_empty() {
            let level = summary.validation_level();
            summary.record_issue(
                level,
                sheet.name(),
                Some(display_row),
                format!(
                    "Customer '{}' has no customer name; placeholder name may be used.",
                    cust_code
                ),
            );
        }

        if !seen_customers.admit(summary, &cust_code, sheet.name(), display_row) {
            continue;
        }

        let territory_name = clean_text(sheet.cell(row, columns.col("territory") as u32));
        let territory_id = resolve_territory(store, territories, summary, &territory_name)?;

        let fields = CustomerFields {
            cust_code,
            name: customer_name,
            territory_id,
            group_name: clean_text(sheet.cell(row, columns.col("group") as u32)),
            group_2_iws: clean_text(sheet.cell(row, columns.col("group_2_iws") as u32)),
            iws_code: clean_text(sheet.cell(row, columns.col("iws_code") as u32)),
            old_value: clean_text(sheet.cell(row, columns.col("old_value") as u32)),
            old_name: clean_text(sheet.cell(row, columns.col("old_name") as u32)),
            ..CustomerFields::default()
        };
        upsert_customer(store, summary, &fields)?;
        rows_processed += 1;
    }

    info!(sheet = sheet.name(), rows = rows_processed, "roster pass complete");
    Ok(())
}
