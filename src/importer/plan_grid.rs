// ==========================================
// Customer Visit Planner - Plan Grid Pass
// ==========================================
// Sheet: "CVM" (exact), header labels on row 3, one customer per row
// from row 4 with twelve planned/completed month pairs. Also carries
// trade name, door count, sort bucket and free-text notes.
// ==========================================

use tracing::info;

use crate::domain::planner::CustomerFields;
use crate::domain::report::ImportSummary;
use crate::domain::types::IssueLevel;
use crate::importer::cell::{clean_code, clean_text, to_bool, to_date_with_issue, to_int};
use crate::importer::duplicates::DuplicateTracker;
use crate::importer::error::ImportResult;
use crate::importer::header::{resolve_month_columns, FieldSpec, HeaderMap, MONTH_SHORT};
use crate::importer::upsert::{
    apply_month_entry, resolve_territory, upsert_customer, TerritoryCache,
};
use crate::importer::workbook::PlannerWorkbook;
use crate::repository::planner_store::PlannerStore;

const SHEET_NAME: &str = "CVM";
const HEADER_ROW: u32 = 2;
const FIRST_DATA_ROW: u32 = 3;

const FIELDS: [FieldSpec; 7] = [
    FieldSpec { key: "territory", labels: &["TERRITORY"], fallback: 1 },
    FieldSpec { key: "code", labels: &["CUST CODE", "CUSTOMER CODE", "CODE"], fallback: 2 },
    FieldSpec { key: "sort_bucket", labels: &["SORT", "SORT BUCKET"], fallback: 3 },
    FieldSpec { key: "name", labels: &["CUSTOMER NAME", "CUSTOMER", "NAME"], fallback: 4 },
    FieldSpec { key: "trade_name", labels: &["TRADE NAME", "TRADING NAME"], fallback: 5 },
    FieldSpec { key: "notes", labels: &["NOTES", "CVM NOTES"], fallback: 6 },
    FieldSpec { key: "door_count", labels: &["DOORS", "DOOR COUNT"], fallback: 7 },
];

pub(crate) fn run(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    territories: &mut TerritoryCache,
    workbook: &PlannerWorkbook,
    calendar_year: i32,
) -> ImportResult<()> {
    let sheet = match workbook.sheet_by_exact(SHEET_NAME) {
        Some(sheet) => sheet,
        None => {
            summary.add_sheet_warning("CVM sheet not found; skipped monthly planning import.");
            return Ok(());
        }
    };

    let header = sheet.row(HEADER_ROW);
    let columns = HeaderMap::resolve(header.iter().copied(), &FIELDS);
    let months = resolve_month_columns(header.iter().copied());

    let mut seen_customers = DuplicateTracker::new("customer");
    let last_row = match sheet.last_row() {
        Some(last) => last,
        None => return Ok(()),
    };

    let mut rows_processed = 0u32;
    for row in FIRST_DATA_ROW..=last_row {
        let display_row = row + 1;

        let cust_code = clean_code(sheet.cell(row, columns.col("code") as u32));
        if cust_code.is_empty() {
            if sheet.row_is_populated(row) {
                summary.record_issue(
                    IssueLevel::Error,
                    sheet.name(),
                    Some(display_row),
                    "Skipped row: missing customer code.",
                );
            }
            continue;
        }

        if !seen_customers.admit(summary, &cust_code, sheet.name(), display_row) {
            continue;
        }

        let territory_name = clean_text(sheet.cell(row, columns.col("territory") as u32));
        let territory_id = resolve_territory(store, territories, summary, &territory_name)?;

        let fields = CustomerFields {
            cust_code: cust_code.clone(),
            name: clean_text(sheet.cell(row, columns.col("name") as u32)),
            trade_name: clean_text(sheet.cell(row, columns.col("trade_name") as u32)),
            territory_id,
            door_count: to_int(sheet.cell(row, columns.col("door_count") as u32)),
            cvm_notes: clean_text(sheet.cell(row, columns.col("notes") as u32)),
            ..CustomerFields::default()
        };
        let customer_id = upsert_customer(store, summary, &fields)?;

        // A sort bucket rides along to the customer's first store row;
        // it never creates a store of its own.
        let sort_bucket = clean_text(sheet.cell(row, columns.col("sort_bucket") as u32));
        if !sort_bucket.is_empty() {
            store.set_first_store_sort_bucket(customer_id, &sort_bucket)?;
        }

        for (month_idx, month_cols) in months.iter().enumerate() {
            let month = month_idx as u32 + 1;
            let planned_date = to_date_with_issue(
                sheet.cell(row, month_cols.planned as u32),
                summary,
                sheet.name(),
                display_row,
                &format!("PLANNED {}", MONTH_SHORT[month_idx]),
            );
            let completed = to_bool(sheet.cell(row, month_cols.completed as u32));

            if planned_date.is_none() && !completed {
                continue;
            }
            apply_month_entry(
                store,
                summary,
                sheet.name(),
                display_row,
                customer_id,
                calendar_year,
                month,
                planned_date,
                completed,
            )?;
        }
        rows_processed += 1;
    }

    info!(
        sheet = sheet.name(),
        rows = rows_processed,
        year = calendar_year,
        "plan grid pass complete"
    );
    Ok(())
}
