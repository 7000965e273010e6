// ==========================================
// Customer Visit Planner - Product Interaction Pass
// ==========================================
// Sheet: "Database" (exact), product labels on row 3, field labels on
// row 4, data from row 5. Repeating five-column groups are detected by
// scanning the field-label row for cells starting with ACTION; each
// group is one named product (action, status, next action, last
// contact, notes).
// ==========================================

use tracing::info;

use crate::domain::planner::{CustomerFields, ProductFields};
use crate::domain::report::ImportSummary;
use crate::domain::types::IssueLevel;
use crate::importer::cell::{clean_code, clean_text, to_date_with_issue};
use crate::importer::duplicates::DuplicateTracker;
use crate::importer::error::ImportResult;
use crate::importer::header::{FieldSpec, HeaderMap};
use crate::importer::upsert::{
    resolve_territory, upsert_customer, upsert_product, TerritoryCache,
};
use crate::importer::workbook::{PlannerWorkbook, Sheet};
use crate::repository::planner_store::PlannerStore;

const SHEET_NAME: &str = "Database";
const PRODUCT_LABEL_ROW: u32 = 2;
const FIELD_LABEL_ROW: u32 = 3;
const FIRST_DATA_ROW: u32 = 4;

/// Columns after the ACTION cell needed to complete a group.
const GROUP_TAIL_COLS: u32 = 4;

const FIELDS: [FieldSpec; 5] = [
    FieldSpec { key: "territory", labels: &["TERRITORY"], fallback: 20 },
    FieldSpec { key: "code", labels: &["CUST CODE", "CUSTOMER CODE", "CODE"], fallback: 21 },
    FieldSpec { key: "name", labels: &["CUSTOMER NAME", "NAME"], fallback: 22 },
    FieldSpec { key: "trade_name", labels: &["TRADE NAME", "TRADING NAME"], fallback: 23 },
    FieldSpec { key: "last_visit", labels: &["LAST VISIT"], fallback: 24 },
];

/// Detect the repeating product groups: (action column, product name).
fn detect_product_groups(sheet: &Sheet) -> Vec<(u32, String)> {
    let last_col = match sheet.last_col() {
        Some(last) => last,
        None => return Vec::new(),
    };

    let mut groups = Vec::new();
    for col in 0..=last_col {
        let field_label = clean_text(sheet.cell(FIELD_LABEL_ROW, col)).to_uppercase();
        if field_label.starts_with("ACTION") && col + GROUP_TAIL_COLS <= last_col {
            let label = clean_text(sheet.cell(PRODUCT_LABEL_ROW, col));
            let product_name = if label.is_empty() {
                format!("Product {}", groups.len() + 1)
            } else {
                label
            };
            groups.push((col, product_name));
        }
    }
    groups
}

pub(crate) fn run(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    territories: &mut TerritoryCache,
    workbook: &PlannerWorkbook,
) -> ImportResult<()> {
    let sheet = match workbook.sheet_by_exact(SHEET_NAME) {
        Some(sheet) => sheet,
        None => {
            summary.add_sheet_warning("Database sheet not found; skipped product import.");
            return Ok(());
        }
    };

    let product_groups = detect_product_groups(sheet);
    if product_groups.is_empty() {
        summary.add_sheet_warning("No ACTION product groups found in Database sheet.");
        return Ok(());
    }

    let columns = HeaderMap::resolve(sheet.row(FIELD_LABEL_ROW), &FIELDS);
    let mut seen_customers = DuplicateTracker::new("customer");
    let last_row = match sheet.last_row() {
        Some(last) => last,
        None => return Ok(()),
    };

    let mut rows_processed = 0u32;
    for row in FIRST_DATA_ROW..=last_row {
        let display_row = row + 1;

        let cust_code = clean_code(sheet.cell(row, columns.col("code") as u32));
        let territory_name = clean_text(sheet.cell(row, columns.col("territory") as u32));
        let customer_name = clean_text(sheet.cell(row, columns.col("name") as u32));
        let trade_name = clean_text(sheet.cell(row, columns.col("trade_name") as u32));
        let last_visit = to_date_with_issue(
            sheet.cell(row, columns.col("last_visit") as u32),
            summary,
            sheet.name(),
            display_row,
            "LAST VISIT",
        );

        if cust_code.is_empty() {
            let identifying_data = !territory_name.is_empty()
                || !customer_name.is_empty()
                || !trade_name.is_empty()
                || last_visit.is_some();
            if identifying_data {
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

        let territory_id = resolve_territory(store, territories, summary, &territory_name)?;
        let customer_fields = CustomerFields {
            cust_code: cust_code.clone(),
            name: customer_name,
            trade_name,
            territory_id,
            ..CustomerFields::default()
        };
        let customer_id = upsert_customer(store, summary, &customer_fields)?;

        for (action_col, product_name) in &product_groups {
            let fields = ProductFields {
                product_name: product_name.clone(),
                last_visit,
                action: clean_text(sheet.cell(row, *action_col)),
                status: clean_text(sheet.cell(row, action_col + 1)),
                next_action: clean_text(sheet.cell(row, action_col + 2)),
                last_contact: to_date_with_issue(
                    sheet.cell(row, action_col + 3),
                    summary,
                    sheet.name(),
                    display_row,
                    &format!("{} LAST CONTACT", product_name),
                ),
                notes: clean_text(sheet.cell(row, action_col + 4)),
            };

            if fields.is_blank() {
                continue;
            }
            upsert_product(store, summary, customer_id, &fields)?;
        }
        rows_processed += 1;
    }

    info!(
        sheet = sheet.name(),
        groups = product_groups.len(),
        rows = rows_processed,
        "product interaction pass complete"
    );
    Ok(())
}
