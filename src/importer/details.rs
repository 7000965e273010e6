// ==========================================
// Customer Visit Planner - Detail Pass
// ==========================================
// Sheet: name starts with "Customer Details", headers on row 2, one
// customer per row from row 3 with the store address/contact block.
// The customer code may come from either of two columns; the combo
// column doubles as a "CODE | NAME" source for the display name.
// ==========================================

use tracing::info;

use crate::domain::planner::{CustomerFields, StoreFields};
use crate::domain::report::ImportSummary;
use crate::domain::types::IssueLevel;
use crate::importer::cell::{clean_code, clean_text, extract_name};
use crate::importer::duplicates::DuplicateTracker;
use crate::importer::error::ImportResult;
use crate::importer::header::{FieldSpec, HeaderMap};
use crate::importer::upsert::{resolve_territory, upsert_customer, upsert_store_row, TerritoryCache};
use crate::importer::workbook::{PlannerWorkbook, Sheet};
use crate::repository::planner_store::PlannerStore;

const SHEET_PREFIX: &str = "Customer Details";
const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;

const FIELDS: [FieldSpec; 24] = [
    FieldSpec { key: "code", labels: &["CUST CODE", "CUSTOMER CODE", "CODE"], fallback: 0 },
    FieldSpec { key: "name", labels: &["CUSTOMER NAME", "NAME", "STORE NAME"], fallback: 1 },
    FieldSpec { key: "combo", labels: &["CUSTOMER", "COMBO"], fallback: 2 },
    FieldSpec { key: "territory", labels: &["TERRITORY"], fallback: 3 },
    FieldSpec { key: "address_1", labels: &["ADDRESS 1", "ADDRESS"], fallback: 5 },
    FieldSpec { key: "address_2", labels: &["ADDRESS 2"], fallback: 6 },
    FieldSpec { key: "city", labels: &["CITY", "SUBURB"], fallback: 7 },
    FieldSpec { key: "state", labels: &["STATE"], fallback: 8 },
    FieldSpec { key: "postcode", labels: &["POSTCODE", "POST CODE"], fallback: 9 },
    FieldSpec { key: "country", labels: &["COUNTRY"], fallback: 10 },
    FieldSpec { key: "main_contact", labels: &["MAIN CONTACT"], fallback: 11 },
    FieldSpec { key: "owner_name", labels: &["OWNER NAME", "OWNER"], fallback: 12 },
    FieldSpec { key: "owner_phone", labels: &["OWNER PHONE"], fallback: 13 },
    FieldSpec { key: "owner_email", labels: &["OWNER EMAIL"], fallback: 14 },
    FieldSpec { key: "store_manager_name", labels: &["STORE MANAGER", "STORE MANAGER NAME"], fallback: 15 },
    FieldSpec { key: "store_phone", labels: &["STORE PHONE"], fallback: 16 },
    FieldSpec { key: "store_email", labels: &["STORE EMAIL"], fallback: 17 },
    FieldSpec { key: "market_manager_name", labels: &["MARKET MANAGER", "MARKETING MANAGER"], fallback: 18 },
    FieldSpec { key: "marketing_phone", labels: &["MARKETING PHONE"], fallback: 19 },
    FieldSpec { key: "marketing_email", labels: &["MARKETING EMAIL"], fallback: 20 },
    FieldSpec { key: "account_dept_name", labels: &["ACCOUNT DEPT", "ACCOUNTS DEPT", "ACCOUNTS"], fallback: 21 },
    FieldSpec { key: "accounting_phone", labels: &["ACCOUNTS PHONE", "ACCOUNTING PHONE"], fallback: 22 },
    FieldSpec { key: "accounting_email", labels: &["ACCOUNTS EMAIL", "ACCOUNTING EMAIL"], fallback: 23 },
    FieldSpec { key: "notes", labels: &["NOTES"], fallback: 24 },
];

fn store_payload(sheet: &Sheet, columns: &HeaderMap, row: u32) -> StoreFields {
    let text = |key: &str| clean_text(sheet.cell(row, columns.col(key) as u32));
    StoreFields {
        address_1: text("address_1"),
        address_2: text("address_2"),
        city: text("city"),
        state: text("state"),
        postcode: text("postcode"),
        country: text("country"),
        main_contact: text("main_contact"),
        owner_name: text("owner_name"),
        owner_phone: text("owner_phone"),
        owner_email: text("owner_email"),
        store_manager_name: text("store_manager_name"),
        store_phone: text("store_phone"),
        store_email: text("store_email"),
        market_manager_name: text("market_manager_name"),
        marketing_phone: text("marketing_phone"),
        marketing_email: text("marketing_email"),
        account_dept_name: text("account_dept_name"),
        accounting_phone: text("accounting_phone"),
        accounting_email: text("accounting_email"),
        sort_bucket: String::new(),
        notes: text("notes"),
    }
}

pub(crate) fn run(
    store: &dyn PlannerStore,
    summary: &mut ImportSummary,
    territories: &mut TerritoryCache,
    workbook: &PlannerWorkbook,
) -> ImportResult<()> {
    let sheet = match workbook.sheet_by_prefix(SHEET_PREFIX) {
        Some(sheet) => sheet,
        None => {
            summary
                .add_sheet_warning("Customer Details sheet not found; skipped store/contact import.");
            return Ok(());
        }
    };

    let columns = HeaderMap::resolve(sheet.row(HEADER_ROW), &FIELDS);
    let mut seen_stores = DuplicateTracker::new("store");
    let last_row = match sheet.last_row() {
        Some(last) => last,
        None => return Ok(()),
    };

    let mut rows_processed = 0u32;
    for row in FIRST_DATA_ROW..=last_row {
        let display_row = row + 1;

        let code_cell = clean_code(sheet.cell(row, columns.col("code") as u32));
        let combo_code = clean_code(sheet.cell(row, columns.col("combo") as u32));
        let cust_code = if code_cell.is_empty() { combo_code } else { code_cell };

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

        let name_cell = extract_name(sheet.cell(row, columns.col("name") as u32));
        let customer_name = if name_cell.is_empty() {
            extract_name(sheet.cell(row, columns.col("combo") as u32))
        } else {
            name_cell
        };

        let territory_name = clean_text(sheet.cell(row, columns.col("territory") as u32));
        let territory_id = resolve_territory(store, territories, summary, &territory_name)?;
        let customer_id = upsert_customer(
            store,
            summary,
            &CustomerFields::for_code(&cust_code, &customer_name, territory_id),
        )?;

        let payload = store_payload(sheet, &columns, row);
        if payload.has_data() {
            let key = payload.duplicate_key(&cust_code);
            if !seen_stores.admit(summary, &key, sheet.name(), display_row) {
                continue;
            }
            upsert_store_row(store, summary, customer_id, &payload)?;
        }
        rows_processed += 1;
    }

    info!(sheet = sheet.name(), rows = rows_processed, "detail pass complete");
    Ok(())
}
