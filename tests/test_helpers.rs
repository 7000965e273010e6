// ==========================================
// Customer Visit Planner - Test Helpers
// ==========================================
// Shared fixtures: in-memory planner databases and workbook bytes built
// with rust_xlsxwriter, mirroring the sheet layouts uploaded from the
// field.
// ==========================================

use rusqlite::Connection;
use rust_xlsxwriter::{Workbook, Worksheet};
use visit_planner::db;

/// In-memory planner database with the schema applied.
pub fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    db::configure_sqlite_connection(&conn).expect("configure connection");
    db::init_schema(&conn).expect("init schema");
    conn
}

/// Build workbook bytes from a closure that fills in sheets.
pub fn build_workbook<F>(fill: F) -> Vec<u8>
where
    F: FnOnce(&mut Workbook),
{
    let mut workbook = Workbook::new();
    fill(&mut workbook);
    workbook.save_to_buffer().expect("save workbook to buffer")
}

fn write_if_present(sheet: &mut Worksheet, row: u32, col: u16, value: &str) {
    if !value.is_empty() {
        sheet.write_string(row, col, value).expect("write cell");
    }
}

/// Roster sheet ("Get Data - Customers"): legacy column layout with a
/// header row, data from row 2. Row cells: territory, group, group 2,
/// IWS code, cust code, customer name, old value, old name.
pub fn add_roster_sheet(workbook: &mut Workbook, rows: &[[&str; 8]]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Get Data - Customers").expect("sheet name");

    let headers = [
        "Territory",
        "Group",
        "Group 2 IWS",
        "IWS Code",
        "Cust Code",
        "Customer Name",
        "Old Value",
        "Old Name",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).expect("write header");
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            write_if_present(sheet, idx as u32 + 1, col as u16, value);
        }
    }
}

/// Detail sheet ("Customer Details"): legacy layout, headers on row 2,
/// data from row 3. Only the columns the tests exercise are written.
#[derive(Default)]
pub struct DetailRow<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub combo: &'a str,
    pub territory: &'a str,
    pub address_1: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub owner_name: &'a str,
    pub notes: &'a str,
}

pub fn add_details_sheet(workbook: &mut Workbook, rows: &[DetailRow<'_>]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Customer Details").expect("sheet name");
    sheet.write_string(1, 0, "Cust Code").expect("write header");
    sheet.write_string(1, 1, "Customer Name").expect("write header");
    sheet.write_string(1, 3, "Territory").expect("write header");

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 2;
        write_if_present(sheet, r, 0, row.code);
        write_if_present(sheet, r, 1, row.name);
        write_if_present(sheet, r, 2, row.combo);
        write_if_present(sheet, r, 3, row.territory);
        write_if_present(sheet, r, 5, row.address_1);
        write_if_present(sheet, r, 7, row.city);
        write_if_present(sheet, r, 8, row.state);
        write_if_present(sheet, r, 12, row.owner_name);
        write_if_present(sheet, r, 24, row.notes);
    }
}

/// CVM plan-grid row in the legacy layout: territory (B), code (C),
/// sort (D), name (E), trade (F), notes (G), doors (H), month pairs
/// from column K with a two-column stride.
#[derive(Default)]
pub struct CvmRow<'a> {
    pub territory: &'a str,
    pub code: &'a str,
    pub sort_bucket: &'a str,
    pub name: &'a str,
    pub trade_name: &'a str,
    pub notes: &'a str,
    pub doors: &'a str,
    /// (month 1-12, planned text, completed text)
    pub months: &'a [(u32, &'a str, &'a str)],
}

pub fn add_cvm_sheet(workbook: &mut Workbook, rows: &[CvmRow<'_>]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name("CVM").expect("sheet name");
    sheet.write_string(2, 1, "Territory").expect("write header");
    sheet.write_string(2, 2, "Cust Code").expect("write header");
    sheet.write_string(2, 4, "Customer Name").expect("write header");

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 3;
        write_if_present(sheet, r, 1, row.territory);
        write_if_present(sheet, r, 2, row.code);
        write_if_present(sheet, r, 3, row.sort_bucket);
        write_if_present(sheet, r, 4, row.name);
        write_if_present(sheet, r, 5, row.trade_name);
        write_if_present(sheet, r, 6, row.notes);
        write_if_present(sheet, r, 7, row.doors);
        for (month, planned, completed) in row.months {
            let planned_col = 10 + (month - 1) as u16 * 2;
            write_if_present(sheet, r, planned_col, planned);
            write_if_present(sheet, r, planned_col + 1, completed);
        }
    }
}

/// Month-named sheet exposing the reporting year at cell R4.
pub fn add_year_sheet(workbook: &mut Workbook, name: &str, year: i32) {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).expect("sheet name");
    sheet.write_number(3, 17, year as f64).expect("write year");
}

/// Database sheet: one ACTION product group at columns A-E with the
/// product label above it, customer block at the legacy columns U-Y.
#[derive(Default)]
pub struct DatabaseRow<'a> {
    pub code: &'a str,
    pub territory: &'a str,
    pub name: &'a str,
    pub trade_name: &'a str,
    pub last_visit: &'a str,
    pub action: &'a str,
    pub status: &'a str,
    pub next_action: &'a str,
    pub last_contact: &'a str,
    pub notes: &'a str,
}

pub fn add_database_sheet(workbook: &mut Workbook, product_label: &str, rows: &[DatabaseRow<'_>]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Database").expect("sheet name");

    // product label row (3) and field label row (4)
    sheet.write_string(2, 0, product_label).expect("write label");
    let group_fields = ["Action", "Status", "Next Action", "Last Contact", "Notes"];
    for (col, label) in group_fields.iter().enumerate() {
        sheet.write_string(3, col as u16, *label).expect("write label");
    }
    let customer_fields = [
        "Territory",
        "Cust Code",
        "Customer Name",
        "Trade Name",
        "Last Visit",
    ];
    for (offset, label) in customer_fields.iter().enumerate() {
        sheet
            .write_string(3, 20 + offset as u16, *label)
            .expect("write label");
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 4;
        write_if_present(sheet, r, 0, row.action);
        write_if_present(sheet, r, 1, row.status);
        write_if_present(sheet, r, 2, row.next_action);
        write_if_present(sheet, r, 3, row.last_contact);
        write_if_present(sheet, r, 4, row.notes);
        write_if_present(sheet, r, 20, row.territory);
        write_if_present(sheet, r, 21, row.code);
        write_if_present(sheet, r, 22, row.name);
        write_if_present(sheet, r, 23, row.trade_name);
        write_if_present(sheet, r, 24, row.last_visit);
    }
}
