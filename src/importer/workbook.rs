// ==========================================
// Customer Visit Planner - Workbook Access
// ==========================================
// Responsibility: open an uploaded workbook from bytes, locate sheets by
// case-insensitive prefix/exact name, expose absolute cell addressing,
// and resolve the reporting calendar year.
// ==========================================

use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;

use crate::importer::cell::{is_row_populated, to_int};
use crate::importer::error::{ImportError, ImportResult};

/// Month-named worksheets that expose the reporting year at cell R4.
pub const MONTH_SHEET_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// The year cell on month sheets: R4 (0-based row 3, column 17).
const YEAR_CELL: (u32, u32) = (3, 17);

pub const YEAR_MIN: i32 = 2000;
pub const YEAR_MAX: i32 = 2100;

// ==========================================
// Sheet - one loaded worksheet
// ==========================================
// Cell addressing is absolute and 0-based regardless of where the used
// range starts, so positional fallbacks stay stable on sheets with
// leading blank rows or columns.
pub struct Sheet {
    name: String,
    range: Range<Data>,
}

impl Sheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell at an absolute (row, col); out-of-range reads are Empty.
    pub fn cell(&self, row: u32, col: u32) -> &Data {
        self.range.get_value((row, col)).unwrap_or(&Data::Empty)
    }

    /// Last used row (absolute, 0-based). None for an empty sheet.
    pub fn last_row(&self) -> Option<u32> {
        self.range.end().map(|(row, _)| row)
    }

    /// Last used column (absolute, 0-based). None for an empty sheet.
    pub fn last_col(&self) -> Option<u32> {
        self.range.end().map(|(_, col)| col)
    }

    /// All cells of an absolute row, 0..=last_col.
    pub fn row(&self, row: u32) -> Vec<&Data> {
        let width = self.last_col().map(|c| c + 1).unwrap_or(0);
        (0..width).map(|col| self.cell(row, col)).collect()
    }

    /// True when any cell of the row carries visible text.
    pub fn row_is_populated(&self, row: u32) -> bool {
        is_row_populated(&self.row(row))
    }

    fn year_at_cell(&self) -> Option<i32> {
        let value = self.cell(YEAR_CELL.0, YEAR_CELL.1);
        let year = to_int(value)? as i32;
        (YEAR_MIN..=YEAR_MAX).contains(&year).then_some(year)
    }
}

// ==========================================
// PlannerWorkbook - the uploaded workbook
// ==========================================
pub struct PlannerWorkbook {
    sheets: Vec<Sheet>,
}

impl PlannerWorkbook {
    /// Open a workbook from an in-memory byte buffer, loading every
    /// sheet's used range eagerly.
    pub fn from_bytes(content: &[u8]) -> ImportResult<Self> {
        let mut reader: Xlsx<_> = Xlsx::new(Cursor::new(content))?;

        let names: Vec<String> = reader.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = reader
                .worksheet_range(&name)
                .map_err(|e| ImportError::WorkbookRead(e.to_string()))?;
            sheets.push(Sheet { name, range });
        }
        Ok(PlannerWorkbook { sheets })
    }

    /// First sheet whose name starts with the prefix, case-insensitive.
    pub fn sheet_by_prefix(&self, prefix: &str) -> Option<&Sheet> {
        let target = prefix.trim().to_lowercase();
        self.sheets
            .iter()
            .find(|s| s.name.trim().to_lowercase().starts_with(&target))
    }

    /// Sheet whose name matches exactly, case-insensitive.
    pub fn sheet_by_exact(&self, wanted: &str) -> Option<&Sheet> {
        let target = wanted.trim().to_lowercase();
        self.sheets
            .iter()
            .find(|s| s.name.trim().to_lowercase() == target)
    }

    /// Resolve the reporting year from the workbook: month-named sheets
    /// in calendar order first, then any sheet exposing a plausible year
    /// at the same cell.
    pub fn resolve_calendar_year(&self) -> Option<i32> {
        for month in MONTH_SHEET_NAMES {
            if let Some(year) = self.sheet_by_exact(month).and_then(Sheet::year_at_cell) {
                return Some(year);
            }
        }
        self.sheets.iter().find_map(Sheet::year_at_cell)
    }

}

/// Case-insensitive extension allow-list for uploaded workbooks.
pub fn validate_workbook_filename(filename: &str) -> ImportResult<()> {
    let lower = filename.to_lowercase();
    if [".xlsx", ".xlsm", ".xltm"].iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedExtension(filename.to_string()))
    }
}
