// ==========================================
// Customer Visit Planner - Header Resolver
// ==========================================
// Responsibility: map human-authored column headers to semantic fields.
// Workbooks in the field have renamed, reordered and inserted columns
// over the years; resolution is label-first with the legacy positional
// layout as the fallback, so both modern and untouched workbooks load.
// ==========================================

use calamine::Data;
use std::collections::HashMap;

use crate::importer::cell::clean_text;

pub const MONTH_SHORT: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Legacy base column (0-based) of the first month pair on the plan grid.
pub const PLAN_MONTH_BASE_COL: usize = 10;

/// One semantic field: accepted label variants plus the column the
/// legacy positional layout put it in.
pub struct FieldSpec {
    pub key: &'static str,
    pub labels: &'static [&'static str],
    pub fallback: usize,
}

/// Resolved field -> column table for one sheet.
pub struct HeaderMap {
    columns: HashMap<&'static str, usize>,
}

impl HeaderMap {
    /// Resolve every field against a header row: exact normalized-label
    /// match first, legacy position otherwise.
    pub fn resolve<'a, I>(header_row: I, specs: &[FieldSpec]) -> Self
    where
        I: IntoIterator<Item = &'a Data>,
    {
        let normalized: Vec<String> = header_row
            .into_iter()
            .map(|c| normalize_label(&clean_text(c)))
            .collect();

        let mut columns = HashMap::new();
        for spec in specs {
            let found = spec.labels.iter().find_map(|label| {
                let wanted = normalize_label(label);
                normalized.iter().position(|h| !h.is_empty() && *h == wanted)
            });
            columns.insert(spec.key, found.unwrap_or(spec.fallback));
        }
        HeaderMap { columns }
    }

    /// Column (0-based) resolved for a field. Panics on unknown keys,
    /// which only happens on a typo between a field table and its pass.
    pub fn col(&self, key: &str) -> usize {
        self.columns[key]
    }
}

/// Planned/completed column pair for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthColumns {
    pub planned: usize,
    pub completed: usize,
}

/// Resolve the twelve month pairs of the plan grid. Each month's two
/// labels are searched independently over the whole header row
/// ("PLANNED JAN", and "COMPLETED|COMPLETE|DONE JAN"); a month whose
/// label is absent falls back to the legacy two-column stride.
pub fn resolve_month_columns<'a, I>(header_row: I) -> [MonthColumns; 12]
where
    I: IntoIterator<Item = &'a Data>,
{
    let normalized: Vec<String> = header_row
        .into_iter()
        .map(|c| normalize_label(&clean_text(c)))
        .collect();

    let find = |wanted: &str| -> Option<usize> {
        normalized.iter().position(|h| !h.is_empty() && h == wanted)
    };

    let mut months = [MonthColumns { planned: 0, completed: 0 }; 12];
    for (idx, month) in MONTH_SHORT.iter().enumerate() {
        let legacy_planned = PLAN_MONTH_BASE_COL + idx * 2;

        let planned = find(&format!("PLANNED {month}")).unwrap_or(legacy_planned);
        let completed = ["COMPLETED", "COMPLETE", "DONE"]
            .iter()
            .find_map(|verb| find(&format!("{verb} {month}")))
            .unwrap_or(legacy_planned + 1);

        months[idx] = MonthColumns { planned, completed };
    }
    months
}

/// Normalize a header label: uppercase, separators to spaces, strip
/// everything that is not alphanumeric or a space, collapse runs of
/// whitespace.
pub fn normalize_label(raw: &str) -> String {
    let replaced: String = raw
        .to_uppercase()
        .chars()
        .map(|c| match c {
            '_' | '-' | '/' => ' ',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
