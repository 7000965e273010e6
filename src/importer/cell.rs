// ==========================================
// Customer Visit Planner - Workbook Cell Normalizers
// ==========================================
// Responsibility: pure functions turning raw calamine cells into clean
// strings, codes, names, dates, booleans and integers. Everything the
// sheet passes read goes through here first.
// ==========================================

use crate::domain::report::ImportSummary;
use calamine::Data;
use chrono::NaiveDate;

/// Text date formats accepted after native date cells: ISO first, then
/// the two slash/dash day-first layouts seen in legacy workbooks.
const TEXT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Case-insensitive truthy vocabulary for completion flags.
const TRUTHY_WORDS: [&str; 7] = ["true", "yes", "y", "1", "done", "completed", "x"];

/// Stringify a cell and clean it: non-breaking spaces become plain
/// spaces, surrounding whitespace is stripped. Empty cells yield "".
pub fn clean_text(value: &Data) -> String {
    let raw = match value {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole floats print without the fractional part so numeric
            // cells and text cells normalize to the same code.
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    };
    raw.replace('\u{a0}', " ").trim().to_string()
}

/// Clean a code cell. Strips the trailing ".0" produced when a numeric
/// code round-trips through a float cell; a bare zero is treated as
/// absent.
pub fn clean_code(value: &Data) -> String {
    let raw = clean_text(value);
    if raw.is_empty() {
        return raw;
    }
    let stripped = strip_float_suffix(&raw);
    if stripped == "0" {
        return String::new();
    }
    stripped.to_string()
}

/// Extract a display name from a cell that may hold a "combo" label
/// (`CODE | NAME` style): the last non-empty `|`-separated segment wins
/// when there are at least two, otherwise the cleaned text is returned
/// unchanged.
pub fn extract_name(value: &Data) -> String {
    let raw = clean_text(value);
    if raw.is_empty() || !raw.contains('|') {
        return raw;
    }
    let parts: Vec<&str> = raw
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() >= 2 {
        parts[parts.len() - 1].to_string()
    } else {
        raw
    }
}

/// Parse a date cell. Native date/datetime cells pass through (datetime
/// truncated to its date); text is tried against the accepted formats in
/// order. Unparseable values yield None - callers decide whether that is
/// worth an issue.
pub fn to_date(value: &Data) -> Option<NaiveDate> {
    if let Data::DateTime(dt) = value {
        return dt.as_datetime().map(|d| d.date());
    }
    let raw = clean_text(value);
    if raw.is_empty() {
        return None;
    }
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&raw, fmt).ok())
}

/// Parse a date cell, recording a row issue when a non-blank value fails
/// to parse. Severity follows the run's validation mode.
pub fn to_date_with_issue(
    value: &Data,
    summary: &mut ImportSummary,
    sheet: &str,
    row: u32,
    field: &str,
) -> Option<NaiveDate> {
    if let Some(parsed) = to_date(value) {
        return Some(parsed);
    }
    let raw = clean_text(value);
    if !raw.is_empty() {
        let level = summary.validation_level();
        summary.record_issue(
            level,
            sheet,
            Some(row),
            format!("Invalid date '{}' in {}; value ignored.", raw, field),
        );
    }
    None
}

/// Interpret a completion-flag cell. Native booleans pass through,
/// numbers are truthy above zero, text is matched against the truthy
/// vocabulary. Anything else is false.
pub fn to_bool(value: &Data) -> bool {
    match value {
        Data::Bool(b) => *b,
        Data::Int(i) => *i > 0,
        Data::Float(f) => *f > 0.0,
        _ => {
            let raw = clean_text(value).to_lowercase();
            !raw.is_empty() && TRUTHY_WORDS.contains(&raw.as_str())
        }
    }
}

/// Parse an integer cell. Native ints pass through, floats only when
/// integral, text only when it is a signed digit string (after stripping
/// a coercion-trailing ".0").
pub fn to_int(value: &Data) -> Option<i64> {
    match value {
        Data::Int(i) => Some(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(*f as i64)
            } else {
                None
            }
        }
        _ => {
            let raw = clean_text(value);
            if raw.is_empty() {
                return None;
            }
            let stripped = strip_float_suffix(&raw);
            let digits = stripped.strip_prefix('-').unwrap_or(stripped);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                stripped.parse().ok()
            } else {
                None
            }
        }
    }
}

/// True when any cell in the slice carries visible text.
pub fn is_row_populated(cells: &[&Data]) -> bool {
    cells.iter().any(|c| !clean_text(c).is_empty())
}

fn strip_float_suffix(raw: &str) -> &str {
    match raw.strip_suffix(".0") {
        Some(head) if !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DuplicatePolicy, UpsertPolicy, ValidationMode};

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_clean_text_strips_nbsp_and_whitespace() {
        assert_eq!(clean_text(&text("  Alpha\u{a0}Store  ")), "Alpha Store");
        assert_eq!(clean_text(&Data::Empty), "");
        assert_eq!(clean_text(&Data::Float(100.0)), "100");
        assert_eq!(clean_text(&Data::Float(2.5)), "2.5");
    }

    #[test]
    fn test_clean_code_strips_float_suffix() {
        assert_eq!(clean_code(&text("100.0")), "100");
        assert_eq!(clean_code(&Data::Float(100.0)), "100");
        assert_eq!(clean_code(&text("C100")), "C100");
        // decimal codes that are not float coercions stay untouched
        assert_eq!(clean_code(&text("10.5")), "10.5");
    }

    #[test]
    fn test_clean_code_treats_zero_as_absent() {
        assert_eq!(clean_code(&text("0")), "");
        assert_eq!(clean_code(&text("0.0")), "");
        assert_eq!(clean_code(&Data::Int(0)), "");
    }

    #[test]
    fn test_extract_name_takes_last_combo_segment() {
        assert_eq!(extract_name(&text("C100 | Alpha Store")), "Alpha Store");
        assert_eq!(extract_name(&text("C100 | NSW | Alpha Store")), "Alpha Store");
        assert_eq!(extract_name(&text("Alpha Store")), "Alpha Store");
        // a lone pipe with one real segment is not a combo cell
        assert_eq!(extract_name(&text("Alpha Store |")), "Alpha Store |");
    }

    #[test]
    fn test_to_date_formats_in_order() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        assert_eq!(to_date(&text("2026-01-20")), Some(expected));
        assert_eq!(to_date(&text("20/01/2026")), Some(expected));
        assert_eq!(to_date(&text("20-01-2026")), Some(expected));
        assert_eq!(to_date(&text("January 20")), None);
        assert_eq!(to_date(&Data::Empty), None);
    }

    #[test]
    fn test_to_date_with_issue_logs_unparseable_text() {
        let mut summary = ImportSummary::new(
            "planner.xlsx",
            UpsertPolicy::Merge,
            ValidationMode::Standard,
            DuplicatePolicy::LastWins,
            false,
        );
        let parsed = to_date_with_issue(&text("sometime soon"), &mut summary, "CVM", 4, "PLANNED JAN");
        assert_eq!(parsed, None);
        assert_eq!(summary.warning_count, 1);
        assert!(summary.row_issues[0].message.contains("PLANNED JAN"));

        // blank cells stay silent
        to_date_with_issue(&Data::Empty, &mut summary, "CVM", 5, "PLANNED FEB");
        assert_eq!(summary.warning_count, 1);
    }

    #[test]
    fn test_to_bool_vocabulary() {
        for word in ["TRUE", "yes", "Y", "1", "Done", "completed", "x"] {
            assert!(to_bool(&text(word)), "expected '{}' to be truthy", word);
        }
        assert!(to_bool(&Data::Bool(true)));
        assert!(to_bool(&Data::Float(1.0)));
        assert!(!to_bool(&Data::Float(0.0)));
        assert!(!to_bool(&text("no")));
        assert!(!to_bool(&text("")));
    }

    #[test]
    fn test_to_int_accepts_integral_values_only() {
        assert_eq!(to_int(&Data::Int(12)), Some(12));
        assert_eq!(to_int(&Data::Float(12.0)), Some(12));
        assert_eq!(to_int(&Data::Float(12.5)), None);
        assert_eq!(to_int(&text("12")), Some(12));
        assert_eq!(to_int(&text("12.0")), Some(12));
        assert_eq!(to_int(&text("-3")), Some(-3));
        assert_eq!(to_int(&text("twelve")), None);
    }

    #[test]
    fn test_is_row_populated() {
        let blank = [Data::Empty, Data::String("   ".to_string())];
        let refs: Vec<&Data> = blank.iter().collect();
        assert!(!is_row_populated(&refs));

        let populated = [Data::Empty, Data::String("x".to_string())];
        let refs: Vec<&Data> = populated.iter().collect();
        assert!(is_row_populated(&refs));
    }
}
