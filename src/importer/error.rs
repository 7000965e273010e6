// ==========================================
// Customer Visit Planner - Import Error Types
// ==========================================
// Structural/input failures only: anything here aborts the run before
// (or while) opening the workbook. Row-level findings never surface as
// errors - they flow through the ImportSummary ledger instead.
// Tool: thiserror derive macro
// ==========================================

use crate::repository::error::StoreError;
use thiserror::Error;

/// Import-run error type.
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File-level errors =====
    #[error("unsupported workbook file '{0}' (expected .xlsx, .xlsm or .xltm)")]
    UnsupportedExtension(String),

    #[error("uploaded workbook is empty")]
    EmptyWorkbook,

    #[error("could not read workbook: {0}")]
    WorkbookRead(String),

    // ===== Run-parameter errors =====
    #[error("invalid upsert policy '{0}'. Allowed: create_only, merge, overwrite.")]
    InvalidUpsertPolicy(String),

    #[error("invalid validation mode '{0}'. Allowed: standard, strict.")]
    InvalidValidationMode(String),

    #[error("invalid duplicate policy '{0}'. Allowed: error, first_wins, last_wins.")]
    InvalidDuplicatePolicy(String),

    #[error("year override {0} is out of range (2000-2100)")]
    YearOverrideOutOfRange(i32),

    // ===== Collaborator errors =====
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::WorkbookRead(err.to_string())
    }
}

/// Result alias for the import layer.
pub type ImportResult<T> = Result<T, ImportError>;
