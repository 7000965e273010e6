// ==========================================
// Customer Visit Planner - Core Library
// ==========================================
// Tracks customers, stores, products and monthly visit plans; the
// engine here is the workbook import pipeline that reconciles uploaded
// planner spreadsheets against the relational store.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Data access layer
pub mod repository;

// Import layer - workbook ingestion
pub mod importer;

// Database infrastructure (connection init / PRAGMA / schema)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    CustomerFields, DuplicatePolicy, ImportSummary, IssueLevel, MonthlyPlanEntry, ProductFields,
    RowIssue, StoreFields, UpsertPolicy, ValidationMode,
};

pub use importer::{import_planner_workbook, ImportError, ImportOptions, ImportResult};

pub use repository::{PlannerStore, SqlitePlannerStore, StoreError, StoreResult};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Customer Visit Planner";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
