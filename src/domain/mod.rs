// ==========================================
// Customer Visit Planner - Domain Layer
// ==========================================
// Responsibility: entities, run policies, import report types
// Constraint: no data access, no workbook parsing
// ==========================================

pub mod planner;
pub mod report;
pub mod types;

pub use planner::{CustomerFields, MonthlyPlanEntry, ProductFields, StoreFields};
pub use report::{ImportSummary, RowIssue, ROW_ISSUE_LIMIT};
pub use types::{DuplicatePolicy, IssueLevel, UpsertPolicy, ValidationMode};
