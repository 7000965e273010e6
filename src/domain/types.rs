// ==========================================
// Customer Visit Planner - Run Policy Types
// ==========================================
// Three run-wide settings govern an import: how existing rows are
// written (upsert policy), how repeated natural keys are resolved
// (duplicate policy), and how recoverable findings are graded
// (validation mode).
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Upsert Policy
// ==========================================
// Wire format: snake_case strings, matching the upload form values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertPolicy {
    /// Fill in blanks on existing rows, never erase a known value.
    Merge,
    /// Never touch an existing row.
    CreateOnly,
    /// Replace every provided field on existing rows.
    Overwrite,
}

impl Default for UpsertPolicy {
    fn default() -> Self {
        UpsertPolicy::Merge
    }
}

impl fmt::Display for UpsertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertPolicy::Merge => write!(f, "merge"),
            UpsertPolicy::CreateOnly => write!(f, "create_only"),
            UpsertPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl FromStr for UpsertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(UpsertPolicy::Merge),
            "create_only" => Ok(UpsertPolicy::CreateOnly),
            "overwrite" => Ok(UpsertPolicy::Overwrite),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Validation Mode
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Recoverable findings log as warnings.
    Standard,
    /// Recoverable findings log as errors and block apply.
    Strict,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::Standard
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Standard => write!(f, "standard"),
            ValidationMode::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ValidationMode::Standard),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Duplicate Policy
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Warn and accept; later rows override via upsert.
    LastWins,
    /// Warn and skip the repeated row.
    FirstWins,
    /// Log an error, skip the row, block the whole run.
    Error,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::LastWins
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::LastWins => write!(f, "last_wins"),
            DuplicatePolicy::FirstWins => write!(f, "first_wins"),
            DuplicatePolicy::Error => write!(f, "error"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_wins" => Ok(DuplicatePolicy::LastWins),
            "first_wins" => Ok(DuplicatePolicy::FirstWins),
            "error" => Ok(DuplicatePolicy::Error),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Issue Level
// ==========================================
// Severity of a single row-level finding in the import report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Warning,
    Error,
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLevel::Warning => write!(f, "warning"),
            IssueLevel::Error => write!(f, "error"),
        }
    }
}
