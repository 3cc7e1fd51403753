//! Per-item outcome and report types shared by all bulk endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Terminal status of one batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Created,
    Updated,
    Deleted,
    Skipped,
    Error,
}

/// Field-level detail attached to a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing required field.
    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{} is required", field))
    }
}

/// A rejected candidate, with per-field detail for the caller to highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self {
            message: "Validation failed".to_string(),
            fields,
        }
    }

    /// Candidate did not even deserialize into the expected shape.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new("body", detail)])
    }

    /// Single-line rendering, used where the response has no room for
    /// field-level detail (single-record CRUD endpoints).
    pub fn to_message(&self) -> String {
        if self.fields.is_empty() {
            self.message.clone()
        } else {
            let details: Vec<_> = self.fields.iter().map(|f| f.message.clone()).collect();
            format!("{}: {}", self.message, details.join("; "))
        }
    }
}

impl From<ValidationFailure> for crate::error::AppError {
    fn from(failure: ValidationFailure) -> Self {
        crate::error::AppError::Validation(failure.to_message())
    }
}

impl From<validator::ValidationErrors> for ValidationFailure {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                fields.push(FieldError::new(field.to_string(), message));
            }
        }
        Self::new(fields)
    }
}

/// Outcome of one batch item, correlated to its submitted position.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemOutcome<T> {
    /// Position of the candidate in the submitted list
    pub index: usize,
    pub status: ItemStatus,
    /// Persisted record, present for created/updated/deleted outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Failure message, present only for error outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level detail, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl<T> ItemOutcome<T> {
    pub fn created(index: usize, data: T) -> Self {
        Self {
            index,
            status: ItemStatus::Created,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn updated(index: usize, data: T) -> Self {
        Self {
            index,
            status: ItemStatus::Updated,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn deleted(index: usize, data: T) -> Self {
        Self {
            index,
            status: ItemStatus::Deleted,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    /// Skipped outcomes carry neither data nor error; they are informational.
    pub fn skipped(index: usize) -> Self {
        Self {
            index,
            status: ItemStatus::Skipped,
            data: None,
            error: None,
            details: None,
        }
    }

    pub fn error(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            status: ItemStatus::Error,
            data: None,
            error: Some(message.into()),
            details: None,
        }
    }

    pub fn invalid(index: usize, failure: ValidationFailure) -> Self {
        Self {
            index,
            status: ItemStatus::Error,
            data: None,
            error: Some(failure.message),
            details: Some(failure.fields),
        }
    }
}

/// Summary counters for a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BatchSummary {
    /// Number of items submitted
    pub total: usize,
    /// created + updated + deleted
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Complete report for one batch invocation.
///
/// Invariants: `items.len() == summary.total`, outcomes are in submitted
/// order, and `success + failed + skipped == total`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchReport<T> {
    pub items: Vec<ItemOutcome<T>>,
    pub summary: BatchSummary,
}

impl<T> BatchReport<T> {
    /// Assemble the report, computing summary counters from the outcomes.
    pub fn from_outcomes(items: Vec<ItemOutcome<T>>) -> Self {
        let mut success = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for item in &items {
            match item.status {
                ItemStatus::Created | ItemStatus::Updated | ItemStatus::Deleted => success += 1,
                ItemStatus::Skipped => skipped += 1,
                ItemStatus::Error => failed += 1,
            }
        }
        let summary = BatchSummary {
            total: items.len(),
            success,
            failed,
            skipped,
        };
        Self { items, summary }
    }
}

/// Outcome of one candidate in validate-only mode.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationOutcome {
    pub index: usize,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ValidationOutcome {
    pub fn valid(index: usize) -> Self {
        Self {
            index,
            valid: true,
            error: None,
            details: None,
        }
    }

    pub fn invalid(index: usize, failure: ValidationFailure) -> Self {
        Self {
            index,
            valid: false,
            error: Some(failure.message),
            details: Some(failure.fields),
        }
    }
}

/// Summary counters for a validate-only run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Report for a validate-only run; nothing was persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationReport {
    pub items: Vec<ValidationOutcome>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn from_outcomes(items: Vec<ValidationOutcome>) -> Self {
        let valid = items.iter().filter(|i| i.valid).count();
        let summary = ValidationSummary {
            total: items.len(),
            valid,
            invalid: items.len() - valid,
        };
        Self { items, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counters_add_up() {
        let report = BatchReport::from_outcomes(vec![
            ItemOutcome::created(0, 1),
            ItemOutcome::updated(1, 2),
            ItemOutcome::skipped(2),
            ItemOutcome::error(3, "boom"),
            ItemOutcome::deleted(4, 5),
        ]);
        assert_eq!(report.summary.total, 5);
        assert_eq!(report.summary.success, 3);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(
            report.summary.success + report.summary.failed + report.summary.skipped,
            report.items.len()
        );
    }

    #[test]
    fn invalid_outcome_carries_field_detail() {
        let failure = ValidationFailure::new(vec![FieldError::required("title")]);
        let outcome: ItemOutcome<()> = ItemOutcome::invalid(7, failure);
        assert_eq!(outcome.index, 7);
        assert_eq!(outcome.status, ItemStatus::Error);
        assert_eq!(outcome.error.as_deref(), Some("Validation failed"));
        let details = outcome.details.unwrap();
        assert_eq!(details[0].field, "title");
    }

    #[test]
    fn skipped_outcome_carries_neither_data_nor_error() {
        let outcome: ItemOutcome<()> = ItemOutcome::skipped(3);
        assert!(outcome.data.is_none());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn validation_report_counts_valid_and_invalid() {
        let report = ValidationReport::from_outcomes(vec![
            ValidationOutcome::valid(0),
            ValidationOutcome::invalid(1, ValidationFailure::malformed("not an object")),
            ValidationOutcome::valid(2),
        ]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.valid, 2);
        assert_eq!(report.summary.invalid, 1);
    }
}
