//! Wire-contract shaping of batch reports.
//!
//! Pure formatting: successful outcomes go to `results`, failures are
//! flattened into `errors` entries keyed by submitted index, counters are
//! copied through untouched.

use serde::Serialize;
use utoipa::ToSchema;

use super::outcome::{
    BatchReport, BatchSummary, FieldError, ItemOutcome, ItemStatus, ValidationOutcome,
    ValidationReport, ValidationSummary,
};

/// Output of a delete outcome: just the id that was removed. Wrapped in a
/// struct so delete reports serialize to objects like every other output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeletedId {
    pub id: i32,
}

/// One failed item in the response body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemErrorEntry {
    /// Position of the candidate in the submitted list
    pub index: usize,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Response body for a completed batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Non-error outcomes, in submitted order
    pub results: Vec<ItemOutcome<T>>,
    /// Failed items, in submitted order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemErrorEntry>,
    pub summary: BatchSummary,
}

impl<T> From<BatchReport<T>> for BatchResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(report: BatchReport<T>) -> Self {
        let mut results = Vec::new();
        let mut errors = Vec::new();
        for item in report.items {
            if item.status == ItemStatus::Error {
                errors.push(ItemErrorEntry {
                    index: item.index,
                    error: item.error.unwrap_or_else(|| "Unexpected error".to_string()),
                    details: item.details,
                });
            } else {
                results.push(item);
            }
        }
        Self {
            results,
            errors,
            summary: report.summary,
        }
    }
}

/// Response body for a validate-only run.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationResponse {
    pub validation_results: Vec<ValidationOutcome>,
    pub summary: ValidationSummary,
}

impl From<ValidationReport> for ValidationResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            validation_results: report.items,
            summary: report.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::outcome::ValidationFailure;

    #[derive(Debug, Clone, Serialize, ToSchema)]
    struct Row {
        id: i32,
    }

    #[test]
    fn errors_are_flattened_with_their_index() {
        let report = BatchReport::from_outcomes(vec![
            ItemOutcome::created(0, Row { id: 1 }),
            ItemOutcome::invalid(
                1,
                ValidationFailure::new(vec![FieldError::required("title")]),
            ),
            ItemOutcome::skipped(2),
        ]);
        let response = BatchResponse::from(report);

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].index, 1);
        assert_eq!(response.errors[0].error, "Validation failed");
        assert!(response.errors[0].details.is_some());
        assert_eq!(response.summary.total, 3);
    }

    #[test]
    fn empty_errors_array_is_omitted_from_the_body() {
        let report = BatchReport::from_outcomes(vec![ItemOutcome::created(0, Row { id: 1 })]);
        let response = BatchResponse::from(report);
        let body = serde_json::to_value(&response).unwrap();
        assert!(body.get("errors").is_none());
        assert_eq!(body["summary"]["success"], 1);
    }

    #[test]
    fn summary_exposes_one_success_counter_not_per_status_ones() {
        let report = BatchReport::from_outcomes(vec![
            ItemOutcome::created(0, Row { id: 1 }),
            ItemOutcome::updated(1, Row { id: 2 }),
        ]);
        let body = serde_json::to_value(&BatchResponse::from(report)).unwrap();
        assert_eq!(body["summary"]["success"], 2);
        assert!(body["summary"].get("created").is_none());
        assert!(body["summary"].get("updated").is_none());
    }

    #[test]
    fn delete_report_serializes_removed_ids_as_objects() {
        let report = BatchReport::from_outcomes(vec![
            ItemOutcome::deleted(0, DeletedId { id: 7 }),
            ItemOutcome::skipped(1),
        ]);
        let response = BatchResponse::from(report);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["results"][0]["data"]["id"], 7);
        assert_eq!(body["results"][0]["status"], "deleted");
        assert_eq!(body["summary"]["success"], 1);
        assert_eq!(body["summary"]["skipped"], 1);
    }
}
