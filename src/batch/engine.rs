//! Batch orchestrator: runs validate / lookup / resolve / execute over a
//! list of candidates, one at a time, in submitted order.
//!
//! One item's failure never aborts the rest of the batch. The only check
//! that rejects the whole call is the size precondition, evaluated before
//! any item is touched.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::outcome::{
    BatchReport, ItemOutcome, ValidationFailure, ValidationOutcome, ValidationReport,
};
use super::policy::{resolve, LookupResult, ResolvedAction};

/// Entity-specific hooks for an upsert batch (bulk create/update/import).
///
/// `validate` is pure; everything touching the store lives in the async
/// methods so the orchestrator can keep the per-item control flow uniform.
#[cfg_attr(test, mockall::automock(
    type Record = serde_json::Value;
    type Key = i32;
    type Output = serde_json::Value;
))]
#[async_trait]
pub trait BatchStrategy: Send + Sync {
    /// Normalized, typed record produced by validation.
    type Record: Send + Sync;
    /// Identity of a matched existing record.
    type Key: Send + Sync;
    /// Persisted record returned to the caller.
    type Output: Send;

    /// Plural noun used in whole-batch error messages ("lessons", "songs").
    fn entity_name(&self) -> &'static str;

    /// Validate and normalize one raw candidate, applying defaults.
    fn validate(&self, raw: &Value) -> Result<Self::Record, ValidationFailure>;

    /// Probe the store for a natural-key match.
    async fn find_existing(&self, record: &Self::Record) -> LookupResult<Self::Key>;

    /// Insert a new record.
    async fn insert(&self, record: &Self::Record) -> AppResult<Self::Output>;

    /// Overwrite the matched existing record.
    async fn update(&self, key: &Self::Key, record: &Self::Record) -> AppResult<Self::Output>;
}

/// Entity-specific hooks for a delete batch.
#[cfg_attr(test, mockall::automock(
    type Key = i32;
    type Output = i32;
))]
#[async_trait]
pub trait BatchDeleteStrategy: Send + Sync {
    type Key: Send + Sync;
    type Output: Send;

    fn entity_name(&self) -> &'static str;

    /// Extract the target identity from one raw candidate.
    fn validate(&self, raw: &Value) -> Result<Self::Key, ValidationFailure>;

    /// Probe the store for the target record.
    async fn find_existing(&self, key: &Self::Key) -> LookupResult<Self::Key>;

    /// Delete the matched record.
    async fn delete(&self, key: &Self::Key) -> AppResult<Self::Output>;
}

/// Caller-supplied options for one batch invocation.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Update-in-place instead of skipping when a match exists
    pub overwrite: bool,
    /// Whole-batch size ceiling
    pub max_items: usize,
}

/// Whole-batch precondition violation. Fatal: no items are processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("{noun} array is required and cannot be empty")]
    Empty { noun: String },

    #[error("Cannot process more than {max} {noun} at once")]
    TooLarge { noun: String, max: usize },
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Convert an application error into the message recorded for an item.
///
/// Store errors keep the driver's message verbatim; domain errors keep the
/// message they carry; anything else gets the "Unexpected error" label so
/// it can be told apart from a normal validation or persistence failure.
pub fn error_message(err: AppError) -> String {
    match err {
        AppError::Database(e) => e.to_string(),
        AppError::NotFound(msg)
        | AppError::Conflict(msg)
        | AppError::Validation(msg)
        | AppError::BadRequest(msg) => msg,
        other => format!("Unexpected error: {}", other),
    }
}

fn check_size(noun: &str, len: usize, max: usize) -> Result<(), BatchError> {
    if len == 0 {
        return Err(BatchError::Empty {
            noun: capitalize(noun),
        });
    }
    if len > max {
        return Err(BatchError::TooLarge {
            noun: noun.to_string(),
            max,
        });
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Run an upsert batch to completion and report every item's fate.
pub async fn run<S: BatchStrategy>(
    strategy: &S,
    items: &[Value],
    options: &BatchOptions,
) -> Result<BatchReport<S::Output>, BatchError> {
    check_size(strategy.entity_name(), items.len(), options.max_items)?;

    let batch_id = Uuid::new_v4();
    tracing::debug!(
        %batch_id,
        entity = strategy.entity_name(),
        count = items.len(),
        overwrite = options.overwrite,
        "Starting batch run"
    );

    let mut outcomes = Vec::with_capacity(items.len());
    for (index, raw) in items.iter().enumerate() {
        outcomes.push(process_item(strategy, index, raw, options.overwrite).await);
    }

    let report = BatchReport::from_outcomes(outcomes);
    tracing::info!(
        %batch_id,
        entity = strategy.entity_name(),
        total = report.summary.total,
        success = report.summary.success,
        failed = report.summary.failed,
        skipped = report.summary.skipped,
        "Batch run completed"
    );
    Ok(report)
}

async fn process_item<S: BatchStrategy>(
    strategy: &S,
    index: usize,
    raw: &Value,
    overwrite: bool,
) -> ItemOutcome<S::Output> {
    let record = match strategy.validate(raw) {
        Ok(record) => record,
        Err(failure) => return ItemOutcome::invalid(index, failure),
    };

    let action = match resolve(strategy.find_existing(&record).await, overwrite) {
        Ok(action) => action,
        Err(message) => return ItemOutcome::error(index, message),
    };

    match action {
        ResolvedAction::Create => match strategy.insert(&record).await {
            Ok(data) => ItemOutcome::created(index, data),
            Err(err) => ItemOutcome::error(index, error_message(err)),
        },
        ResolvedAction::Overwrite(key) => match strategy.update(&key, &record).await {
            Ok(data) => ItemOutcome::updated(index, data),
            Err(err) => ItemOutcome::error(index, error_message(err)),
        },
        ResolvedAction::Skip(_) => ItemOutcome::skipped(index),
    }
}

/// Run the validator alone over every candidate. Nothing is persisted and
/// the store is never probed.
pub fn run_validate_only<S: BatchStrategy>(
    strategy: &S,
    items: &[Value],
    options: &BatchOptions,
) -> Result<ValidationReport, BatchError> {
    check_size(strategy.entity_name(), items.len(), options.max_items)?;

    let outcomes = items
        .iter()
        .enumerate()
        .map(|(index, raw)| match strategy.validate(raw) {
            Ok(_) => ValidationOutcome::valid(index),
            Err(failure) => ValidationOutcome::invalid(index, failure),
        })
        .collect();

    Ok(ValidationReport::from_outcomes(outcomes))
}

/// Run a delete batch. Deleting an absent record is reported as `skipped`,
/// so resubmitting the same ids is harmless.
pub async fn run_delete<S: BatchDeleteStrategy>(
    strategy: &S,
    items: &[Value],
    options: &BatchOptions,
) -> Result<BatchReport<S::Output>, BatchError> {
    check_size(strategy.entity_name(), items.len(), options.max_items)?;

    let batch_id = Uuid::new_v4();
    tracing::debug!(
        %batch_id,
        entity = strategy.entity_name(),
        count = items.len(),
        "Starting delete batch"
    );

    let mut outcomes = Vec::with_capacity(items.len());
    for (index, raw) in items.iter().enumerate() {
        outcomes.push(process_delete_item(strategy, index, raw).await);
    }

    let report = BatchReport::from_outcomes(outcomes);
    tracing::info!(
        %batch_id,
        entity = strategy.entity_name(),
        total = report.summary.total,
        success = report.summary.success,
        failed = report.summary.failed,
        skipped = report.summary.skipped,
        "Delete batch completed"
    );
    Ok(report)
}

async fn process_delete_item<S: BatchDeleteStrategy>(
    strategy: &S,
    index: usize,
    raw: &Value,
) -> ItemOutcome<S::Output> {
    let key = match strategy.validate(raw) {
        Ok(key) => key,
        Err(failure) => return ItemOutcome::invalid(index, failure),
    };

    match strategy.find_existing(&key).await {
        LookupResult::Found(key) => match strategy.delete(&key).await {
            Ok(data) => ItemOutcome::deleted(index, data),
            Err(err) => ItemOutcome::error(index, error_message(err)),
        },
        LookupResult::NotFound => ItemOutcome::skipped(index),
        LookupResult::Failed(message) => ItemOutcome::error(index, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::outcome::{FieldError, ItemStatus};
    use serde_json::json;

    fn options(overwrite: bool) -> BatchOptions {
        BatchOptions {
            overwrite,
            max_items: 100,
        }
    }

    fn ok_validate(mock: &mut MockBatchStrategy) {
        mock.expect_validate()
            .returning(|raw| Ok(raw.clone()));
    }

    #[tokio::test]
    async fn every_item_appears_once_in_input_order() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("lessons");
        ok_validate(&mut mock);
        mock.expect_find_existing()
            .times(3)
            .returning(|_| LookupResult::NotFound);
        mock.expect_insert()
            .times(3)
            .returning(|record| Ok(record.clone()));

        let items = vec![json!({"n": 0}), json!({"n": 1}), json!({"n": 2})];
        let report = run(&mock, &items, &options(false)).await.unwrap();

        assert_eq!(report.items.len(), items.len());
        for (i, outcome) in report.items.iter().enumerate() {
            assert_eq!(outcome.index, i);
            assert_eq!(outcome.status, ItemStatus::Created);
        }
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.success, 3);
    }

    #[tokio::test]
    async fn one_bad_item_does_not_affect_the_others() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("lessons");
        mock.expect_validate().returning(|raw| {
            if raw["bad"].as_bool().unwrap_or(false) {
                Err(ValidationFailure::new(vec![FieldError::required(
                    "student_id",
                )]))
            } else {
                Ok(raw.clone())
            }
        });
        mock.expect_find_existing()
            .times(2)
            .returning(|_| LookupResult::NotFound);
        // Exactly two inserts: the malformed item must never reach the store.
        mock.expect_insert()
            .times(2)
            .returning(|record| Ok(record.clone()));

        let items = vec![json!({"n": 0}), json!({"bad": true}), json!({"n": 2})];
        let report = run(&mock, &items, &options(false)).await.unwrap();

        assert_eq!(report.items.len(), 3);
        assert_eq!(report.items[0].status, ItemStatus::Created);
        assert_eq!(report.items[1].status, ItemStatus::Error);
        assert_eq!(report.items[1].index, 1);
        assert_eq!(report.items[1].error.as_deref(), Some("Validation failed"));
        assert_eq!(report.items[2].status, ItemStatus::Created);
        assert_eq!(report.summary.success, 2);
        assert_eq!(report.summary.failed, 1);
    }

    #[tokio::test]
    async fn existing_record_is_skipped_without_overwrite() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("songs");
        ok_validate(&mut mock);
        mock.expect_find_existing()
            .returning(|_| LookupResult::Found(42));
        // No insert/update expectations: any write would panic the mock.

        let items = vec![json!({"title": "Etude"})];
        let report = run(&mock, &items, &options(false)).await.unwrap();

        assert_eq!(report.items[0].status, ItemStatus::Skipped);
        assert!(report.items[0].data.is_none());
        assert!(report.items[0].error.is_none());
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.success, 0);
    }

    #[tokio::test]
    async fn existing_record_is_overwritten_when_requested() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("songs");
        ok_validate(&mut mock);
        mock.expect_find_existing()
            .returning(|_| LookupResult::Found(42));
        mock.expect_update()
            .times(1)
            .withf(|key, _| *key == 42)
            .returning(|_, record| Ok(record.clone()));

        let items = vec![json!({"title": "Etude"})];
        let report = run(&mock, &items, &options(true)).await.unwrap();

        assert_eq!(report.items[0].status, ItemStatus::Updated);
        assert_eq!(report.summary.success, 1);
    }

    #[tokio::test]
    async fn failed_lookup_is_an_error_not_a_create_or_skip() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("songs");
        ok_validate(&mut mock);
        mock.expect_find_existing()
            .returning(|_| LookupResult::Failed("connection reset by peer".to_string()));
        // Neither insert nor update may run on a failed lookup.

        let items = vec![json!({"title": "Etude"})];
        let report = run(&mock, &items, &options(true)).await.unwrap();

        assert_eq!(report.items[0].status, ItemStatus::Error);
        assert_eq!(
            report.items[0].error.as_deref(),
            Some("connection reset by peer")
        );
    }

    #[tokio::test]
    async fn store_error_message_is_propagated_verbatim() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("songs");
        ok_validate(&mut mock);
        mock.expect_find_existing()
            .returning(|_| LookupResult::NotFound);
        mock.expect_insert().returning(|_| {
            Err(AppError::Conflict(
                "duplicate key value violates unique constraint \"songs_title_artist_key\""
                    .to_string(),
            ))
        });

        let items = vec![json!({"title": "Etude"})];
        let report = run(&mock, &items, &options(false)).await.unwrap();

        assert_eq!(
            report.items[0].error.as_deref(),
            Some("duplicate key value violates unique constraint \"songs_title_artist_key\"")
        );
    }

    #[tokio::test]
    async fn unanticipated_errors_are_labelled() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("songs");
        ok_validate(&mut mock);
        mock.expect_find_existing()
            .returning(|_| LookupResult::NotFound);
        mock.expect_insert()
            .returning(|_| Err(AppError::Internal("poisoned cache".to_string())));

        let items = vec![json!({"title": "Etude"})];
        let report = run(&mock, &items, &options(false)).await.unwrap();

        let message = report.items[0].error.as_deref().unwrap();
        assert!(message.starts_with("Unexpected error"), "{}", message);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_before_any_work() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("lessons");
        // No other expectations: touching any item would panic the mock.

        let err = run(&mock, &[], &options(false)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Lessons array is required and cannot be empty"
        );
    }

    #[tokio::test]
    async fn oversize_batch_is_rejected_before_any_work() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("lessons");

        let items: Vec<_> = (0..101).map(|n| json!({"n": n})).collect();
        let err = run(&mock, &items, &options(false)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot process more than 100 lessons at once"
        );
    }

    #[test]
    fn validate_only_never_touches_the_store() {
        let mut mock = MockBatchStrategy::new();
        mock.expect_entity_name().return_const("songs");
        mock.expect_validate().returning(|raw| {
            if raw["title"].as_str().map(|t| !t.is_empty()).unwrap_or(false) {
                Ok(raw.clone())
            } else {
                Err(ValidationFailure::new(vec![FieldError::required("title")]))
            }
        });
        // find_existing / insert / update have no expectations on purpose.

        let items = vec![json!({"title": "Etude"}), json!({"title": ""})];
        let report = run_validate_only(&mock, &items, &options(false)).unwrap();

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.valid, 1);
        assert_eq!(report.summary.invalid, 1);
        assert!(report.items[0].valid);
        assert!(!report.items[1].valid);
        assert_eq!(report.items[1].index, 1);
    }

    #[tokio::test]
    async fn delete_batch_reports_absent_records_as_skipped() {
        let mut mock = MockBatchDeleteStrategy::new();
        mock.expect_entity_name().return_const("songs");
        mock.expect_validate()
            .returning(|raw| {
                raw.as_i64().map(|id| id as i32).ok_or_else(|| {
                    ValidationFailure::new(vec![FieldError::new("id", "id must be an integer")])
                })
            });
        mock.expect_find_existing().returning(|key| {
            if *key == 1 {
                LookupResult::Found(1)
            } else {
                LookupResult::NotFound
            }
        });
        mock.expect_delete()
            .times(1)
            .withf(|key| *key == 1)
            .returning(|key| Ok(*key));

        let items = vec![json!(1), json!(2), json!("x")];
        let report = run_delete(&mock, &items, &options(false)).await.unwrap();

        assert_eq!(report.items[0].status, ItemStatus::Deleted);
        assert_eq!(report.items[1].status, ItemStatus::Skipped);
        assert_eq!(report.items[2].status, ItemStatus::Error);
        assert_eq!(report.summary.success, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.failed, 1);
    }
}
