//! Song assignment service, including the bulk upsert strategy.

use async_trait::async_trait;
use serde_json::Value;
use validator::Validate;

use crate::{
    batch::{
        self, error_message, BatchOptions, BatchReport, BatchStrategy, LookupResult,
        ValidationFailure,
    },
    config::BatchConfig,
    error::AppResult,
    models::assignment::{Assignment, AssignmentCandidate, NewAssignment},
    repository::Repository,
};

/// Bulk upsert: candidates are (student, song) pairs with progress state,
/// deduplicated on that pair.
struct AssignmentUpsertStrategy {
    repository: Repository,
}

#[async_trait]
impl BatchStrategy for AssignmentUpsertStrategy {
    type Record = NewAssignment;
    type Key = i32;
    type Output = Assignment;

    fn entity_name(&self) -> &'static str {
        "assignments"
    }

    fn validate(&self, raw: &Value) -> Result<NewAssignment, ValidationFailure> {
        let candidate: AssignmentCandidate = serde_json::from_value(raw.clone())
            .map_err(|e| ValidationFailure::malformed(e.to_string()))?;
        candidate.validate().map_err(ValidationFailure::from)?;
        candidate.normalize()
    }

    async fn find_existing(&self, record: &NewAssignment) -> LookupResult<i32> {
        match self
            .repository
            .assignments
            .find_by_student_song(record.student_id, record.song_id)
            .await
        {
            Ok(Some(assignment)) => LookupResult::Found(assignment.id),
            Ok(None) => LookupResult::NotFound,
            Err(err) => LookupResult::Failed(error_message(err)),
        }
    }

    async fn insert(&self, record: &NewAssignment) -> AppResult<Assignment> {
        // A dangling student or song id surfaces as the store's foreign key
        // error for this item alone.
        self.repository.assignments.insert(record).await
    }

    async fn update(&self, key: &i32, record: &NewAssignment) -> AppResult<Assignment> {
        self.repository.assignments.overwrite(*key, record).await
    }
}

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
    batch: BatchConfig,
}

impl AssignmentsService {
    pub fn new(repository: Repository, batch: BatchConfig) -> Self {
        Self { repository, batch }
    }

    /// Bulk upsert assignments for students.
    pub async fn bulk_upsert(
        &self,
        items: &[Value],
        overwrite: bool,
    ) -> AppResult<BatchReport<Assignment>> {
        let strategy = AssignmentUpsertStrategy {
            repository: self.repository.clone(),
        };
        let options = BatchOptions {
            overwrite,
            max_items: self.batch.max_items,
        };
        Ok(batch::run(&strategy, items, &options).await?)
    }

    /// List assignments for a student
    pub async fn list_for_student(&self, student_id: i32) -> AppResult<Vec<Assignment>> {
        // Surface a 404 for an unknown student rather than an empty list
        self.repository.students.get_by_id(student_id).await?;
        self.repository.assignments.list_for_student(student_id).await
    }
}
