//! Lesson management service, including the bulk strategies.

use async_trait::async_trait;
use serde_json::Value;
use validator::Validate;

use crate::{
    batch::{
        self, error_message, BatchDeleteStrategy, BatchOptions, BatchReport, BatchStrategy,
        DeletedId, FieldError, LookupResult, ValidationFailure, ValidationReport,
    },
    config::BatchConfig,
    error::{AppError, AppResult},
    models::lesson::{Lesson, LessonCandidate, LessonQuery, LessonUpdate, LessonUpdateCandidate, NewLesson},
    repository::Repository,
};

/// Bulk create: candidates are full lesson records, deduplicated on the
/// (teacher, student, date, time) slot.
struct LessonCreateStrategy {
    repository: Repository,
}

#[async_trait]
impl BatchStrategy for LessonCreateStrategy {
    type Record = NewLesson;
    type Key = i32;
    type Output = Lesson;

    fn entity_name(&self) -> &'static str {
        "lessons"
    }

    fn validate(&self, raw: &Value) -> Result<NewLesson, ValidationFailure> {
        let candidate: LessonCandidate = serde_json::from_value(raw.clone())
            .map_err(|e| ValidationFailure::malformed(e.to_string()))?;
        candidate.validate().map_err(ValidationFailure::from)?;
        candidate.normalize()
    }

    async fn find_existing(&self, record: &NewLesson) -> LookupResult<i32> {
        match self
            .repository
            .lessons
            .find_by_slot(record.teacher_id, record.student_id, record.date, record.time)
            .await
        {
            Ok(Some(lesson)) => LookupResult::Found(lesson.id),
            Ok(None) => LookupResult::NotFound,
            Err(err) => LookupResult::Failed(error_message(err)),
        }
    }

    async fn insert(&self, record: &NewLesson) -> AppResult<Lesson> {
        self.repository.lessons.insert(record).await
    }

    async fn update(&self, key: &i32, record: &NewLesson) -> AppResult<Lesson> {
        self.repository.lessons.overwrite(*key, record).await
    }
}

/// Bulk update: candidates carry the target lesson id plus a patch.
/// A missing target is reported as a per-item error, never as a create.
struct LessonUpdateStrategy {
    repository: Repository,
}

#[async_trait]
impl BatchStrategy for LessonUpdateStrategy {
    type Record = LessonUpdate;
    type Key = i32;
    type Output = Lesson;

    fn entity_name(&self) -> &'static str {
        "updates"
    }

    fn validate(&self, raw: &Value) -> Result<LessonUpdate, ValidationFailure> {
        let candidate: LessonUpdateCandidate = serde_json::from_value(raw.clone())
            .map_err(|e| ValidationFailure::malformed(e.to_string()))?;
        candidate.validate().map_err(ValidationFailure::from)?;
        candidate.normalize()
    }

    async fn find_existing(&self, record: &LessonUpdate) -> LookupResult<i32> {
        match self.repository.lessons.get_by_id(record.id).await {
            Ok(Some(lesson)) => LookupResult::Found(lesson.id),
            Ok(None) => LookupResult::NotFound,
            Err(err) => LookupResult::Failed(error_message(err)),
        }
    }

    async fn insert(&self, record: &LessonUpdate) -> AppResult<Lesson> {
        // An update batch never creates; the resolver lands here when the
        // target id does not exist.
        Err(AppError::NotFound(format!(
            "Lesson {} not found",
            record.id
        )))
    }

    async fn update(&self, key: &i32, record: &LessonUpdate) -> AppResult<Lesson> {
        self.repository.lessons.update(*key, &record.patch).await
    }
}

/// Bulk delete: candidates are bare lesson ids.
struct LessonDeleteStrategy {
    repository: Repository,
}

#[async_trait]
impl BatchDeleteStrategy for LessonDeleteStrategy {
    type Key = i32;
    type Output = DeletedId;

    fn entity_name(&self) -> &'static str {
        "lessons"
    }

    fn validate(&self, raw: &Value) -> Result<i32, ValidationFailure> {
        raw.as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| {
                ValidationFailure::new(vec![FieldError::new("id", "id must be an integer")])
            })
    }

    async fn find_existing(&self, key: &i32) -> LookupResult<i32> {
        match self.repository.lessons.get_by_id(*key).await {
            Ok(Some(lesson)) => LookupResult::Found(lesson.id),
            Ok(None) => LookupResult::NotFound,
            Err(err) => LookupResult::Failed(error_message(err)),
        }
    }

    async fn delete(&self, key: &i32) -> AppResult<DeletedId> {
        let id = self.repository.lessons.delete(*key).await?;
        Ok(DeletedId { id })
    }
}

#[derive(Clone)]
pub struct LessonsService {
    repository: Repository,
    batch: BatchConfig,
}

impl LessonsService {
    pub fn new(repository: Repository, batch: BatchConfig) -> Self {
        Self { repository, batch }
    }

    fn options(&self, overwrite: bool) -> BatchOptions {
        BatchOptions {
            overwrite,
            max_items: self.batch.max_items,
        }
    }

    /// Bulk create lessons; every candidate gets an index-correlated outcome.
    pub async fn bulk_create(
        &self,
        items: &[Value],
        overwrite: bool,
    ) -> AppResult<BatchReport<Lesson>> {
        let strategy = LessonCreateStrategy {
            repository: self.repository.clone(),
        };
        Ok(batch::run(&strategy, items, &self.options(overwrite)).await?)
    }

    /// Validate lesson candidates without touching the store.
    pub fn bulk_validate(&self, items: &[Value]) -> AppResult<ValidationReport> {
        let strategy = LessonCreateStrategy {
            repository: self.repository.clone(),
        };
        Ok(batch::run_validate_only(&strategy, items, &self.options(false))?)
    }

    /// Bulk update lessons by id.
    pub async fn bulk_update(&self, items: &[Value]) -> AppResult<BatchReport<Lesson>> {
        let strategy = LessonUpdateStrategy {
            repository: self.repository.clone(),
        };
        // Updates always overwrite the matched lesson.
        Ok(batch::run(&strategy, items, &self.options(true)).await?)
    }

    /// Bulk delete lessons by id; absent ids are reported as skipped.
    pub async fn bulk_delete(&self, items: &[Value]) -> AppResult<BatchReport<DeletedId>> {
        let strategy = LessonDeleteStrategy {
            repository: self.repository.clone(),
        };
        Ok(batch::run_delete(&strategy, items, &self.options(false)).await?)
    }

    /// List lessons with filters
    pub async fn list(&self, query: &LessonQuery) -> AppResult<(Vec<Lesson>, i64)> {
        self.repository.lessons.list(query).await
    }

    /// Get lesson by ID
    pub async fn get(&self, id: i32) -> AppResult<Lesson> {
        self.repository
            .lessons
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson {} not found", id)))
    }

    /// Create a single lesson, rejecting an already-occupied slot
    pub async fn create(&self, candidate: LessonCandidate) -> AppResult<Lesson> {
        candidate.validate().map_err(ValidationFailure::from)?;
        let lesson = candidate.normalize()?;
        if self
            .repository
            .lessons
            .find_by_slot(lesson.teacher_id, lesson.student_id, lesson.date, lesson.time)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A lesson already exists in this slot".to_string(),
            ));
        }
        self.repository.lessons.insert(&lesson).await
    }

    /// Update a single lesson
    pub async fn update(&self, id: i32, mut candidate: LessonUpdateCandidate) -> AppResult<Lesson> {
        candidate.id = Some(id);
        candidate.validate().map_err(ValidationFailure::from)?;
        let update = candidate.normalize()?;
        self.repository.lessons.update(update.id, &update.patch).await
    }

    /// Delete a single lesson
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.lessons.delete(id).await?;
        Ok(())
    }
}
