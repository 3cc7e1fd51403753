//! Song catalog service, including the bulk import strategies.

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
    models::song::{NewSong, Song, SongCandidate, SongQuery, UpdateSong},
    repository::Repository,
};

/// Bulk import: candidates are full song records, deduplicated on the
/// case-insensitive (title, artist) pair.
struct SongImportStrategy {
    repository: Repository,
}

#[async_trait]
impl BatchStrategy for SongImportStrategy {
    type Record = NewSong;
    type Key = i32;
    type Output = Song;

    fn entity_name(&self) -> &'static str {
        "songs"
    }

    fn validate(&self, raw: &Value) -> Result<NewSong, ValidationFailure> {
        let candidate: SongCandidate = serde_json::from_value(raw.clone())
            .map_err(|e| ValidationFailure::malformed(e.to_string()))?;
        candidate.validate().map_err(ValidationFailure::from)?;
        candidate.normalize()
    }

    async fn find_existing(&self, record: &NewSong) -> LookupResult<i32> {
        match self
            .repository
            .songs
            .find_by_title_artist(&record.title, record.artist.as_deref())
            .await
        {
            Ok(Some(song)) => LookupResult::Found(song.id),
            Ok(None) => LookupResult::NotFound,
            Err(err) => LookupResult::Failed(error_message(err)),
        }
    }

    async fn insert(&self, record: &NewSong) -> AppResult<Song> {
        self.repository.songs.insert(record).await
    }

    async fn update(&self, key: &i32, record: &NewSong) -> AppResult<Song> {
        self.repository.songs.overwrite(*key, record).await
    }
}

/// Bulk delete: candidates are bare song ids.
struct SongDeleteStrategy {
    repository: Repository,
}

#[async_trait]
impl BatchDeleteStrategy for SongDeleteStrategy {
    type Key = i32;
    type Output = DeletedId;

    fn entity_name(&self) -> &'static str {
        "songs"
    }

    fn validate(&self, raw: &Value) -> Result<i32, ValidationFailure> {
        raw.as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| {
                ValidationFailure::new(vec![FieldError::new("id", "id must be an integer")])
            })
    }

    async fn find_existing(&self, key: &i32) -> LookupResult<i32> {
        match self.repository.songs.get_by_id(*key).await {
            Ok(Some(song)) => LookupResult::Found(song.id),
            Ok(None) => LookupResult::NotFound,
            Err(err) => LookupResult::Failed(error_message(err)),
        }
    }

    async fn delete(&self, key: &i32) -> AppResult<DeletedId> {
        let id = self.repository.songs.delete(*key).await?;
        Ok(DeletedId { id })
    }
}

#[derive(Clone)]
pub struct SongsService {
    repository: Repository,
    batch: BatchConfig,
}

impl SongsService {
    pub fn new(repository: Repository, batch: BatchConfig) -> Self {
        Self { repository, batch }
    }

    fn options(&self, overwrite: bool) -> BatchOptions {
        BatchOptions {
            overwrite,
            max_items: self.batch.max_items,
        }
    }

    /// Bulk import songs, skipping or overwriting natural-key matches.
    pub async fn bulk_import(
        &self,
        items: &[Value],
        overwrite: bool,
    ) -> AppResult<BatchReport<Song>> {
        let strategy = SongImportStrategy {
            repository: self.repository.clone(),
        };
        Ok(batch::run(&strategy, items, &self.options(overwrite)).await?)
    }

    /// Validate song candidates without touching the store.
    pub fn bulk_validate(&self, items: &[Value]) -> AppResult<ValidationReport> {
        let strategy = SongImportStrategy {
            repository: self.repository.clone(),
        };
        Ok(batch::run_validate_only(&strategy, items, &self.options(false))?)
    }

    /// Bulk delete songs by id; absent ids are reported as skipped.
    pub async fn bulk_delete(&self, items: &[Value]) -> AppResult<BatchReport<DeletedId>> {
        let strategy = SongDeleteStrategy {
            repository: self.repository.clone(),
        };
        Ok(batch::run_delete(&strategy, items, &self.options(false)).await?)
    }

    /// List songs with filters
    pub async fn list(&self, query: &SongQuery) -> AppResult<(Vec<Song>, i64)> {
        self.repository.songs.list(query).await
    }

    /// Get song by ID
    pub async fn get(&self, id: i32) -> AppResult<Song> {
        self.repository
            .songs
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Song {} not found", id)))
    }

    /// Create a single song, rejecting a natural-key duplicate
    pub async fn create(&self, candidate: SongCandidate) -> AppResult<Song> {
        candidate.validate().map_err(ValidationFailure::from)?;
        let song = candidate.normalize()?;
        if self
            .repository
            .songs
            .find_by_title_artist(&song.title, song.artist.as_deref())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A song with this title and artist already exists".to_string(),
            ));
        }
        self.repository.songs.insert(&song).await
    }

    /// Update a single song
    pub async fn update(&self, id: i32, patch: UpdateSong) -> AppResult<Song> {
        patch.validate().map_err(ValidationFailure::from)?;
        self.repository.songs.update(id, &patch).await
    }

    /// Delete a single song
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.songs.delete(id).await?;
        Ok(())
    }
}
