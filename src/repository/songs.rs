//! Songs repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::song::{NewSong, Song, SongQuery, UpdateSong},
};

#[derive(Clone)]
pub struct SongsRepository {
    pool: Pool<Postgres>,
}

impl SongsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List songs with filters and pagination
    pub async fn list(&self, query: &SongQuery) -> AppResult<(Vec<Song>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 200);

        let rows = sqlx::query_as::<_, Song>(
            r#"
            SELECT * FROM songs
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR artist ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR status = $3)
            ORDER BY title, artist
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.title.as_deref())
        .bind(query.artist.as_deref())
        .bind(query.status.as_deref())
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)::bigint FROM songs
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR artist ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(query.title.as_deref())
        .bind(query.artist.as_deref())
        .bind(query.status.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Get song by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Song>> {
        let song = sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(song)
    }

    /// Find a song by its natural key (case-insensitive title + artist).
    /// A NULL artist only matches candidates without an artist.
    pub async fn find_by_title_artist(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> AppResult<Option<Song>> {
        let song = sqlx::query_as::<_, Song>(
            r#"
            SELECT * FROM songs
            WHERE lower(title) = lower($1)
              AND lower(artist) IS NOT DISTINCT FROM lower($2)
            "#,
        )
        .bind(title)
        .bind(artist)
        .fetch_optional(&self.pool)
        .await?;
        Ok(song)
    }

    /// Insert a new song
    pub async fn insert(&self, song: &NewSong) -> AppResult<Song> {
        let row = sqlx::query_as::<_, Song>(
            r#"
            INSERT INTO songs (title, artist, genre, difficulty, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&song.title)
        .bind(song.artist.as_deref())
        .bind(song.genre.as_deref())
        .bind(song.difficulty)
        .bind(song.status)
        .bind(song.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite an existing song with a fully normalized record
    pub async fn overwrite(&self, id: i32, song: &NewSong) -> AppResult<Song> {
        sqlx::query_as::<_, Song>(
            r#"
            UPDATE songs
            SET title = $1, artist = $2, genre = $3, difficulty = $4,
                status = $5, notes = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&song.title)
        .bind(song.artist.as_deref())
        .bind(song.genre.as_deref())
        .bind(song.difficulty)
        .bind(song.status)
        .bind(song.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Song {} not found", id)))
    }

    /// Apply a partial update; absent fields keep their current value
    pub async fn update(&self, id: i32, patch: &UpdateSong) -> AppResult<Song> {
        sqlx::query_as::<_, Song>(
            r#"
            UPDATE songs
            SET title = COALESCE($1, title),
                artist = COALESCE($2, artist),
                genre = COALESCE($3, genre),
                difficulty = COALESCE($4, difficulty),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.artist.as_deref())
        .bind(patch.genre.as_deref())
        .bind(patch.difficulty)
        .bind(patch.status)
        .bind(patch.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Song {} not found", id)))
    }

    /// Delete a song, returning its id
    pub async fn delete(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("DELETE FROM songs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Song {} not found", id)))
    }
}
