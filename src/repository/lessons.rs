//! Lessons repository

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::lesson::{Lesson, LessonPatch, LessonQuery, NewLesson},
};

#[derive(Clone)]
pub struct LessonsRepository {
    pool: Pool<Postgres>,
}

impl LessonsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List lessons with filters and pagination
    pub async fn list(&self, query: &LessonQuery) -> AppResult<(Vec<Lesson>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 200);

        let rows = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT * FROM lessons
            WHERE ($1::int IS NULL OR teacher_id = $1)
              AND ($2::int IS NULL OR student_id = $2)
              AND ($3::date IS NULL OR date >= $3)
              AND ($4::date IS NULL OR date <= $4)
              AND ($5::text IS NULL OR status = $5)
            ORDER BY date, time
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(query.teacher_id)
        .bind(query.student_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.status.as_deref())
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)::bigint FROM lessons
            WHERE ($1::int IS NULL OR teacher_id = $1)
              AND ($2::int IS NULL OR student_id = $2)
              AND ($3::date IS NULL OR date >= $3)
              AND ($4::date IS NULL OR date <= $4)
              AND ($5::text IS NULL OR status = $5)
            "#,
        )
        .bind(query.teacher_id)
        .bind(query.student_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.status.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Get lesson by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lesson)
    }

    /// Find a lesson occupying the same slot (natural key for bulk create)
    pub async fn find_by_slot(
        &self,
        teacher_id: i32,
        student_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT * FROM lessons
            WHERE teacher_id = $1 AND student_id = $2 AND date = $3 AND time = $4
            "#,
        )
        .bind(teacher_id)
        .bind(student_id)
        .bind(date)
        .bind(time)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lesson)
    }

    /// Insert a new lesson
    pub async fn insert(&self, lesson: &NewLesson) -> AppResult<Lesson> {
        let row = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (teacher_id, student_id, date, time, duration_minutes, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(lesson.teacher_id)
        .bind(lesson.student_id)
        .bind(lesson.date)
        .bind(lesson.time)
        .bind(lesson.duration_minutes)
        .bind(lesson.status)
        .bind(lesson.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite an existing lesson with a fully normalized record
    pub async fn overwrite(&self, id: i32, lesson: &NewLesson) -> AppResult<Lesson> {
        sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET teacher_id = $1, student_id = $2, date = $3, time = $4,
                duration_minutes = $5, status = $6, notes = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(lesson.teacher_id)
        .bind(lesson.student_id)
        .bind(lesson.date)
        .bind(lesson.time)
        .bind(lesson.duration_minutes)
        .bind(lesson.status)
        .bind(lesson.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lesson {} not found", id)))
    }

    /// Apply a partial update; absent fields keep their current value
    pub async fn update(&self, id: i32, patch: &LessonPatch) -> AppResult<Lesson> {
        sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET teacher_id = COALESCE($1, teacher_id),
                student_id = COALESCE($2, student_id),
                date = COALESCE($3, date),
                time = COALESCE($4, time),
                duration_minutes = COALESCE($5, duration_minutes),
                status = COALESCE($6, status),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(patch.teacher_id)
        .bind(patch.student_id)
        .bind(patch.date)
        .bind(patch.time)
        .bind(patch.duration_minutes)
        .bind(patch.status)
        .bind(patch.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lesson {} not found", id)))
    }

    /// Delete a lesson, returning its id
    pub async fn delete(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("DELETE FROM lessons WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson {} not found", id)))
    }
}
