//! Song assignments repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::assignment::{Assignment, NewAssignment},
};

#[derive(Clone)]
pub struct AssignmentsRepository {
    pool: Pool<Postgres>,
}

impl AssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List assignments for a student
    pub async fn list_for_student(&self, student_id: i32) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE student_id = $1 ORDER BY created_at",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Find an assignment by its natural key (student + song)
    pub async fn find_by_student_song(
        &self,
        student_id: i32,
        song_id: i32,
    ) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE student_id = $1 AND song_id = $2",
        )
        .bind(student_id)
        .bind(song_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(assignment)
    }

    /// Insert a new assignment
    pub async fn insert(&self, assignment: &NewAssignment) -> AppResult<Assignment> {
        let row = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (student_id, song_id, status, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(assignment.student_id)
        .bind(assignment.song_id)
        .bind(assignment.status)
        .bind(assignment.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite an existing assignment with a fully normalized record
    pub async fn overwrite(&self, id: i32, assignment: &NewAssignment) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET status = $1, notes = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(assignment.status)
        .bind(assignment.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", id)))
    }
}
