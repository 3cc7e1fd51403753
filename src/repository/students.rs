//! Students repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::student::{CreateStudent, Student, StudentQuery, UpdateStudent},
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List students with search and pagination
    pub async fn list(&self, query: &StudentQuery) -> AppResult<(Vec<Student>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 200);

        let rows = sqlx::query_as::<_, Student>(
            r#"
            SELECT * FROM students
            WHERE ($1::text IS NULL
                   OR first_name ILIKE '%' || $1 || '%'
                   OR last_name ILIKE '%' || $1 || '%')
            ORDER BY last_name, first_name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.search.as_deref())
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)::bigint FROM students
            WHERE ($1::text IS NULL
                   OR first_name ILIKE '%' || $1 || '%'
                   OR last_name ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(query.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))
    }

    /// Insert a new student
    pub async fn insert(&self, student: &CreateStudent) -> AppResult<Student> {
        let row = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (first_name, last_name, email, phone, level, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(student.email.as_deref())
        .bind(student.phone.as_deref())
        .bind(student.level.as_deref())
        .bind(student.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a partial update; absent fields keep their current value
    pub async fn update(&self, id: i32, patch: &UpdateStudent) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                level = COALESCE($5, level),
                notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.level.as_deref())
        .bind(patch.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))
    }

    /// Delete a student, returning their id
    pub async fn delete(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("DELETE FROM students WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))
    }
}
