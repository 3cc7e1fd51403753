//! Student management service

use validator::Validate;

use crate::{
    batch::ValidationFailure,
    error::AppResult,
    models::student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List students with search
    pub async fn list(&self, query: &StudentQuery) -> AppResult<(Vec<Student>, i64)> {
        self.repository.students.list(query).await
    }

    /// Get student by ID
    pub async fn get(&self, id: i32) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    /// Create a new student
    pub async fn create(&self, student: CreateStudent) -> AppResult<Student> {
        student.validate().map_err(ValidationFailure::from)?;
        self.repository.students.insert(&student).await
    }

    /// Update a student
    pub async fn update(&self, id: i32, patch: UpdateStudent) -> AppResult<Student> {
        patch.validate().map_err(ValidationFailure::from)?;
        self.repository.students.update(id, &patch).await
    }

    /// Delete a student
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.students.delete(id).await?;
        Ok(())
    }
}
