//! Student endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        assignment::Assignment,
        student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    params(StudentQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of students", body = PaginatedResponse<Student>)
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<PaginatedResponse<Student>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 200);
    let (items, total) = state.services.students.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get a single student
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i32, Path, description = "Student ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Student>> {
    let student = state.services.students.get(id).await?;
    Ok(Json(student))
}

/// Register a new student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudent,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(student): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    claims.require_teacher()?;
    let student = state.services.students.create(student).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = UpdateStudent,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<UpdateStudent>,
) -> AppResult<Json<Student>> {
    claims.require_teacher()?;
    let student = state.services.students.update(id, patch).await?;
    Ok(Json(student))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i32, Path, description = "Student ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a student's song assignments
#[utoipa::path(
    get,
    path = "/students/{id}/assignments",
    tag = "students",
    params(("id" = i32, Path, description = "Student ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assignments for the student", body = Vec<Assignment>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn list_student_assignments(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Assignment>>> {
    let assignments = state.services.assignments.list_for_student(id).await?;
    Ok(Json(assignments))
}
