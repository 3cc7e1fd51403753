//! Lesson endpoints, single and bulk

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    batch::{BatchResponse, DeletedId, ValidationResponse},
    error::AppResult,
    models::lesson::{Lesson, LessonCandidate, LessonQuery, LessonUpdateCandidate},
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Request body for bulk lesson creation
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkLessonsRequest {
    /// Lesson candidates, validated per item
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub lessons: Vec<Value>,
    /// Replace lessons already occupying a candidate's slot
    #[serde(default)]
    pub overwrite: bool,
    /// Report validity per item without writing anything
    #[serde(default)]
    pub validate_only: bool,
}

/// Request body for bulk lesson updates
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkLessonUpdatesRequest {
    /// Updates, each carrying the target lesson id and the fields to change
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub updates: Vec<Value>,
}

/// Request body for bulk lesson deletion
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkLessonDeleteRequest {
    /// Lesson ids to delete
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub lessons: Vec<Value>,
}

/// List lessons with filters
#[utoipa::path(
    get,
    path = "/lessons",
    tag = "lessons",
    params(LessonQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of lessons", body = PaginatedResponse<Lesson>)
    )
)]
pub async fn list_lessons(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<LessonQuery>,
) -> AppResult<Json<PaginatedResponse<Lesson>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 200);
    let (items, total) = state.services.lessons.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get a single lesson
#[utoipa::path(
    get,
    path = "/lessons/{id}",
    tag = "lessons",
    params(("id" = i32, Path, description = "Lesson ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lesson found", body = Lesson),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn get_lesson(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Lesson>> {
    let lesson = state.services.lessons.get(id).await?;
    Ok(Json(lesson))
}

/// Create a single lesson
#[utoipa::path(
    post,
    path = "/lessons",
    tag = "lessons",
    request_body = LessonCandidate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 409, description = "Slot already taken")
    )
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(candidate): Json<LessonCandidate>,
) -> AppResult<(StatusCode, Json<Lesson>)> {
    claims.require_teacher()?;
    let lesson = state.services.lessons.create(candidate).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

/// Update a single lesson
#[utoipa::path(
    put,
    path = "/lessons/{id}",
    tag = "lessons",
    params(("id" = i32, Path, description = "Lesson ID")),
    request_body = LessonUpdateCandidate,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(candidate): Json<LessonUpdateCandidate>,
) -> AppResult<Json<Lesson>> {
    claims.require_teacher()?;
    let lesson = state.services.lessons.update(id, candidate).await?;
    Ok(Json(lesson))
}

/// Delete a single lesson
#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    tag = "lessons",
    params(("id" = i32, Path, description = "Lesson ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found")
    )
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_teacher()?;
    state.services.lessons.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk create lessons
///
/// Processes up to the configured maximum per request. Each candidate gets
/// an index-correlated outcome; one bad candidate never aborts the batch.
#[utoipa::path(
    post,
    path = "/lessons/bulk",
    tag = "lessons",
    request_body = BulkLessonsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse<Lesson>),
        (status = 400, description = "Batch rejected as a whole")
    )
)]
pub async fn bulk_create_lessons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkLessonsRequest>,
) -> AppResult<Response> {
    claims.require_teacher()?;
    if request.validate_only {
        let report = state.services.lessons.bulk_validate(&request.lessons)?;
        return Ok(Json(ValidationResponse::from(report)).into_response());
    }
    let report = state
        .services
        .lessons
        .bulk_create(&request.lessons, request.overwrite)
        .await?;
    Ok(Json(BatchResponse::from(report)).into_response())
}

/// Bulk update lessons by id
#[utoipa::path(
    put,
    path = "/lessons/bulk",
    tag = "lessons",
    request_body = BulkLessonUpdatesRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse<Lesson>),
        (status = 400, description = "Batch rejected as a whole")
    )
)]
pub async fn bulk_update_lessons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkLessonUpdatesRequest>,
) -> AppResult<Json<BatchResponse<Lesson>>> {
    claims.require_teacher()?;
    let report = state.services.lessons.bulk_update(&request.updates).await?;
    Ok(Json(BatchResponse::from(report)))
}

/// Bulk delete lessons by id
///
/// Ids that match nothing are reported as skipped, not as errors.
#[utoipa::path(
    delete,
    path = "/lessons/bulk",
    tag = "lessons",
    request_body = BulkLessonDeleteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse<DeletedId>),
        (status = 400, description = "Batch rejected as a whole")
    )
)]
pub async fn bulk_delete_lessons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkLessonDeleteRequest>,
) -> AppResult<Json<BatchResponse<DeletedId>>> {
    claims.require_teacher()?;
    let report = state.services.lessons.bulk_delete(&request.lessons).await?;
    Ok(Json(BatchResponse::from(report)))
}
