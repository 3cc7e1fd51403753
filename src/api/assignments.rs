//! Song assignment endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{batch::BatchResponse, error::AppResult, models::assignment::Assignment, AppState};

use super::AuthenticatedUser;

/// Request body for bulk assignment upserts
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkAssignmentsRequest {
    /// Assignment candidates, one per (student, song) pair
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub assignments: Vec<Value>,
    /// Replace the progress state of pairs that already exist
    #[serde(default)]
    pub overwrite: bool,
}

/// Bulk assign songs to students
///
/// A pair that already exists is skipped, or its progress state replaced
/// when `overwrite` is set. A dangling student or song id fails only its
/// own item.
#[utoipa::path(
    post,
    path = "/assignments/bulk",
    tag = "assignments",
    request_body = BulkAssignmentsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse<Assignment>),
        (status = 400, description = "Batch rejected as a whole")
    )
)]
pub async fn bulk_upsert_assignments(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkAssignmentsRequest>,
) -> AppResult<Json<BatchResponse<Assignment>>> {
    claims.require_teacher()?;
    let report = state
        .services
        .assignments
        .bulk_upsert(&request.assignments, request.overwrite)
        .await?;
    Ok(Json(BatchResponse::from(report)))
}
