//! Song catalog endpoints, single and bulk

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
    models::song::{Song, SongCandidate, SongQuery, UpdateSong},
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Request body for bulk song import
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkSongsRequest {
    /// Song candidates, validated per item
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub songs: Vec<Value>,
    /// Replace songs already matching a candidate's title and artist
    #[serde(default)]
    pub overwrite: bool,
    /// Report validity per item without writing anything
    #[serde(default)]
    pub validate_only: bool,
}

/// Request body for bulk song deletion
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkSongDeleteRequest {
    /// Song ids to delete
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub songs: Vec<Value>,
}

/// List songs with filters
#[utoipa::path(
    get,
    path = "/songs",
    tag = "songs",
    params(SongQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of songs", body = PaginatedResponse<Song>)
    )
)]
pub async fn list_songs(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<SongQuery>,
) -> AppResult<Json<PaginatedResponse<Song>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 200);
    let (items, total) = state.services.songs.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get a single song
#[utoipa::path(
    get,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i32, Path, description = "Song ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Song found", body = Song),
        (status = 404, description = "Song not found")
    )
)]
pub async fn get_song(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Song>> {
    let song = state.services.songs.get(id).await?;
    Ok(Json(song))
}

/// Add a single song to the catalog
#[utoipa::path(
    post,
    path = "/songs",
    tag = "songs",
    request_body = SongCandidate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Song created", body = Song),
        (status = 409, description = "Song already in the catalog")
    )
)]
pub async fn create_song(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(candidate): Json<SongCandidate>,
) -> AppResult<(StatusCode, Json<Song>)> {
    claims.require_teacher()?;
    let song = state.services.songs.create(candidate).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

/// Update a single song
#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i32, Path, description = "Song ID")),
    request_body = UpdateSong,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Song updated", body = Song),
        (status = 404, description = "Song not found")
    )
)]
pub async fn update_song(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<UpdateSong>,
) -> AppResult<Json<Song>> {
    claims.require_teacher()?;
    let song = state.services.songs.update(id, patch).await?;
    Ok(Json(song))
}

/// Delete a single song
#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = i32, Path, description = "Song ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 404, description = "Song not found")
    )
)]
pub async fn delete_song(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_teacher()?;
    state.services.songs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import songs into the catalog
///
/// Duplicates on the case-insensitive (title, artist) pair are skipped,
/// or replaced when `overwrite` is set.
#[utoipa::path(
    post,
    path = "/songs/bulk",
    tag = "songs",
    request_body = BulkSongsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse<Song>),
        (status = 400, description = "Batch rejected as a whole")
    )
)]
pub async fn bulk_import_songs(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkSongsRequest>,
) -> AppResult<Response> {
    claims.require_teacher()?;
    if request.validate_only {
        let report = state.services.songs.bulk_validate(&request.songs)?;
        return Ok(Json(ValidationResponse::from(report)).into_response());
    }
    let report = state
        .services
        .songs
        .bulk_import(&request.songs, request.overwrite)
        .await?;
    Ok(Json(BatchResponse::from(report)).into_response())
}

/// Bulk delete songs by id
#[utoipa::path(
    delete,
    path = "/songs/bulk",
    tag = "songs",
    request_body = BulkSongDeleteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse<DeletedId>),
        (status = 400, description = "Batch rejected as a whole")
    )
)]
pub async fn bulk_delete_songs(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkSongDeleteRequest>,
) -> AppResult<Json<BatchResponse<DeletedId>>> {
    claims.require_teacher()?;
    let report = state.services.songs.bulk_delete(&request.songs).await?;
    Ok(Json(BatchResponse::from(report)))
}
