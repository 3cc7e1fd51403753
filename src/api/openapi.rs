//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assignments, auth, health, lessons, songs, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cadenza API",
        version = "0.3.0",
        description = "Music School Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Lessons
        lessons::list_lessons,
        lessons::get_lesson,
        lessons::create_lesson,
        lessons::update_lesson,
        lessons::delete_lesson,
        lessons::bulk_create_lessons,
        lessons::bulk_update_lessons,
        lessons::bulk_delete_lessons,
        // Songs
        songs::list_songs,
        songs::get_song,
        songs::create_song,
        songs::update_song,
        songs::delete_song,
        songs::bulk_import_songs,
        songs::bulk_delete_songs,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::list_student_assignments,
        // Assignments
        assignments::bulk_upsert_assignments,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::User,
            crate::models::enums::UserRole,
            // Lessons
            crate::models::lesson::Lesson,
            crate::models::lesson::LessonCandidate,
            crate::models::lesson::LessonUpdateCandidate,
            crate::models::enums::LessonStatus,
            lessons::BulkLessonsRequest,
            lessons::BulkLessonUpdatesRequest,
            lessons::BulkLessonDeleteRequest,
            // Songs
            crate::models::song::Song,
            crate::models::song::SongCandidate,
            crate::models::song::UpdateSong,
            crate::models::enums::SongStatus,
            songs::BulkSongsRequest,
            songs::BulkSongDeleteRequest,
            // Students
            crate::models::student::Student,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            // Assignments
            crate::models::assignment::Assignment,
            crate::models::enums::AssignmentStatus,
            assignments::BulkAssignmentsRequest,
            // Batch reporting
            crate::batch::BatchSummary,
            crate::batch::ItemStatus,
            crate::batch::FieldError,
            crate::batch::ItemErrorEntry,
            crate::batch::DeletedId,
            crate::batch::ValidationOutcome,
            crate::batch::ValidationSummary,
            crate::batch::ValidationResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "lessons", description = "Lesson scheduling, single and bulk"),
        (name = "songs", description = "Song catalog, single and bulk"),
        (name = "students", description = "Student management"),
        (name = "assignments", description = "Song assignments")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
