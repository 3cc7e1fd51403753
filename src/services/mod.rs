//! Business logic services

pub mod assignments;
pub mod auth;
pub mod lessons;
pub mod songs;
pub mod students;

use crate::{
    config::{AuthConfig, BatchConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub lessons: lessons::LessonsService,
    pub songs: songs::SongsService,
    pub students: students::StudentsService,
    pub assignments: assignments::AssignmentsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, batch_config: BatchConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            lessons: lessons::LessonsService::new(repository.clone(), batch_config.clone()),
            songs: songs::SongsService::new(repository.clone(), batch_config.clone()),
            students: students::StudentsService::new(repository.clone()),
            assignments: assignments::AssignmentsService::new(repository, batch_config),
        }
    }
}
