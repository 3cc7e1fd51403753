//! Repository layer for database operations

pub mod assignments;
pub mod lessons;
pub mod songs;
pub mod students;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub lessons: lessons::LessonsRepository,
    pub songs: songs::SongsRepository,
    pub students: students::StudentsRepository,
    pub assignments: assignments::AssignmentsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            lessons: lessons::LessonsRepository::new(pool.clone()),
            songs: songs::SongsRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            assignments: assignments::AssignmentsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
