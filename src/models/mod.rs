//! Domain models

pub mod assignment;
pub mod enums;
pub mod lesson;
pub mod song;
pub mod student;
pub mod user;

pub use enums::{AssignmentStatus, LessonStatus, SongStatus, UserRole};
