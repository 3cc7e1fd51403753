//! Song catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::batch::{FieldError, ValidationFailure};

use super::enums::SongStatus;

/// A song in the school's repertoire
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Song {
    pub id: i32,
    pub title: String,
    pub artist: Option<String>,
    pub genre: Option<String>,
    /// Difficulty rating, 1 (beginner) to 5 (advanced)
    pub difficulty: Option<i32>,
    pub status: SongStatus,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Normalized song record, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub difficulty: Option<i32>,
    pub status: SongStatus,
    pub notes: Option<String>,
}

/// Raw song candidate as submitted in a bulk import.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SongCandidate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Difficulty must be between 1 and 5"))]
    pub difficulty: Option<i32>,
    /// Catalog status (defaults to "active")
    pub status: Option<String>,
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,
}

impl SongCandidate {
    /// Enforce the non-empty title, apply defaults.
    pub fn normalize(self) -> Result<NewSong, ValidationFailure> {
        let mut fields = Vec::new();

        let title = match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Some(title.to_string()),
            Some(_) => {
                fields.push(FieldError::new("title", "title cannot be empty"));
                None
            }
            None => {
                fields.push(FieldError::required("title"));
                None
            }
        };

        let status = match self.status.as_deref() {
            Some(raw) => match raw.parse::<SongStatus>() {
                Ok(status) => status,
                Err(message) => {
                    fields.push(FieldError::new("status", message));
                    SongStatus::Active
                }
            },
            None => SongStatus::Active,
        };

        if !fields.is_empty() {
            return Err(ValidationFailure::new(fields));
        }

        Ok(NewSong {
            title: title.unwrap(),
            artist: self.artist.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            genre: self.genre,
            difficulty: self.difficulty,
            status,
            notes: self.notes,
        })
    }
}

/// Update song request (single PUT)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Difficulty must be between 1 and 5"))]
    pub difficulty: Option<i32>,
    pub status: Option<SongStatus>,
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,
}

/// Query parameters for listing songs
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SongQuery {
    /// Search in title
    pub title: Option<String>,
    /// Search by artist
    pub artist: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_required() {
        let candidate = SongCandidate {
            title: Some("  Blackbird  ".to_string()),
            ..Default::default()
        };
        let song = candidate.normalize().unwrap();
        assert_eq!(song.title, "Blackbird");
        assert_eq!(song.status, SongStatus::Active);

        let failure = SongCandidate {
            title: Some("   ".to_string()),
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert_eq!(failure.fields[0].field, "title");
    }

    #[test]
    fn blank_artist_is_normalized_to_none() {
        let candidate = SongCandidate {
            title: Some("Yesterday".to_string()),
            artist: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.normalize().unwrap().artist, None);
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        let failure = SongCandidate {
            title: Some("Yesterday".to_string()),
            status: Some("retired".to_string()),
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert!(failure.fields.iter().any(|f| f.field == "status"));
    }
}
