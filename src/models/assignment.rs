//! Song assignment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::batch::{FieldError, ValidationFailure};

use super::enums::AssignmentStatus;

/// A song assigned to a student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub student_id: i32,
    pub song_id: i32,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Normalized assignment record, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub student_id: i32,
    pub song_id: i32,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
}

/// Raw assignment candidate as submitted in a bulk upsert.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct AssignmentCandidate {
    pub student_id: Option<i32>,
    pub song_id: Option<i32>,
    /// Progress status (defaults to "assigned")
    pub status: Option<String>,
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,
}

impl AssignmentCandidate {
    pub fn normalize(self) -> Result<NewAssignment, ValidationFailure> {
        let mut fields = Vec::new();

        let student_id = self.student_id;
        if student_id.is_none() {
            fields.push(FieldError::required("student_id"));
        }
        let song_id = self.song_id;
        if song_id.is_none() {
            fields.push(FieldError::required("song_id"));
        }

        let status = match self.status.as_deref() {
            Some(raw) => match raw.parse::<AssignmentStatus>() {
                Ok(status) => status,
                Err(message) => {
                    fields.push(FieldError::new("status", message));
                    AssignmentStatus::Assigned
                }
            },
            None => AssignmentStatus::Assigned,
        };

        if !fields.is_empty() {
            return Err(ValidationFailure::new(fields));
        }

        Ok(NewAssignment {
            student_id: student_id.unwrap(),
            song_id: song_id.unwrap(),
            status,
            notes: self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_assigned() {
        let assignment = AssignmentCandidate {
            student_id: Some(1),
            song_id: Some(2),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Assigned);
    }

    #[test]
    fn both_ids_are_required() {
        let failure = AssignmentCandidate::default().normalize().unwrap_err();
        let missing: Vec<_> = failure.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(missing, vec!["student_id", "song_id"]);
    }
}
