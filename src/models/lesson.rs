//! Lesson models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::batch::{FieldError, ValidationFailure};

use super::enums::LessonStatus;

/// A scheduled lesson between a teacher and a student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: i32,
    pub teacher_id: i32,
    pub student_id: i32,
    /// Lesson date
    pub date: NaiveDate,
    /// Start time
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub status: LessonStatus,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Normalized lesson record, ready for persistence. Defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesson {
    pub teacher_id: i32,
    pub student_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub status: LessonStatus,
    pub notes: Option<String>,
}

/// Raw lesson candidate as submitted in a bulk request.
///
/// Every field is optional so that missing or malformed values can be
/// reported per field instead of failing the whole deserialization.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LessonCandidate {
    pub teacher_id: Option<i32>,
    pub student_id: Option<i32>,
    /// Lesson date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Start time (HH:MM)
    pub time: Option<String>,
    #[validate(range(min = 5, max = 240, message = "Duration must be between 5 and 240 minutes"))]
    pub duration_minutes: Option<i32>,
    /// Lesson status (defaults to "scheduled")
    pub status: Option<String>,
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,
}

impl LessonCandidate {
    /// Enforce required fields, parse date/time strings, apply defaults.
    pub fn normalize(self) -> Result<NewLesson, ValidationFailure> {
        let mut fields = Vec::new();

        let teacher_id = self.teacher_id;
        if teacher_id.is_none() {
            fields.push(FieldError::required("teacher_id"));
        }
        let student_id = self.student_id;
        if student_id.is_none() {
            fields.push(FieldError::required("student_id"));
        }

        let date = match self.date.as_deref() {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    fields.push(FieldError::new("date", "date must be YYYY-MM-DD"));
                    None
                }
            },
            None => {
                fields.push(FieldError::required("date"));
                None
            }
        };

        let time = match self.time.as_deref() {
            Some(raw) => match NaiveTime::parse_from_str(raw, "%H:%M") {
                Ok(time) => Some(time),
                Err(_) => {
                    fields.push(FieldError::new("time", "time must be HH:MM"));
                    None
                }
            },
            None => {
                fields.push(FieldError::required("time"));
                None
            }
        };

        let status = match self.status.as_deref() {
            Some(raw) => match raw.parse::<LessonStatus>() {
                Ok(status) => status,
                Err(message) => {
                    fields.push(FieldError::new("status", message));
                    LessonStatus::Scheduled
                }
            },
            None => LessonStatus::Scheduled,
        };

        if !fields.is_empty() {
            return Err(ValidationFailure::new(fields));
        }

        Ok(NewLesson {
            teacher_id: teacher_id.unwrap(),
            student_id: student_id.unwrap(),
            date: date.unwrap(),
            time: time.unwrap(),
            duration_minutes: self.duration_minutes.unwrap_or(30),
            status,
            notes: self.notes,
        })
    }
}

/// Patch applied to an existing lesson. `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonPatch {
    pub teacher_id: Option<i32>,
    pub student_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub status: Option<LessonStatus>,
    pub notes: Option<String>,
}

/// Normalized bulk-update record: target id plus the patch to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonUpdate {
    pub id: i32,
    pub patch: LessonPatch,
}

/// Raw lesson update candidate (bulk update, or single PUT with the id
/// taken from the path).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LessonUpdateCandidate {
    pub id: Option<i32>,
    pub teacher_id: Option<i32>,
    pub student_id: Option<i32>,
    /// Lesson date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Start time (HH:MM)
    pub time: Option<String>,
    #[validate(range(min = 5, max = 240, message = "Duration must be between 5 and 240 minutes"))]
    pub duration_minutes: Option<i32>,
    pub status: Option<String>,
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,
}

impl LessonUpdateCandidate {
    pub fn normalize(self) -> Result<LessonUpdate, ValidationFailure> {
        let mut fields = Vec::new();

        let id = self.id;
        if id.is_none() {
            fields.push(FieldError::required("id"));
        }

        let date = match self.date.as_deref() {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    fields.push(FieldError::new("date", "date must be YYYY-MM-DD"));
                    None
                }
            },
            None => None,
        };

        let time = match self.time.as_deref() {
            Some(raw) => match NaiveTime::parse_from_str(raw, "%H:%M") {
                Ok(time) => Some(time),
                Err(_) => {
                    fields.push(FieldError::new("time", "time must be HH:MM"));
                    None
                }
            },
            None => None,
        };

        let status = match self.status.as_deref() {
            Some(raw) => match raw.parse::<LessonStatus>() {
                Ok(status) => Some(status),
                Err(message) => {
                    fields.push(FieldError::new("status", message));
                    None
                }
            },
            None => None,
        };

        if !fields.is_empty() {
            return Err(ValidationFailure::new(fields));
        }

        Ok(LessonUpdate {
            id: id.unwrap(),
            patch: LessonPatch {
                teacher_id: self.teacher_id,
                student_id: self.student_id,
                date,
                time,
                duration_minutes: self.duration_minutes,
                status,
                notes: self.notes,
            },
        })
    }
}

/// Query parameters for listing lessons
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LessonQuery {
    pub teacher_id: Option<i32>,
    pub student_id: Option<i32>,
    /// Filter lessons from this date (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// Filter lessons until this date (YYYY-MM-DD)
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_defaults() {
        let candidate = LessonCandidate {
            teacher_id: Some(1),
            student_id: Some(2),
            date: Some("2026-09-01".to_string()),
            time: Some("14:30".to_string()),
            ..Default::default()
        };
        let lesson = candidate.normalize().unwrap();
        assert_eq!(lesson.status, LessonStatus::Scheduled);
        assert_eq!(lesson.duration_minutes, 30);
    }

    #[test]
    fn normalize_reports_every_missing_field() {
        let failure = LessonCandidate::default().normalize().unwrap_err();
        let missing: Vec<_> = failure.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(missing, vec!["teacher_id", "student_id", "date", "time"]);
    }

    #[test]
    fn normalize_rejects_malformed_date_and_time() {
        let candidate = LessonCandidate {
            teacher_id: Some(1),
            student_id: Some(2),
            date: Some("01/09/2026".to_string()),
            time: Some("2pm".to_string()),
            ..Default::default()
        };
        let failure = candidate.normalize().unwrap_err();
        assert_eq!(failure.message, "Validation failed");
        assert!(failure.fields.iter().any(|f| f.field == "date"));
        assert!(failure.fields.iter().any(|f| f.field == "time"));
    }

    #[test]
    fn update_candidate_requires_id() {
        let failure = LessonUpdateCandidate::default().normalize().unwrap_err();
        assert_eq!(failure.fields[0].field, "id");
    }
}
