//! Student models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A student enrolled at the school
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free-form level label ("beginner", "grade 3", ...)
    pub level: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub level: Option<String>,
    pub notes: Option<String>,
}

/// Update student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub level: Option<String>,
    pub notes: Option<String>,
}

/// Query parameters for listing students
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StudentQuery {
    /// Search in first or last name
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
