//! User and authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

use super::enums::UserRole;

/// A staff account (admin or teacher)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user_id: i32,
    pub role: UserRole,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Require teacher or admin privileges
    pub fn require_teacher(&self) -> Result<(), AppError> {
        match self.role {
            UserRole::Admin | UserRole::Teacher => Ok(()),
            UserRole::Student => Err(AppError::Authorization(
                "Teacher privileges required".to_string(),
            )),
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = UserClaims {
            sub: "piano.teacher".to_string(),
            user_id: 7,
            role: UserRole::Teacher,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, UserRole::Teacher);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = UserClaims {
            sub: "piano.teacher".to_string(),
            user_id: 7,
            role: UserRole::Teacher,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn teachers_cannot_pass_admin_checks() {
        let claims = UserClaims {
            sub: "piano.teacher".to_string(),
            user_id: 7,
            role: UserRole::Teacher,
            exp: 0,
            iat: 0,
        };
        assert!(claims.require_teacher().is_ok());
        assert!(claims.require_admin().is_err());
    }

    #[test]
    fn students_cannot_pass_any_privilege_check() {
        let claims = UserClaims {
            sub: "cello.student".to_string(),
            user_id: 12,
            role: UserRole::Student,
            exp: 0,
            iat: 0,
        };
        assert!(claims.require_teacher().is_err());
        assert!(claims.require_admin().is_err());
    }
}
