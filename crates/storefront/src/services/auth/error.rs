//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::error::conflict_message;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] homestyle_core::EmailError),

    /// Username missing or malformed.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username or email already registered. Holds the field.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidEmail(_)
            | Self::InvalidUsername(_)
            | Self::UserAlreadyExists(_)
            | Self::WeakPassword(_) => StatusCode::BAD_REQUEST,
            Self::Repository(_) | Self::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid username or password".to_string(),
            Self::UserAlreadyExists(field) => conflict_message(field),
            Self::InvalidEmail(e) => format!("Invalid email address: {e}"),
            Self::InvalidUsername(msg) | Self::WeakPassword(msg) => msg.clone(),
            Self::Repository(e) => e.to_string(),
            Self::PasswordHash => "Password hashing failed".to_string(),
        }
    }
}
