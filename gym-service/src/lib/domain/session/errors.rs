use thiserror::Error;

use crate::user::errors::UserError;

/// Errors raised by login, refresh and logout.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is inactive")]
    UserInactive,

    #[error("Invalid or revoked refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token has expired")]
    ExpiredRefreshToken,

    #[error("Refresh token already stored")]
    TokenConflict,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<UserError> for SessionError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidCredentials => SessionError::InvalidCredentials,
            UserError::Inactive => SessionError::UserInactive,
            UserError::DatabaseError(message) => SessionError::DatabaseError(message),
            other => SessionError::Unknown(other.to_string()),
        }
    }
}
