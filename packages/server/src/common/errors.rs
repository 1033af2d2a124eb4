use thiserror::Error;

use crate::kernel::database::DatabaseError;

/// Bad input shape or format. Always detected before any storage write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required and must be a non-empty string")]
    MissingField(&'static str),

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Invalid time format (expected H:MM or HH:MM)")]
    InvalidTime,

    #[error("Title must contain at least one letter or digit")]
    InvalidTitle,

    #[error("{0} must contain at least one entry")]
    EmptyList(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{0}")]
    InvalidImage(String),

    #[error("Invalid JSON in {0}")]
    InvalidJson(&'static str),
}

/// Error taxonomy shared by the event and booking domains.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Image upload failed: {0}")]
    Upload(String),
}

impl AppError {
    pub fn event_not_found() -> Self {
        AppError::NotFound("Event not found".to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Mail transport failures. Never allowed to fail a committed booking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Email transporter verification failed: {0}")]
    Verify(String),

    #[error("Email sending failed: {0}")]
    Send(String),

    #[error("Email task failed: {0}")]
    Task(String),
}

/// Returns the violated constraint name when `err` is a unique violation.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
