use thiserror::Error;
use tracing::error;

use crate::flash::FlashLevel;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Attendance pass rolled back; the database text is shown to the admin.
    #[error("Error saving attendance: {0}")]
    AttendanceBatch(sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn flash_level(&self) -> FlashLevel {
        match self {
            AppError::NotFound(_) => FlashLevel::Warning,
            _ => FlashLevel::Danger,
        }
    }

    /// Message safe to show to the caller. Backend failures are logged here
    /// and replaced by a generic line.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(m) | AppError::Conflict(m) | AppError::NotFound(m) => m.clone(),
            AppError::AttendanceBatch(_) => self.to_string(),
            AppError::Database(e) => {
                error!(error = %e, "database failure");
                "Something went wrong, please try again.".into()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal failure");
                "Something went wrong, please try again.".into()
            }
        }
    }
}

/// Maps unique and foreign-key violations to a user-facing conflict; other
/// database errors pass through unchanged.
pub fn conflict_on_violation(err: sqlx::Error, msg: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            return AppError::Conflict(msg.to_string());
        }
    }
    AppError::Database(err)
}
