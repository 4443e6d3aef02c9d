use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

use crate::error::AppError;

const FLASH_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// One-shot message carried in the session until the next view reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

pub async fn push(session: &Session, level: FlashLevel, message: impl Into<String>) {
    let mut pending: Vec<Flash> = session
        .get(FLASH_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(Flash {
        level,
        message: message.into(),
    });
    if let Err(e) = session.insert(FLASH_KEY, pending).await {
        warn!(error = %e, "failed to store flash message");
    }
}

pub async fn take(session: &Session) -> Vec<Flash> {
    session
        .remove::<Vec<Flash>>(FLASH_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Flashes the outcome of a write: `success` on Ok, the error's own level otherwise.
pub async fn report<T>(session: &Session, outcome: &Result<T, AppError>, success: &str) {
    match outcome {
        Ok(_) => push(session, FlashLevel::Success, success).await,
        Err(e) => push(session, e.flash_level(), e.user_message()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn flashes_are_drained_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        push(&session, FlashLevel::Success, "Course added successfully!").await;
        push(&session, FlashLevel::Danger, "Course ID already exists.").await;

        let got = take(&session).await;
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].level, FlashLevel::Success);
        assert_eq!(got[1].message, "Course ID already exists.");

        assert!(take(&session).await.is_empty());
    }

    #[tokio::test]
    async fn report_uses_error_level() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let outcome: Result<(), AppError> = Err(AppError::NotFound("Student not found.".into()));
        report(&session, &outcome, "unused").await;

        let got = take(&session).await;
        assert_eq!(
            got,
            vec![Flash {
                level: FlashLevel::Warning,
                message: "Student not found.".into()
            }]
        );
    }
}
