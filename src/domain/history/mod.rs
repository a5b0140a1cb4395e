use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successful generation, as handed to the history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Matches the `filename` in the response's content disposition
    pub invocation_id: Uuid,
    pub user: String,
    pub text: Option<String>,
    pub avatar_filename: String,
    /// Where the video was written. The workspace is removed once the
    /// response is built, so this path does not outlive the request.
    pub output_path: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("history store error: {0}")]
    Store(String),
}

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        PersistenceError::Store(err.to_string())
    }
}

/// Store for generation history. Writes are fire-and-forget from the
/// pipeline's point of view.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn record(&self, record: &GenerationRecord) -> Result<(), PersistenceError>;
}
