use crate::domain::history::{GenerationRecord, HistoryRepository, PersistenceError};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use std::sync::Arc;

/// Postgres-backed generation history
pub struct PgHistoryRepository {
    pool: Arc<DbPool>,
}

impl PgHistoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn record(&self, record: &GenerationRecord) -> Result<(), PersistenceError> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO generation_history (id, user_identity, text, avatar_filename, output_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.invocation_id)
        .bind(&record.user)
        .bind(&record.text)
        .bind(&record.avatar_filename)
        .bind(&record.output_path)
        .bind(record.timestamp)
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// History sink used when no database is configured: records go to the log.
pub struct LogHistoryRepository;

#[async_trait]
impl HistoryRepository for LogHistoryRepository {
    async fn record(&self, record: &GenerationRecord) -> Result<(), PersistenceError> {
        tracing::info!(
            invocation_id = %record.invocation_id,
            user = %record.user,
            avatar_filename = %record.avatar_filename,
            output_path = %record.output_path,
            text_length = record.text.as_ref().map(|t| t.len()).unwrap_or(0),
            timestamp = %record.timestamp,
            "Generation recorded"
        );
        Ok(())
    }
}
