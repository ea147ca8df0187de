use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{LogEntry, LogFilter, LogRow, NewLogEntry};
use crate::db::PgStore;

#[async_trait]
pub trait LogRepo: Send + Sync {
    async fn append_log(&self, user_id: Uuid, entry: NewLogEntry) -> anyhow::Result<LogEntry>;

    /// Newest first.
    async fn list_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>>;
}

#[async_trait]
impl LogRepo for PgStore {
    async fn append_log(&self, user_id: Uuid, entry: NewLogEntry) -> anyhow::Result<LogEntry> {
        let row = sqlx::query_as::<_, LogRow>(
            r#"
            INSERT INTO logs (id, user_id, level, message, context)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, level, message, context, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry.level.as_str())
        .bind(&entry.message)
        .bind(&entry.context)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn list_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, LogRow>(
            r#"
            SELECT id, user_id, level, message, context, created_at
              FROM logs
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::text IS NULL OR level = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.level.map(|l| l.as_str()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(LogEntry::try_from).collect()
    }
}
