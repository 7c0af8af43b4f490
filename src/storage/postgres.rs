use crate::models::VisitRow;
use crate::storage::{StorageError, StorageResult, VisitStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Insert a visit with an explicit timestamp (backfills and fixtures)
    pub async fn insert_visit_at(&self, page_path: &str, at: DateTime<Utc>) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics (page_path, created_at)
            VALUES ($1, $2)
            "#,
        )
        .bind(page_path)
        .bind(at.timestamp_millis())
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl VisitStore for PostgresStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics (
                id BIGSERIAL PRIMARY KEY,
                page_path TEXT NOT NULL,
                created_at BIGINT NOT NULL
                    DEFAULT (extract(epoch from clock_timestamp()) * 1000)::bigint
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_analytics_created_at ON analytics(created_at)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn insert_visit(&self, page_path: &str) -> StorageResult<()> {
        // created_at comes from the column default, i.e. the database clock
        sqlx::query("INSERT INTO analytics (page_path) VALUES ($1)")
            .bind(page_path)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn count_visits(&self, since: Option<DateTime<Utc>>) -> StorageResult<u64> {
        let count: (i64,) = match since {
            Some(since) => {
                sqlx::query_as("SELECT COUNT(*) FROM analytics WHERE created_at >= $1")
                    .bind(since.timestamp_millis())
                    .fetch_one(self.pool.as_ref())
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM analytics")
                    .fetch_one(self.pool.as_ref())
                    .await?
            }
        };

        Ok(count.0.max(0) as u64)
    }

    async fn fetch_visits(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<VisitRow>> {
        let rows = sqlx::query_as::<_, (i64, Option<String>)>(
            r#"
            SELECT created_at, page_path
            FROM analytics
            WHERE created_at >= $1 AND created_at < $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(start.timestamp_millis())
        .bind(end.timestamp_millis())
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter()
            .map(|(created_at, page_path)| {
                VisitRow::from_millis(created_at, page_path).ok_or_else(|| {
                    StorageError::Malformed(format!("timestamp out of range: {created_at}"))
                })
            })
            .collect()
    }
}
