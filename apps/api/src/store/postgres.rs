use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::store::KeyValueStorage;

/// Key/value rows in a single PostgreSQL table.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Opens a small pool; the store issues one query at a time.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        info!("PostgreSQL connection pool established");
        Self::new(pool).await
    }

    /// Wraps the pool and creates the table if it does not exist yet.
    pub async fn new(pool: PgPool) -> Result<Self, AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resume_kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&pool)
        .await?;
        info!("PostgreSQL storage table ready");
        Ok(PgStorage { pool })
    }
}

#[async_trait]
impl KeyValueStorage for PgStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT value FROM resume_kv WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resume_kv (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM resume_kv WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
