use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::errors::AppError;
use crate::store::KeyValueStorage;

const KEY_PREFIX: &str = "resume:";

/// Keys under a `resume:` prefix on a shared multiplexed connection.
pub struct RedisStorage {
    conn: MultiplexedConnection,
}

impl RedisStorage {
    pub async fn connect(client: &redis::Client) -> Result<Self, AppError> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(RedisStorage { conn })
    }
}

#[async_trait]
impl KeyValueStorage for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn.clone();
        Ok(conn
            .get::<_, Option<String>>(format!("{KEY_PREFIX}{key}"))
            .await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(format!("{KEY_PREFIX}{key}"), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(format!("{KEY_PREFIX}{key}")).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
