use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::store::KeyValueStorage;

/// Process-local storage. Used for `STORAGE_BACKEND=memory` and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStorage {
    /// Storage whose writes always fail, like a full browser quota.
    #[cfg(test)]
    pub fn failing_writes() -> Self {
        MemoryStorage {
            entries: RwLock::default(),
            fail_writes: true,
        }
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.get("k").await.unwrap(), None);
        storage.set("k", "v").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));
        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let storage = MemoryStorage::failing_writes();
        assert!(storage.set("k", "v").await.is_err());
    }
}
