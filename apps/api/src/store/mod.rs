//! Profile Store: named resume profiles over pluggable key/value storage.
//!
//! The storage backend is injected as `Arc<dyn KeyValueStorage>`, so the store
//! runs the same against memory, a JSON directory, PostgreSQL or Redis.
//!
//! Every mutation is applied to a copy of the collection and only committed
//! in memory after the backend write succeeds. A failed write leaves both the
//! in-memory and the persisted state as they were.
//!
//! When the collection could not be read at load, the first commit copies
//! whatever is stored under `PROFILES_KEY` to `CORRUPT_BACKUP_KEY` before
//! overwriting it. If that copy cannot be made, the commit fails.

pub mod file;
pub mod handlers;
pub mod memory;
pub mod postgres;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::new_id;
use crate::models::profile::{Profile, ProfileSummary};
use crate::models::resume::ResumeData;
use crate::sections::SectionManager;

pub const PROFILES_KEY: &str = "resumeProfiles";
pub const CURRENT_PROFILE_KEY: &str = "currentProfileId";
pub const CORRUPT_BACKUP_KEY: &str = "resumeProfiles-corrupt";

/// String key/value storage, the shape of browser local storage.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
    fn backend_name(&self) -> &'static str;
}

pub struct ProfileStore {
    storage: Arc<dyn KeyValueStorage>,
    profiles: Vec<Profile>,
    current_id: Option<String>,
    /// Why the stored collection was not loaded, if it wasn't.
    load_error: Option<String>,
}

impl ProfileStore {
    /// Reads both keys from storage. Unreadable or corrupted data is logged,
    /// kept as `load_error`, and the store starts empty. Nothing is written
    /// back until the first mutation.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (profiles, load_error) = match read_profiles(storage.as_ref()).await {
            Ok(profiles) => (profiles, None),
            Err(e) => {
                error!("Failed to load profiles from {}: {e}", storage.backend_name());
                (Vec::new(), Some(e.to_string()))
            }
        };
        let current_id = match storage.get(CURRENT_PROFILE_KEY).await {
            Ok(id) => id.filter(|id| profiles.iter().any(|p| &p.id == id)),
            Err(e) => {
                error!("Failed to load current profile id: {e}");
                None
            }
        }
        .or_else(|| profiles.first().map(|p| p.id.clone()));

        info!(
            "Loaded {} profile(s) from {} storage",
            profiles.len(),
            storage.backend_name()
        );
        ProfileStore {
            storage,
            profiles,
            current_id,
            load_error,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles
            .iter()
            .map(|p| ProfileSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                is_current: self.current_id.as_deref() == Some(p.id.as_str()),
                created_at: p.created_at,
                updated_at: p.updated_at,
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<&Profile, AppError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))
    }

    pub fn current(&self) -> Result<&Profile, AppError> {
        match &self.current_id {
            Some(id) => self.get(id),
            None => Err(AppError::NotFound("No profile is selected".to_string())),
        }
    }

    /// Creates a profile with default data. It becomes current when no
    /// profile was current before.
    pub async fn create(&mut self, name: &str) -> Result<Profile, AppError> {
        let profile = Profile::new(validated_name(name)?, ResumeData::default());
        let mut profiles = self.profiles.clone();
        profiles.push(profile.clone());
        let current = self.current_id.clone().or_else(|| Some(profile.id.clone()));
        self.commit(profiles, current).await?;
        info!("Created profile {} ({})", profile.name, profile.id);
        Ok(profile)
    }

    pub async fn rename(&mut self, id: &str, name: &str) -> Result<Profile, AppError> {
        let name = validated_name(name)?;
        let mut profiles = self.profiles.clone();
        let profile = find_mut(&mut profiles, id)?;
        profile.name = name;
        profile.updated_at = Utc::now();
        let renamed = profile.clone();
        self.commit(profiles, self.current_id.clone()).await?;
        Ok(renamed)
    }

    /// Deletes a profile. When it was current, the first remaining profile
    /// (if any) becomes current.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        self.get(id)?;
        let profiles: Vec<Profile> = self.profiles.iter().filter(|p| p.id != id).cloned().collect();
        let current = match &self.current_id {
            Some(cur) if cur == id => profiles.first().map(|p| p.id.clone()),
            other => other.clone(),
        };
        self.commit(profiles, current).await?;
        info!("Deleted profile {id}");
        Ok(())
    }

    pub async fn switch(&mut self, id: &str) -> Result<&Profile, AppError> {
        self.get(id)?;
        self.commit(self.profiles.clone(), Some(id.to_string())).await?;
        self.current()
    }

    /// Replaces the current profile's data. Section orders are normalized
    /// and the modification timestamps bumped before the write.
    pub async fn update_current(&mut self, mut data: ResumeData) -> Result<&Profile, AppError> {
        let id = self.current()?.id.clone();
        SectionManager::new(&mut data);
        data.touch();

        let mut profiles = self.profiles.clone();
        let profile = find_mut(&mut profiles, &id)?;
        profile.data = data;
        profile.updated_at = Utc::now();
        self.commit(profiles, self.current_id.clone()).await?;
        self.current()
    }

    /// Runs `f` against a copy of the current data and saves the result.
    /// Nothing is written when `f` fails.
    pub async fn update_current_with<T, F>(&mut self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut ResumeData) -> Result<T, AppError>,
    {
        let mut data = self.current()?.data.clone();
        let out = f(&mut data)?;
        self.update_current(data).await?;
        Ok(out)
    }

    pub async fn duplicate(&mut self, id: &str) -> Result<Profile, AppError> {
        let source = self.get(id)?;
        let copy = Profile::new(format!("{} (Copy)", source.name), source.data.clone());
        let mut profiles = self.profiles.clone();
        profiles.push(copy.clone());
        self.commit(profiles, self.current_id.clone()).await?;
        Ok(copy)
    }

    pub fn export_json(&self, id: &str) -> Result<String, AppError> {
        serde_json::to_string_pretty(self.get(id)?)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Profile serialization failed: {e}")))
    }

    /// Imports a previously exported profile under a fresh id.
    pub async fn import_json(&mut self, json: &str) -> Result<Profile, AppError> {
        let mut profile: Profile = serde_json::from_str(json)
            .map_err(|e| AppError::Validation(format!("Invalid profile JSON: {e}")))?;
        profile.name = validated_name(&profile.name)?;
        profile.id = new_id();
        profile.updated_at = Utc::now();
        SectionManager::new(&mut profile.data);

        let mut profiles = self.profiles.clone();
        profiles.push(profile.clone());
        let current = self.current_id.clone().or_else(|| Some(profile.id.clone()));
        self.commit(profiles, current).await?;
        Ok(profile)
    }

    async fn commit(
        &mut self,
        profiles: Vec<Profile>,
        current_id: Option<String>,
    ) -> Result<(), AppError> {
        let json = serde_json::to_string(&profiles)
            .map_err(|e| AppError::Storage(format!("Profile serialization failed: {e}")))?;

        if self.load_error.is_some() {
            self.preserve_unloaded().await?;
        }

        if let Err(e) = self.storage.set(PROFILES_KEY, &json).await {
            error!("Failed to save profiles: {e}");
            return Err(e);
        }

        let pointer = match &current_id {
            Some(id) => self.storage.set(CURRENT_PROFILE_KEY, id).await,
            None => self.storage.remove(CURRENT_PROFILE_KEY).await,
        };
        if let Err(e) = pointer {
            // Collection is saved; the stale pointer is repaired on next load.
            warn!("Failed to save current profile id: {e}");
        }

        self.profiles = profiles;
        self.current_id = current_id;
        self.load_error = None;
        Ok(())
    }

    /// Copies the collection that failed to load out of the way.
    async fn preserve_unloaded(&self) -> Result<(), AppError> {
        let stored = self.storage.get(PROFILES_KEY).await.map_err(|e| {
            error!("Refusing to overwrite unreadable profiles: {e}");
            e
        })?;
        if let Some(blob) = stored {
            if let Err(e) = self.storage.set(CORRUPT_BACKUP_KEY, &blob).await {
                error!("Failed to back up unreadable profiles: {e}");
                return Err(e);
            }
            warn!(
                "Unreadable profile data ({} bytes) saved under {CORRUPT_BACKUP_KEY}",
                blob.len()
            );
        }
        Ok(())
    }
}

async fn read_profiles(storage: &dyn KeyValueStorage) -> Result<Vec<Profile>, AppError> {
    match storage.get(PROFILES_KEY).await? {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| AppError::Storage(format!("Corrupted profile data: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn find_mut<'a>(profiles: &'a mut [Profile], id: &str) -> Result<&'a mut Profile, AppError> {
    profiles
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))
}

fn validated_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Profile name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStorage;

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::default())
    }

    #[tokio::test]
    async fn test_first_profile_becomes_current() {
        let mut store = ProfileStore::load(memory()).await;
        assert!(store.current().is_err());
        let first = store.create("Software Engineer").await.unwrap();
        store.create("Data Scientist").await.unwrap();
        assert_eq!(store.current().unwrap().id, first.id);
        assert_eq!(store.list().len(), 2);
        assert!(store.list()[0].is_current);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let mut store = ProfileStore::load(memory()).await;
        assert!(matches!(
            store.create("  ").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let storage = memory();
        let mut store = ProfileStore::load(storage.clone()).await;
        store.create("A").await.unwrap();
        let b = store.create("B").await.unwrap();
        store.switch(&b.id).await.unwrap();

        let reloaded = ProfileStore::load(storage).await;
        assert_eq!(reloaded.list().len(), 2);
        assert_eq!(reloaded.current().unwrap().id, b.id);
    }

    #[tokio::test]
    async fn test_delete_current_moves_pointer() {
        let mut store = ProfileStore::load(memory()).await;
        let a = store.create("A").await.unwrap();
        let b = store.create("B").await.unwrap();
        store.delete(&a.id).await.unwrap();
        assert_eq!(store.current().unwrap().id, b.id);
        store.delete(&b.id).await.unwrap();
        assert!(store.current().is_err());
        assert!(matches!(store.delete(&b.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_current_bumps_timestamps() {
        let mut store = ProfileStore::load(memory()).await;
        let created = store.create("A").await.unwrap();
        let mut data = created.data.clone();
        data.personal_info.name = "Jane".into();
        let updated = store.update_current(data).await.unwrap();
        assert_eq!(updated.data.personal_info.name, "Jane");
        assert!(updated.updated_at >= created.updated_at);
        assert!(updated.data.metadata.last_modified >= created.data.metadata.last_modified);
    }

    #[tokio::test]
    async fn test_failed_closure_writes_nothing() {
        let mut store = ProfileStore::load(memory()).await;
        store.create("A").await.unwrap();
        let before = store.current().unwrap().clone();
        let result: Result<(), AppError> = store
            .update_current_with(|data| {
                data.summary = "changed".into();
                Err(AppError::Constraint("nope".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.current().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_corrupted_storage_loads_empty() {
        let storage = memory();
        storage.set(PROFILES_KEY, "{not json").await.unwrap();
        let store = ProfileStore::load(storage).await;
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_storage_is_backed_up_before_overwrite() {
        let storage = memory();
        let truncated = r#"[{"id":"p1","name":"Old","#;
        storage.set(PROFILES_KEY, truncated).await.unwrap();

        let mut store = ProfileStore::load(storage.clone()).await;
        assert!(store.load_error().unwrap().contains("Corrupted"));

        store.create("New").await.unwrap();
        assert!(store.load_error().is_none());
        assert_eq!(
            storage.get(CORRUPT_BACKUP_KEY).await.unwrap().as_deref(),
            Some(truncated)
        );
        let saved = storage.get(PROFILES_KEY).await.unwrap().unwrap();
        assert!(saved.contains("New"));

        // Only the first commit after a bad load takes a backup.
        store.create("Newer").await.unwrap();
        assert_eq!(
            storage.get(CORRUPT_BACKUP_KEY).await.unwrap().as_deref(),
            Some(truncated)
        );
    }

    #[tokio::test]
    async fn test_clean_load_has_no_error() {
        let storage = memory();
        let mut store = ProfileStore::load(storage.clone()).await;
        assert!(store.load_error().is_none());
        store.create("A").await.unwrap();
        assert!(storage.get(CORRUPT_BACKUP_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dangling_pointer_falls_back_to_first() {
        let storage = memory();
        let mut store = ProfileStore::load(storage.clone()).await;
        let a = store.create("A").await.unwrap();
        storage.set(CURRENT_PROFILE_KEY, "deleted-id").await.unwrap();
        let reloaded = ProfileStore::load(storage).await;
        assert_eq!(reloaded.current().unwrap().id, a.id);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_prior_state() {
        let storage = Arc::new(MemoryStorage::failing_writes());
        let mut store = ProfileStore::load(storage).await;
        assert!(matches!(store.create("A").await, Err(AppError::Storage(_))));
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_and_rename() {
        let mut store = ProfileStore::load(memory()).await;
        let a = store.create("Backend").await.unwrap();
        let copy = store.duplicate(&a.id).await.unwrap();
        assert_ne!(copy.id, a.id);
        assert_eq!(copy.name, "Backend (Copy)");
        assert_eq!(copy.data, a.data);

        let renamed = store.rename(&copy.id, "Platform").await.unwrap();
        assert_eq!(renamed.name, "Platform");
        assert_eq!(store.current().unwrap().id, a.id);
    }

    #[tokio::test]
    async fn test_export_then_import_gets_new_id() {
        let mut store = ProfileStore::load(memory()).await;
        let a = store.create("Backend").await.unwrap();
        let json = store.export_json(&a.id).unwrap();
        let imported = store.import_json(&json).await.unwrap();
        assert_ne!(imported.id, a.id);
        assert_eq!(imported.name, "Backend");
        assert!(matches!(
            store.import_json("[]").await,
            Err(AppError::Validation(_))
        ));
    }
}
