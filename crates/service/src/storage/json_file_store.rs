use std::path::{Path, PathBuf};

use async_trait::async_trait;
use models::{Entity, Key};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use super::{state::StoreState, DocumentStore, Query};
use crate::errors::ServiceError;

/// JSON file-backed document store.
///
/// Holds every record in memory and rewrites the whole file after each
/// mutation (temp file + rename). Suited to small deployments; the write
/// lock is held across the save so readers never see unsaved state.
pub struct JsonFileStore {
    inner: RwLock<StoreState>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty file if missing.
    /// A file that exists but does not parse is an error, not an empty store.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::store)?;
            }
        }

        let state = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => StoreState::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Store(format!("corrupt store file {}: {e}", file_path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = StoreState::default();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::store(e)),
        };

        info!(path = %file_path.display(), "json file store opened");
        Ok(Self { inner: RwLock::new(state), file_path })
    }
}

async fn write_atomic(path: &Path, state: &StoreState) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(state).map_err(ServiceError::store)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).await.map_err(ServiceError::store)?;
    fs::rename(&tmp, path).await.map_err(ServiceError::store)?;
    debug!(path = %path.display(), "store file saved");
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, key: &Key) -> Result<Option<Entity>, ServiceError> {
        Ok(self.inner.read().await.get(key))
    }

    async fn put(&self, entity: &Entity) -> Result<Key, ServiceError> {
        let mut state = self.inner.write().await;
        let mut next = state.clone();
        let key = next.put(entity);
        write_atomic(&self.file_path, &next).await?;
        *state = next;
        Ok(key)
    }

    async fn delete(&self, key: &Key) -> Result<bool, ServiceError> {
        let mut state = self.inner.write().await;
        let mut next = state.clone();
        if !next.delete(key) {
            return Ok(false);
        }
        write_atomic(&self.file_path, &next).await?;
        *state = next;
        Ok(true)
    }

    async fn delete_multi(&self, keys: &[Key]) -> Result<usize, ServiceError> {
        let mut state = self.inner.write().await;
        let mut next = state.clone();
        let removed = next.delete_multi(keys);
        if removed > 0 {
            write_atomic(&self.file_path, &next).await?;
            *state = next;
        }
        Ok(removed)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entity>, ServiceError> {
        Ok(self.inner.read().await.query(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::EntityKind;
    use serde_json::json;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("json_file_store_{}", uuid::Uuid::new_v4()))
            .join("store.json")
    }

    #[tokio::test]
    async fn json_file_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonFileStore::open(&tmp).await?;

        // initially empty
        assert!(store.query(&Query::kind(EntityKind::Businesses)).await?.is_empty());

        let mut a = Entity::new(Key::incomplete(EntityKind::Businesses));
        a.set("owner_id", json!(7));
        let ka = store.put(&a).await?;
        let kb = store.put(&Entity::new(Key::incomplete(EntityKind::Businesses))).await?;
        assert!(store.delete(&kb).await?);

        // reload from disk
        let reloaded = JsonFileStore::open(&tmp).await?;
        let all = reloaded.query(&Query::kind(EntityKind::Businesses)).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(reloaded.get(&ka).await?.unwrap().get("owner_id"), Some(&json!(7)));

        // ids keep increasing across restarts
        let kc = reloaded.put(&Entity::new(Key::incomplete(EntityKind::Reviews))).await?;
        assert!(kc.id > kb.id);

        if let Some(dir) = tmp.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_multi_persists_once() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonFileStore::open(&tmp).await?;
        let a = store.put(&Entity::new(Key::incomplete(EntityKind::Businesses))).await?;
        let r = store.put(&Entity::new(Key::incomplete(EntityKind::Reviews))).await?;
        assert_eq!(store.delete_multi(&[a, r]).await?, 2);

        let reloaded = JsonFileStore::open(&tmp).await?;
        assert!(reloaded.get(&a).await?.is_none());
        assert!(reloaded.get(&r).await?.is_none());

        if let Some(dir) = tmp.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        if let Some(dir) = tmp.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&tmp, b"{not json").await?;
        assert!(matches!(JsonFileStore::open(&tmp).await, Err(ServiceError::Store(_))));

        if let Some(dir) = tmp.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }
}
