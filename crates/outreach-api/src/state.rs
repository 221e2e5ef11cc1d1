//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! ## Architecture
//!
//! Reads are served from thread-safe in-memory stores. When `DATABASE_URL`
//! is configured the stores are hydrated from Postgres at startup and every
//! write goes through to the database, so state survives restarts. Without
//! it the service runs in-memory only (development and testing).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use outreach_core::{PhotoAttachment, SessionRecord};
use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::blob::BlobStore;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable; a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if
    /// not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Configuration ------------------------------------------------------------

/// Service configuration, read from the environment in `main.rs`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to bind (default 8080).
    pub port: u16,
    /// Directory for stored photo blobs.
    pub upload_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            upload_dir: PathBuf::from("uploads/photos"),
        }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Session records, authoritative for reads.
    pub sessions: Store<SessionRecord>,
    /// Photo attachment records, keyed by attachment id.
    pub photos: Store<PhotoAttachment>,
    /// On-disk photo bytes.
    pub blobs: BlobStore,
    /// Optional Postgres pool; writes go through when present.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Create state with default configuration and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create state from explicit configuration.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let blobs = BlobStore::new(config.upload_dir.clone());
        Self {
            config,
            sessions: Store::new(),
            photos: Store::new(),
            blobs,
            db_pool,
        }
    }

    /// Load all persisted records into the in-memory stores.
    ///
    /// No-op without a database pool. Called once at startup, before the
    /// server accepts traffic.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };

        let sessions = crate::db::sessions::load_all(pool).await?;
        let session_count = sessions.len();
        for record in sessions {
            self.sessions.insert(record.id, record);
        }

        let photos = crate::db::photos::load_all(pool).await?;
        let photo_count = photos.len();
        for photo in photos {
            self.photos.insert(photo.id, photo);
        }

        tracing::info!(
            sessions = session_count,
            photos = photo_count,
            "hydrated in-memory stores from database"
        );
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_insert_get_remove() {
        let store: Store<String> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.insert(id, "a".to_string()).is_none());
        assert_eq!(store.get(&id).as_deref(), Some("a"));
        assert!(store.contains(&id));
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove(&id).as_deref(), Some("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn store_update_in_place() {
        let store: Store<i32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 1);
        let updated = store.update(&id, |v| *v += 10);
        assert_eq!(updated, Some(11));
        assert_eq!(store.get(&id), Some(11));
        assert_eq!(store.update(&Uuid::new_v4(), |v| *v += 1), None);
    }

    #[test]
    fn store_clone_shares_data() {
        let store: Store<i32> = Store::new();
        let clone = store.clone();
        let id = Uuid::new_v4();
        store.insert(id, 7);
        assert_eq!(clone.get(&id), Some(7));
    }
}
