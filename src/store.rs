//! Entity Stores
//!
//! Replace-on-success read replicas of backend collections. A refresh issues
//! exactly one read; on success the whole contents are swapped in server
//! order, on failure the previous contents stay untouched. Concurrent
//! refreshes are not de-duplicated: whichever response resolves last wins,
//! regardless of which request was sent last.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiResult, Backend};
use crate::models::{Application, Job, Resume};

/// Names of the client's stores
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StoreName {
    Jobs,
    Resumes,
    Applications,
}

impl std::fmt::Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreName::Jobs => write!(f, "jobs"),
            StoreName::Resumes => write!(f, "resumes"),
            StoreName::Applications => write!(f, "applications"),
        }
    }
}

impl std::str::FromStr for StoreName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobs" => Ok(StoreName::Jobs),
            "resumes" => Ok(StoreName::Resumes),
            "applications" | "apps" => Ok(StoreName::Applications),
            other => Err(format!("unknown store: {}", other)),
        }
    }
}

/// A record type that can be listed in full from the backend
#[async_trait]
pub trait Collection: Clone + Send + Sync + 'static {
    const STORE: StoreName;

    async fn fetch_all(backend: &dyn Backend) -> ApiResult<Vec<Self>>;
}

#[async_trait]
impl Collection for Job {
    const STORE: StoreName = StoreName::Jobs;

    async fn fetch_all(backend: &dyn Backend) -> ApiResult<Vec<Self>> {
        backend.list_jobs().await
    }
}

#[async_trait]
impl Collection for Resume {
    const STORE: StoreName = StoreName::Resumes;

    async fn fetch_all(backend: &dyn Backend) -> ApiResult<Vec<Self>> {
        backend.list_resumes().await
    }
}

#[async_trait]
impl Collection for Application {
    const STORE: StoreName = StoreName::Applications;

    async fn fetch_all(backend: &dyn Backend) -> ApiResult<Vec<Self>> {
        backend.list_applications().await
    }
}

struct Contents<T> {
    items: Vec<T>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Shared, cloneable handle to one store
pub struct EntityStore<T> {
    contents: Arc<RwLock<Contents<T>>>,
}

impl<T> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            contents: Arc::clone(&self.contents),
        }
    }
}

impl<T: Collection> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Collection> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            contents: Arc::new(RwLock::new(Contents {
                items: Vec::new(),
                refreshed_at: None,
            })),
        }
    }

    pub fn name(&self) -> StoreName {
        T::STORE
    }

    /// Copy of the current contents in display order
    pub async fn snapshot(&self) -> Vec<T> {
        self.contents.read().await.items.clone()
    }

    pub async fn len(&self) -> usize {
        self.contents.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contents.read().await.items.is_empty()
    }

    /// When the contents were last replaced by a successful fetch
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.contents.read().await.refreshed_at
    }

    /// Swap in a complete new set of records
    pub async fn replace(&self, items: Vec<T>) {
        let mut contents = self.contents.write().await;
        contents.items = items;
        contents.refreshed_at = Some(Utc::now());
    }

    /// Re-fetch the whole collection
    ///
    /// Returns the new record count. On error the store is left exactly as
    /// it was.
    pub async fn refresh(&self, backend: &dyn Backend) -> ApiResult<usize> {
        match T::fetch_all(backend).await {
            Ok(items) => {
                let count = items.len();
                self.replace(items).await;
                tracing::debug!(store = %T::STORE, count, "Store refreshed");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(store = %T::STORE, error = %e, "Store refresh failed, keeping previous contents");
                Err(e)
            }
        }
    }

    /// Apply a local edit to every matching record
    ///
    /// Used for optimistic updates that a later refresh will reconcile.
    /// Returns the number of records touched.
    pub async fn update_where<P, F>(&self, predicate: P, mut edit: F) -> usize
    where
        P: Fn(&T) -> bool,
        F: FnMut(&mut T),
    {
        let mut contents = self.contents.write().await;
        let mut touched = 0;
        for item in contents.items.iter_mut().filter(|item| predicate(item)) {
            edit(item);
            touched += 1;
        }
        touched
    }

    /// First record matching the predicate
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.contents
            .read()
            .await
            .items
            .iter()
            .find(|item| predicate(item))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{job, FakeBackend};

    async fn wait_for_calls(backend: &FakeBackend, prefix: &str, n: usize) {
        while backend.count(prefix) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_contents_in_server_order() {
        let backend = FakeBackend::new().with_jobs(vec![job(2, "B", "Beta"), job(1, "A", "Alpha")]);
        let store: EntityStore<Job> = EntityStore::new();
        store.replace(vec![job(9, "Old", "Gone")]).await;

        let count = store.refresh(&backend).await.unwrap();
        assert_eq!(count, 2);
        let ids: Vec<_> = store.snapshot().await.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(store.refreshed_at().await.is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_preserves_contents_exactly() {
        let backend = FakeBackend::new();
        backend.fail("list_jobs");
        let store: EntityStore<Job> = EntityStore::new();
        let mut original = job(3, "Staff Engineer", "Acme");
        original.location = Some("Remote".to_string());
        store.replace(vec![original, job(4, "SRE", "Initech")]).await;
        let before = serde_json::to_string(&store.snapshot().await).unwrap();
        let stamp = store.refreshed_at().await;

        assert!(store.refresh(&backend).await.is_err());

        let after = serde_json::to_string(&store.snapshot().await).unwrap();
        assert_eq!(before, after);
        assert_eq!(store.refreshed_at().await, stamp);
    }

    #[tokio::test]
    async fn test_last_response_to_resolve_wins() {
        let backend = Arc::new(FakeBackend::new());
        let store: EntityStore<Job> = EntityStore::new();

        let gate = backend.gate("list_jobs");
        let slow = {
            let store = store.clone();
            let backend = Arc::clone(&backend);
            tokio::spawn(async move { store.refresh(backend.as_ref()).await })
        };
        wait_for_calls(&backend, "list_jobs", 1).await;

        *backend.jobs.lock().unwrap() = vec![job(1, "Second request", "Fast")];
        store.refresh(backend.as_ref()).await.unwrap();
        assert_eq!(store.snapshot().await[0].title, "Second request");

        *backend.jobs.lock().unwrap() = vec![job(2, "First request", "Slow")];
        gate.send(()).unwrap();
        slow.await.unwrap().unwrap();

        assert_eq!(store.snapshot().await[0].title, "First request");
    }

    #[tokio::test]
    async fn test_update_where_edits_locally() {
        let store: EntityStore<Job> = EntityStore::new();
        store.replace(vec![job(1, "A", "X"), job(2, "B", "Y")]).await;

        let touched = store
            .update_where(|j| j.id == 2, |j| j.title = "Renamed".to_string())
            .await;
        assert_eq!(touched, 1);
        assert_eq!(store.find(|j| j.id == 2).await.unwrap().title, "Renamed");
    }

    #[test]
    fn test_store_name_parsing() {
        assert_eq!("apps".parse::<StoreName>().unwrap(), StoreName::Applications);
        assert_eq!(StoreName::Resumes.to_string(), "resumes");
        assert!("widgets".parse::<StoreName>().is_err());
    }
}
