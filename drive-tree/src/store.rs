//! Tree persistence
//!
//! This module provides the load/save abstraction the service persists
//! through, with an in-memory store for single-process use and tests and a
//! JSON file store for local deployments.
//!
//! Both stores use compare-and-swap on the snapshot revision: a save names
//! the revision it was based on and fails with [`StoreError::Conflict`] if
//! another writer saved first.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::TreeSnapshot;

/// Load/save contract for persisted trees.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Load the stored snapshot, or `None` if nothing was saved yet.
    ///
    /// The snapshot is returned as stored; callers rebuild it with
    /// [`ResourceTree::from_snapshot`](crate::ResourceTree::from_snapshot),
    /// which re-verifies the invariants.
    async fn load_tree(&self) -> StoreResult<Option<TreeSnapshot>>;

    /// Save a snapshot.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The tree to persist
    /// * `expected_revision` - Revision currently stored that this snapshot
    ///   was derived from, or `None` if the store is expected to be empty
    async fn save_tree(&self, snapshot: &TreeSnapshot, expected_revision: Option<u64>) -> StoreResult<()>;
}

fn check_revision(stored: Option<u64>, expected: Option<u64>) -> StoreResult<()> {
    if stored != expected {
        return Err(StoreError::Conflict {
            expected,
            found: stored,
        });
    }
    Ok(())
}

/// In-memory tree store.
///
/// Suitable for single-process applications and testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryTreeStore {
    /// Last saved snapshot
    snapshot: Arc<RwLock<Option<TreeSnapshot>>>,
}

impl MemoryTreeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a snapshot.
    pub fn with_snapshot(snapshot: TreeSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// Revision of the stored snapshot, if any.
    pub async fn stored_revision(&self) -> Option<u64> {
        self.snapshot.read().await.as_ref().map(|s| s.revision)
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn load_tree(&self) -> StoreResult<Option<TreeSnapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save_tree(&self, snapshot: &TreeSnapshot, expected_revision: Option<u64>) -> StoreResult<()> {
        let mut stored = self.snapshot.write().await;
        check_revision(stored.as_ref().map(|s| s.revision), expected_revision)?;
        *stored = Some(snapshot.clone());
        Ok(())
    }
}

/// JSON file tree store.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write never leaves a truncated snapshot behind.
///
/// # Example
///
/// ```rust,no_run
/// use drive_tree::{JsonFileTreeStore, TreeStore};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let store = JsonFileTreeStore::new("/var/lib/drive/tree.json");
///     let snapshot = store.load_tree().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileTreeStore {
    /// Target file
    path: PathBuf,

    /// Serializes saves within this process
    write_lock: Mutex<()>,
}

impl JsonFileTreeStore {
    /// Create a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_snapshot(&self) -> StoreResult<Option<TreeSnapshot>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TreeStore for JsonFileTreeStore {
    async fn load_tree(&self) -> StoreResult<Option<TreeSnapshot>> {
        let snapshot = self.read_snapshot().await?;
        tracing::debug!(
            path = %self.path.display(),
            revision = ?snapshot.as_ref().map(|s| s.revision),
            "Loaded tree snapshot"
        );
        Ok(snapshot)
    }

    async fn save_tree(&self, snapshot: &TreeSnapshot, expected_revision: Option<u64>) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let stored = self.read_snapshot().await?.map(|s| s.revision);
        check_revision(stored, expected_revision)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            revision = snapshot.revision,
            nodes = snapshot.nodes.len(),
            "Saved tree snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ResourceTree;
    use drive_acl::Principal;
    use drive_naming::NamingPolicy;

    fn tree() -> ResourceTree {
        let mut tree = ResourceTree::new("Mi Unidad", Some(Principal::user("alice@x.com"))).unwrap();
        let root = tree.root();
        tree.create_node(&NamingPolicy::permissive(), "Docs", root, None).unwrap();
        tree
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryTreeStore::new();
        assert!(store.load_tree().await.unwrap().is_none());

        let tree = tree();
        store.save_tree(&tree.snapshot(), None).await.unwrap();

        let loaded = store.load_tree().await.unwrap().unwrap();
        let restored = ResourceTree::from_snapshot(loaded).unwrap();
        assert_eq!(restored.node_count(), 2);
        assert_eq!(store.stored_revision().await, Some(tree.revision()));
    }

    #[tokio::test]
    async fn test_memory_store_detects_conflict() {
        let store = MemoryTreeStore::new();
        let tree = tree();
        store.save_tree(&tree.snapshot(), None).await.unwrap();

        let err = store.save_tree(&tree.snapshot(), None).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: None, found: Some(_) }));

        let err = store
            .save_tree(&tree.snapshot(), Some(tree.revision() + 7))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileTreeStore::new(dir.path().join("nested").join("tree.json"));
        assert!(store.load_tree().await.unwrap().is_none());

        let mut tree = tree();
        store.save_tree(&tree.snapshot(), None).await.unwrap();

        let before = tree.revision();
        let root = tree.root();
        tree.create_node(&NamingPolicy::permissive(), "More", root, None).unwrap();
        store.save_tree(&tree.snapshot(), Some(before)).await.unwrap();

        let restored = ResourceTree::from_snapshot(store.load_tree().await.unwrap().unwrap()).unwrap();
        assert_eq!(restored.node_count(), 3);
        assert_eq!(restored.revision(), tree.revision());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_json_file_store_conflict_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let store = JsonFileTreeStore::new(&path);

        let tree = tree();
        store.save_tree(&tree.snapshot(), None).await.unwrap();
        assert!(matches!(
            store.save_tree(&tree.snapshot(), None).await,
            Err(StoreError::Conflict { .. })
        ));

        tokio::fs::write(&path, b"not json").await.unwrap();
        assert!(matches!(store.load_tree().await, Err(StoreError::Serialization(_))));
    }
}
