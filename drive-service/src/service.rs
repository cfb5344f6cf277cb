//! Resource service
//!
//! The facade the UI layer calls. It owns one [`ResourceTree`] behind a
//! read/write lock, validates names with the configured [`NamingPolicy`], and
//! persists every successful mutation through a [`TreeStore`].
//!
//! Mutations are staged on a copy of the tree, saved, and only then committed.
//! A failed save therefore leaves the in-memory tree exactly as it was.

use drive_acl::{AclError, Grant, GrantId, Principal, Role, Visibility};
use drive_naming::{NamingPolicy, NamingReport};
use drive_tree::{
    FolderStructure, FolderTemplate, NodeId, NodeSummary, ResourceTree, TreeResult, TreeStore,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::config::DriveConfig;
use crate::error::{DriveError, DriveResult};

/// Tree state guarded by the service lock.
#[derive(Debug)]
struct TreeState {
    /// Committed tree
    tree: ResourceTree,

    /// Revision the store currently holds, `None` if nothing was saved yet
    stored_revision: Option<u64>,
}

/// Shared-drive facade over the folder tree, its permissions, and persistence.
///
/// Construct one per tree at process start and hand it to callers by
/// reference (or inside an `Arc`).
///
/// # Example
///
/// ```rust
/// use drive_service::{DriveConfig, ResourceService};
/// use drive_tree::MemoryTreeStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DriveConfig::default().with_root_owner("alice@x.com");
/// let service = ResourceService::open(&config, Arc::new(MemoryTreeStore::new())).await?;
///
/// let report = service.create_folder("2024-01-15_Report", service.root().await, None).await?;
/// assert_eq!(report.path, "Mi Unidad/2024-01-15_Report");
/// # Ok(())
/// # }
/// ```
pub struct ResourceService {
    /// Tree and persisted revision
    state: RwLock<TreeState>,

    /// Naming policy applied to every new or changed name
    policy: NamingPolicy,

    /// Persistence collaborator
    store: Arc<dyn TreeStore>,
}

impl std::fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ResourceService {
    /// Open the service over a store.
    ///
    /// Loads and re-verifies the persisted tree if there is one; otherwise
    /// creates a fresh tree from the configuration and saves it.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `store` - Persistence collaborator
    ///
    /// # Returns
    ///
    /// The service, `Config` for an invalid configuration, or `Storage` if the
    /// stored tree cannot be loaded or fails verification
    #[instrument(skip(config, store), fields(root_name = %config.root_name))]
    pub async fn open(config: &DriveConfig, store: Arc<dyn TreeStore>) -> DriveResult<Self> {
        config.validate()?;
        let policy = config.naming_policy()?;

        let state = match store.load_tree().await? {
            Some(snapshot) => {
                let revision = snapshot.revision;
                let tree = ResourceTree::from_snapshot(snapshot).map_err(|e| {
                    error!(error = %e, "Stored tree failed verification");
                    DriveError::from(e)
                })?;
                info!(revision, nodes = tree.node_count(), "Loaded drive tree");
                TreeState {
                    tree,
                    stored_revision: Some(revision),
                }
            }
            None => {
                let owner = config.root_owner.as_deref().and_then(Principal::parse);
                let tree = ResourceTree::new(config.root_name.clone(), owner)?;
                store.save_tree(&tree.snapshot(), None).await?;
                info!(root_id = %tree.root(), "Created new drive tree");
                TreeState {
                    stored_revision: Some(tree.revision()),
                    tree,
                }
            }
        };

        Ok(Self {
            state: RwLock::new(state),
            policy,
            store,
        })
    }

    /// Open the service over the store the configuration names.
    pub async fn from_config(config: &DriveConfig) -> DriveResult<Self> {
        Self::open(config, config.tree_store()).await
    }

    /// Wrap an existing tree.
    ///
    /// The store is expected to be empty; the first mutation saves the whole
    /// tree into it.
    pub fn new(tree: ResourceTree, policy: NamingPolicy, store: Arc<dyn TreeStore>) -> Self {
        Self {
            state: RwLock::new(TreeState {
                tree,
                stored_revision: None,
            }),
            policy,
            store,
        }
    }

    /// The naming policy in force.
    pub fn policy(&self) -> &NamingPolicy {
        &self.policy
    }

    /// The root folder's ID.
    pub async fn root(&self) -> NodeId {
        self.state.read().await.tree.root()
    }

    /// Revision of the committed tree.
    pub async fn revision(&self) -> u64 {
        self.state.read().await.tree.revision()
    }

    /// A copy of the committed tree.
    pub async fn tree(&self) -> ResourceTree {
        self.state.read().await.tree.clone()
    }

    /// Replace the in-memory tree with the one currently stored.
    ///
    /// Mutations do this on their own after a `Conflict`, so retrying the
    /// rejected call works against the other writer's tree.
    pub async fn reload(&self) -> DriveResult<()> {
        let mut state = self.state.write().await;
        self.refresh(&mut state).await
    }

    async fn refresh(&self, state: &mut TreeState) -> DriveResult<()> {
        let snapshot = self
            .store
            .load_tree()
            .await?
            .ok_or_else(|| DriveError::Storage("stored tree is missing".to_string()))?;
        let revision = snapshot.revision;
        state.tree = ResourceTree::from_snapshot(snapshot)?;
        state.stored_revision = Some(revision);
        info!(revision, "Reloaded drive tree");
        Ok(())
    }

    /// Stage a mutation on a copy, persist it, then commit.
    async fn mutate<R, F>(&self, edit: F) -> DriveResult<R>
    where
        F: FnOnce(&mut ResourceTree, &NamingPolicy) -> TreeResult<R>,
    {
        let mut state = self.state.write().await;
        let mut staged = state.tree.clone();
        let result = edit(&mut staged, &self.policy)?;

        // Nothing changed (e.g. a move to the current parent)
        if staged.revision() == state.tree.revision() {
            return Ok(result);
        }

        if let Err(e) = self.store.save_tree(&staged.snapshot(), state.stored_revision).await {
            let err = DriveError::from(e);
            if err.is_server_error() {
                error!(error = %err, "Failed to save drive tree");
            } else {
                warn!(error = %err, "Drive tree save rejected");
            }
            if matches!(err, DriveError::Conflict(_)) {
                if let Err(reload_err) = self.refresh(&mut state).await {
                    error!(error = %reload_err, "Failed to reload drive tree after conflict");
                }
            }
            return Err(err);
        }

        state.stored_revision = Some(staged.revision());
        state.tree = staged;
        Ok(result)
    }

    // ========================================================================
    // Folders
    // ========================================================================

    /// Create a folder.
    ///
    /// # Arguments
    ///
    /// * `name` - Folder name, checked against the naming policy
    /// * `parent` - Parent folder
    /// * `owner` - Principal granted `owner` on the new folder, if tracked
    ///
    /// # Returns
    ///
    /// The new folder, `NotFound` if the parent is missing, or `InvalidName`
    /// listing every violated rule
    #[instrument(skip(self, owner))]
    pub async fn create_folder(
        &self,
        name: &str,
        parent: NodeId,
        owner: Option<Principal>,
    ) -> DriveResult<NodeSummary> {
        let summary = self
            .mutate(|tree, policy| {
                let id = tree.create_node(policy, name, parent, owner)?;
                tree.summary(id)
            })
            .await?;
        info!(node_id = %summary.id, path = %summary.path, "Folder created");
        Ok(summary)
    }

    /// Rename a folder.
    #[instrument(skip(self))]
    pub async fn rename_path(&self, id: NodeId, new_name: &str) -> DriveResult<NodeSummary> {
        let summary = self
            .mutate(|tree, policy| {
                tree.rename(policy, id, new_name)?;
                tree.summary(id)
            })
            .await?;
        info!(path = %summary.path, "Folder renamed");
        Ok(summary)
    }

    /// Move a folder under a new parent.
    ///
    /// # Returns
    ///
    /// The moved folder, or `InvalidOperation` if the new parent is the folder
    /// itself or one of its descendants
    #[instrument(skip(self))]
    pub async fn move_folder(&self, id: NodeId, new_parent: NodeId) -> DriveResult<NodeSummary> {
        let summary = self
            .mutate(|tree, _| {
                tree.move_node(id, new_parent)?;
                tree.summary(id)
            })
            .await?;
        info!(path = %summary.path, "Folder moved");
        Ok(summary)
    }

    /// Delete a folder and everything below it.
    ///
    /// # Returns
    ///
    /// The removed IDs in pre-order
    #[instrument(skip(self))]
    pub async fn delete_folder(&self, id: NodeId) -> DriveResult<Vec<NodeId>> {
        let removed = self.mutate(|tree, _| tree.delete(id)).await?;
        info!(removed = removed.len(), "Folder deleted");
        Ok(removed)
    }

    /// Create the folders of a template under `parent`, all or nothing.
    #[instrument(skip(self, owner))]
    pub async fn apply_template(
        &self,
        parent: NodeId,
        template: FolderTemplate,
        owner: Option<Principal>,
    ) -> DriveResult<Vec<NodeSummary>> {
        let created = self
            .mutate(|tree, policy| {
                tree.apply_template(policy, parent, template, owner)?
                    .into_iter()
                    .map(|id| tree.summary(id))
                    .collect::<TreeResult<Vec<_>>>()
            })
            .await?;
        info!(created = created.len(), template = template.display_name(), "Template applied");
        Ok(created)
    }

    /// One folder's summary.
    pub async fn get_folder(&self, id: NodeId) -> DriveResult<NodeSummary> {
        Ok(self.state.read().await.tree.summary(id)?)
    }

    /// Children of a folder, in insertion order.
    #[instrument(skip(self))]
    pub async fn list_children(&self, id: NodeId) -> DriveResult<Vec<NodeSummary>> {
        let state = self.state.read().await;
        let children = state
            .tree
            .children(id)?
            .into_iter()
            .map(|child| state.tree.summary(child.id()))
            .collect::<TreeResult<Vec<_>>>()?;
        debug!(count = children.len(), "Listed children");
        Ok(children)
    }

    /// A folder and all of its descendants, parents before children.
    pub async fn subtree(&self, id: NodeId) -> DriveResult<Vec<NodeSummary>> {
        let state = self.state.read().await;
        let ids: Vec<NodeId> = state.tree.subtree(id)?.map(|n| n.id()).collect();
        Ok(ids
            .into_iter()
            .map(|id| state.tree.summary(id))
            .collect::<TreeResult<Vec<_>>>()?)
    }

    /// Nested view of a folder for tree widgets.
    pub async fn folder_structure(&self, id: NodeId) -> DriveResult<FolderStructure> {
        Ok(self.state.read().await.tree.structure(id)?)
    }

    /// Folders whose name contains `query`, case-insensitive.
    pub async fn search(&self, query: &str) -> DriveResult<Vec<NodeSummary>> {
        let state = self.state.read().await;
        let ids: Vec<NodeId> = state.tree.search(query).into_iter().map(|n| n.id()).collect();
        Ok(ids
            .into_iter()
            .map(|id| state.tree.summary(id))
            .collect::<TreeResult<Vec<_>>>()?)
    }

    /// Folders shared with `principal` by another owner.
    pub async fn shared_with(&self, principal: &Principal) -> DriveResult<Vec<NodeSummary>> {
        let state = self.state.read().await;
        let ids: Vec<NodeId> = state
            .tree
            .shared_with(principal)
            .into_iter()
            .map(|n| n.id())
            .collect();
        Ok(ids
            .into_iter()
            .map(|id| state.tree.summary(id))
            .collect::<TreeResult<Vec<_>>>()?)
    }

    /// Check a name against the naming policy without changing anything.
    ///
    /// # Returns
    ///
    /// Advisory warnings on success, or `InvalidName` listing every violated
    /// required rule
    pub fn validate_name(&self, name: &str) -> DriveResult<NamingReport> {
        Ok(self.policy.validate(name)?)
    }

    // ========================================================================
    // Permissions
    // ========================================================================

    /// Grant a role on a folder, or change the role of an existing grant for
    /// the same principal.
    ///
    /// Granting `owner` demotes the current owner to `organizer`.
    #[instrument(skip(self, principal), fields(principal = %principal))]
    pub async fn add_permission(
        &self,
        resource: NodeId,
        principal: Principal,
        role: Role,
    ) -> DriveResult<Grant> {
        let grant = self
            .mutate(|tree, _| tree.update_acl(resource, |acl| acl.grant(principal, role).cloned()))
            .await?;
        info!(grant_id = %grant.id, role = %grant.role, "Permission granted");
        Ok(grant)
    }

    /// Change the role of a grant.
    #[instrument(skip(self))]
    pub async fn update_permission_role(
        &self,
        resource: NodeId,
        grant_id: GrantId,
        role: Role,
    ) -> DriveResult<Grant> {
        let grant = self
            .mutate(|tree, _| tree.update_acl(resource, |acl| acl.update_role(grant_id, role).cloned()))
            .await?;
        info!(principal = %grant.principal, role = %grant.role, "Permission updated");
        Ok(grant)
    }

    /// Remove a grant. The owner grant cannot be removed this way; use
    /// [`transfer_ownership`](Self::transfer_ownership).
    ///
    /// # Returns
    ///
    /// The removed grant
    #[instrument(skip(self))]
    pub async fn remove_permission(&self, resource: NodeId, grant_id: GrantId) -> DriveResult<Grant> {
        let removed = self
            .mutate(|tree, _| tree.update_acl(resource, |acl| acl.revoke(grant_id)))
            .await?;
        info!(principal = %removed.principal, "Permission removed");
        Ok(removed)
    }

    /// Revoke the owner grant and make `new_owner` the owner in one step.
    ///
    /// # Returns
    ///
    /// The new owner grant, or `InvalidOperation` if `grant_id` is not the
    /// owner grant
    #[instrument(skip(self, new_owner), fields(new_owner = %new_owner))]
    pub async fn transfer_ownership(
        &self,
        resource: NodeId,
        grant_id: GrantId,
        new_owner: Principal,
    ) -> DriveResult<Grant> {
        let grant = self
            .mutate(|tree, _| {
                tree.update_acl(resource, |acl| {
                    let current = acl.get(grant_id).ok_or(AclError::GrantNotFound(grant_id))?;
                    if !current.is_owner() {
                        return Err(AclError::InvalidOperation(format!(
                            "grant {} is not the owner grant",
                            grant_id
                        )));
                    }
                    acl.revoke_and_transfer(grant_id, new_owner.clone())?;
                    acl.grant_for(&new_owner)
                        .cloned()
                        .ok_or_else(|| AclError::Corrupt("ownership transfer lost the new owner".to_string()))
                })
            })
            .await?;
        info!(grant_id = %grant.id, "Ownership transferred");
        Ok(grant)
    }

    /// Set a folder's visibility.
    ///
    /// # Returns
    ///
    /// The previous visibility
    #[instrument(skip(self))]
    pub async fn set_visibility(&self, resource: NodeId, level: Visibility) -> DriveResult<Visibility> {
        let previous = self
            .mutate(|tree, _| tree.update_acl(resource, |acl| Ok(acl.set_visibility(level))))
            .await?;
        info!(from = %previous, to = %level, "Visibility changed");
        Ok(previous)
    }

    /// Grants held directly on a folder.
    pub async fn list_permissions(&self, resource: NodeId) -> DriveResult<Vec<Grant>> {
        let state = self.state.read().await;
        Ok(state.tree.get(resource)?.acl().grants().to_vec())
    }

    /// Resolve the role `principal` effectively holds on a folder, including
    /// the reader floor of public ancestors.
    #[instrument(skip(self, principal), fields(principal = %principal))]
    pub async fn get_effective_permissions(
        &self,
        resource: NodeId,
        principal: &Principal,
    ) -> DriveResult<Option<Role>> {
        let role = self.state.read().await.tree.effective_role(resource, principal)?;
        debug!(role = ?role, "Resolved effective role");
        Ok(role)
    }
}
