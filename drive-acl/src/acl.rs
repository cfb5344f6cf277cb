//! # Access-Control Lists
//!
//! Per-resource grants plus a visibility flag.
//!
//! ## Invariants
//!
//! - At most one grant per principal, emails compared case-insensitively;
//!   re-granting replaces the role.
//! - At most one `owner` grant; granting a new owner demotes the previous
//!   one to `organizer`.
//! - Once a resource has an owner it can never lose it: revoking or demoting
//!   the owner is rejected unless a replacement owner is granted in the same
//!   step ([`AccessControlList::revoke_and_transfer`]).
//! - Only user principals can own a resource.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{AclError, AclResult};
use crate::grant::{Grant, GrantId};
use crate::principal::Principal;
use crate::roles::Role;
use crate::visibility::Visibility;

/// The role a previous owner is demoted to when ownership moves.
pub const DEMOTED_OWNER_ROLE: Role = Role::Organizer;

/// Grants and visibility attached to a single resource.
///
/// # Example
///
/// ```
/// use drive_acl::{AccessControlList, Principal, Role};
///
/// let mut acl = AccessControlList::with_owner(Principal::user("alice@x.com")).unwrap();
/// acl.grant(Principal::user("bob@x.com"), Role::Owner).unwrap();
///
/// assert_eq!(acl.owner().unwrap().principal, Principal::user("bob@x.com"));
/// assert_eq!(acl.explicit_role(&Principal::user("alice@x.com")), Some(Role::Organizer));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessControlList {
    /// Visibility level
    visibility: Visibility,

    /// Grants in insertion order
    #[serde(default)]
    grants: Vec<Grant>,
}

impl AccessControlList {
    /// Create an empty private list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a private list owned by `owner`.
    ///
    /// # Returns
    ///
    /// The list, or `InvalidOperation` if `owner` is not a user
    pub fn with_owner(owner: Principal) -> AclResult<Self> {
        Self::check_owner_principal(&owner, Role::Owner)?;
        Ok(Self {
            visibility: Visibility::Private,
            grants: vec![Grant::new(owner.normalized(), Role::Owner)],
        })
    }

    /// Get the visibility level.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Change the visibility level, leaving grants untouched.
    ///
    /// # Returns
    ///
    /// The previous visibility
    pub fn set_visibility(&mut self, level: Visibility) -> Visibility {
        std::mem::replace(&mut self.visibility, level)
    }

    /// Get all grants in insertion order.
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Look up a grant by id.
    pub fn get(&self, id: GrantId) -> Option<&Grant> {
        self.grants.iter().find(|g| g.id == id)
    }

    /// Look up the grant held by exactly this principal.
    pub fn grant_for(&self, principal: &Principal) -> Option<&Grant> {
        let principal = principal.normalized();
        self.grants.iter().find(|g| g.principal == principal)
    }

    /// Get the owner grant, if ownership is tracked.
    pub fn owner(&self) -> Option<&Grant> {
        self.grants.iter().find(|g| g.is_owner())
    }

    /// Number of grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Check if there are no grants.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Grant a role to a principal, replacing any role it already holds.
    ///
    /// Granting `owner` demotes the current owner to `organizer`.
    ///
    /// # Arguments
    ///
    /// * `principal` - Who receives the role
    /// * `role` - The role to grant
    ///
    /// # Returns
    ///
    /// The new or updated grant, or `InvalidOperation` if the change would
    /// demote the sole owner or make a non-user the owner
    pub fn grant(&mut self, principal: Principal, role: Role) -> AclResult<&Grant> {
        let principal = principal.normalized();
        match self.grants.iter().position(|g| g.principal == principal) {
            Some(index) => self.set_role_at(index, role),
            None => {
                Self::check_owner_principal(&principal, role)?;
                if role == Role::Owner {
                    self.demote_owner();
                }
                self.grants.push(Grant::new(principal, role));
                Ok(&self.grants[self.grants.len() - 1])
            }
        }
    }

    /// Change the role of an existing grant.
    ///
    /// # Arguments
    ///
    /// * `id` - The grant to change
    /// * `role` - The new role
    ///
    /// # Returns
    ///
    /// The updated grant, `GrantNotFound` if the id is unknown, or
    /// `InvalidOperation` if the sole owner would be demoted
    pub fn update_role(&mut self, id: GrantId, role: Role) -> AclResult<&Grant> {
        let index = self.index_of(id)?;
        self.set_role_at(index, role)
    }

    /// Remove a grant.
    ///
    /// # Returns
    ///
    /// The removed grant, `GrantNotFound` if the id is unknown, or
    /// `InvalidOperation` if it is the owner grant
    pub fn revoke(&mut self, id: GrantId) -> AclResult<Grant> {
        let index = self.index_of(id)?;
        if self.grants[index].is_owner() {
            return Err(AclError::InvalidOperation(
                "cannot revoke the owner without granting a replacement owner".to_string(),
            ));
        }
        Ok(self.grants.remove(index))
    }

    /// Remove a grant and, if it was the owner, hand ownership to `replacement`
    /// in the same step.
    ///
    /// # Returns
    ///
    /// The removed grant
    pub fn revoke_and_transfer(&mut self, id: GrantId, replacement: Principal) -> AclResult<Grant> {
        let replacement = replacement.normalized();
        let index = self.index_of(id)?;
        if self.grants[index].principal == replacement {
            return Err(AclError::InvalidOperation(
                "replacement owner must differ from the revoked principal".to_string(),
            ));
        }
        Self::check_owner_principal(&replacement, Role::Owner)?;

        if self.grants[index].is_owner() {
            // Demotion of the revoked owner happens inside grant(); it is removed right after.
            self.grant(replacement, Role::Owner)?;
        }
        let index = self.index_of(id)?;
        Ok(self.grants.remove(index))
    }

    /// The highest role explicitly granted to `principal` on this resource,
    /// counting domain and anyone grants that cover it.
    pub fn explicit_role(&self, principal: &Principal) -> Option<Role> {
        let principal = principal.normalized();
        self.grants
            .iter()
            .filter(|g| g.principal.covers(&principal))
            .map(|g| g.role)
            .max()
    }

    /// Check the list's invariants.
    ///
    /// Used when a list arrives from storage rather than through the mutators.
    pub fn verify(&self) -> AclResult<()> {
        let owners = self.grants.iter().filter(|g| g.is_owner()).count();
        if owners > 1 {
            return Err(AclError::Corrupt(format!("{} owner grants", owners)));
        }

        let mut principals = HashSet::new();
        let mut ids = HashSet::new();
        for grant in &self.grants {
            if !principals.insert(grant.principal.normalized()) {
                return Err(AclError::Corrupt(format!("duplicate grant for {}", grant.principal)));
            }
            if !ids.insert(grant.id) {
                return Err(AclError::Corrupt(format!("duplicate grant id {}", grant.id)));
            }
            if grant.is_owner() && !matches!(grant.principal, Principal::User(_)) {
                return Err(AclError::Corrupt(format!("{} cannot be owner", grant.principal)));
            }
        }
        Ok(())
    }

    fn index_of(&self, id: GrantId) -> AclResult<usize> {
        self.grants
            .iter()
            .position(|g| g.id == id)
            .ok_or(AclError::GrantNotFound(id))
    }

    fn set_role_at(&mut self, index: usize, role: Role) -> AclResult<&Grant> {
        let current = &self.grants[index];
        if current.is_owner() && role != Role::Owner {
            return Err(AclError::InvalidOperation(format!(
                "{} is the sole owner; transfer ownership before changing their role",
                current.principal
            )));
        }
        Self::check_owner_principal(&current.principal, role)?;

        if role == Role::Owner && !current.is_owner() {
            self.demote_owner();
        }
        let grant = &mut self.grants[index];
        if grant.role != role {
            grant.role = role;
            grant.granted_at = chrono::Utc::now();
        }
        Ok(&self.grants[index])
    }

    fn demote_owner(&mut self) {
        for grant in self.grants.iter_mut().filter(|g| g.is_owner()) {
            grant.role = DEMOTED_OWNER_ROLE;
            grant.granted_at = chrono::Utc::now();
        }
    }

    fn check_owner_principal(principal: &Principal, role: Role) -> AclResult<()> {
        if role == Role::Owner && !matches!(principal, Principal::User(_)) {
            return Err(AclError::InvalidOperation(format!(
                "only a user can own a resource, not {}",
                principal
            )));
        }
        Ok(())
    }
}
