//! # Grants
//!
//! A grant binds one principal to one role on one resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::principal::Principal;
use crate::roles::Role;

/// Opaque grant identifier.
///
/// Stable for the lifetime of a grant: re-granting the same principal a new
/// role keeps the id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GrantId(Uuid);

impl GrantId {
    /// Generate a new grant id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse from the hyphenated UUID form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A role granted to a principal.
///
/// # Examples
///
/// ```
/// use drive_acl::{Grant, Principal, Role};
///
/// let grant = Grant::new(Principal::user("bob@x.com"), Role::Reader)
///     .with_display_name("Bob");
/// assert_eq!(grant.role, Role::Reader);
/// assert_eq!(grant.display_name.as_deref(), Some("Bob"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grant {
    /// Unique grant ID
    pub id: GrantId,

    /// Who holds the grant
    pub principal: Principal,

    /// Role granted
    pub role: Role,

    /// Display name shown in sharing dialogs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// When the grant was created or last changed role
    pub granted_at: DateTime<Utc>,
}

impl Grant {
    /// Creates a new grant with a fresh id and the current timestamp.
    pub fn new(principal: Principal, role: Role) -> Self {
        Self {
            id: GrantId::new(),
            principal,
            role,
            display_name: None,
            granted_at: Utc::now(),
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Check if this grant is the ownership grant.
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}
