//! # Drive Access Control
//!
//! This crate provides per-resource access-control lists for the shared drive,
//! evaluated with inherited-visibility semantics.
//!
//! ## Overview
//!
//! The drive-acl crate handles:
//! - **Roles**: The ordered scale `reader < commenter < writer < fileOrganizer < organizer < owner`
//! - **Principals**: Users, groups, domains, and the "anyone" marker
//! - **Visibility**: `private`, `shared`, `public`
//! - **Access-Control Lists**: One grant per principal, at most one owner
//! - **Resolution**: Effective role from a node's list and its ancestors'
//!
//! ## Architecture
//!
//! ```text
//! AccessControlList
//!   ├─ Visibility ─→ floor (public = reader)
//!   └─ Grant* ─→ Principal + Role
//!
//! effective_role = max(ancestor floors, node floor, node explicit grants)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use drive_acl::{AccessControlList, Principal, Role, Visibility, effective_role};
//!
//! let mut root = AccessControlList::with_owner(Principal::user("alice@x.com")).unwrap();
//! let mut folder = AccessControlList::new();
//! folder.grant(Principal::user("bob@x.com"), Role::Reader).unwrap();
//!
//! root.set_visibility(Visibility::Public);
//!
//! let carol = Principal::user("carol@x.com");
//! assert_eq!(effective_role(&carol, &folder, [&root]), Some(Role::Reader));
//! ```
//!
//! ## Inheritance
//!
//! Visibility cascades from ancestors as a floor. Grants do not cascade: a
//! grant applies to the resource that carries it.

pub mod acl;
pub mod error;
pub mod grant;
pub mod principal;
pub mod resolve;
pub mod roles;
pub mod visibility;

// Re-export main types for convenience
pub use acl::{AccessControlList, DEMOTED_OWNER_ROLE};
pub use error::{AclError, AclResult};
pub use grant::{Grant, GrantId};
pub use principal::Principal;
pub use resolve::effective_role;
pub use roles::Role;
pub use visibility::Visibility;
