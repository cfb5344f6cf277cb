//! # Effective Role Resolution
//!
//! Combines a resource's own list with the lists of its ancestors.
//!
//! ## Algorithm
//!
//! ```text
//! floor = None
//! for acl in ancestors (root first):   floor = max(floor, acl.visibility.floor())
//! floor = max(floor, node.visibility.floor())
//! role  = max(floor, node.explicit_role(principal))
//! ```
//!
//! Visibility only ever raises the floor. An explicit grant on the node is
//! never capped by it, so a public parent makes its contents readable while a
//! specific writer keeps their writer role.

use crate::acl::AccessControlList;
use crate::principal::Principal;
use crate::roles::Role;

/// Resolve the role `principal` effectively holds on a resource.
///
/// # Arguments
///
/// * `principal` - Who is asking
/// * `node` - The resource's own list
/// * `ancestors` - Lists of the resource's ancestors, root first, excluding the node
///
/// # Returns
///
/// The effective role, or `None` if the principal has no access
///
/// # Example
///
/// ```
/// use drive_acl::{effective_role, AccessControlList, Principal, Role, Visibility};
///
/// let mut root = AccessControlList::with_owner(Principal::user("alice@x.com")).unwrap();
/// root.set_visibility(Visibility::Public);
///
/// let mut doc = AccessControlList::new();
/// doc.grant(Principal::user("bob@x.com"), Role::Writer).unwrap();
///
/// let carol = Principal::user("carol@x.com");
/// assert_eq!(effective_role(&carol, &doc, [&root]), Some(Role::Reader));
///
/// let bob = Principal::user("bob@x.com");
/// assert_eq!(effective_role(&bob, &doc, [&root]), Some(Role::Writer));
/// ```
pub fn effective_role<'a, I>(principal: &Principal, node: &AccessControlList, ancestors: I) -> Option<Role>
where
    I: IntoIterator<Item = &'a AccessControlList>,
{
    let inherited = ancestors
        .into_iter()
        .filter_map(|acl| acl.visibility().floor())
        .max();
    let floor = inherited.max(node.visibility().floor());

    floor.max(node.explicit_role(principal))
}
