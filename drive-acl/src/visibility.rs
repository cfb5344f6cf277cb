//! Resource visibility levels.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Visibility level of a resource.
///
/// Determines whether anyone beyond the explicit grants can see a resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only explicit grants have access
    Private,

    /// Explicit grants apply and may be extended by invitation
    Shared,

    /// Anyone holds at least reader
    Public,
}

impl Visibility {
    /// The minimum role this visibility implies for every principal.
    ///
    /// # Examples
    ///
    /// ```
    /// use drive_acl::{Role, Visibility};
    ///
    /// assert_eq!(Visibility::Public.floor(), Some(Role::Reader));
    /// assert_eq!(Visibility::Shared.floor(), None);
    /// ```
    pub fn floor(&self) -> Option<Role> {
        match self {
            Self::Public => Some(Role::Reader),
            Self::Private | Self::Shared => None,
        }
    }

    /// Parse from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "private" => Some(Self::Private),
            "shared" => Some(Self::Shared),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
            Self::Public => "public",
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Private
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parse() {
        assert_eq!(Visibility::parse("PUBLIC"), Some(Visibility::Public));
        assert_eq!(Visibility::parse("shared"), Some(Visibility::Shared));
        assert_eq!(Visibility::parse("org"), None);
    }

    #[test]
    fn test_default_is_private() {
        assert_eq!(Visibility::default(), Visibility::Private);
        assert_eq!(Visibility::Private.floor(), None);
    }
}
