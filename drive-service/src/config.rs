//! Drive service configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development.

use drive_naming::{default_rules, NamingPolicy, NamingRule, DEFAULT_MAX_NAME_LENGTH};
use drive_tree::{JsonFileTreeStore, MemoryTreeStore, TreeStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{DriveError, DriveResult};

/// Which naming rules the service enforces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum NamingRulesSource {
    /// The shipped default rules
    Default,

    /// Built-in checks only
    None,

    /// A JSON file holding a list of rules
    File(PathBuf),

    /// Rules supplied directly
    Inline(Vec<NamingRule>),
}

impl NamingRulesSource {
    /// Parse the `DRIVE_NAMING_RULES` value: `default`, `none`, or a file path.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "default" => Self::Default,
            "none" => Self::None,
            _ => Self::File(PathBuf::from(s.trim())),
        }
    }
}

/// Drive service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Display name of the root folder.
    pub root_name: String,

    /// Principal granted `owner` on a freshly created root.
    pub root_owner: Option<String>,

    /// Naming rules to enforce.
    pub naming_rules: NamingRulesSource,

    /// Maximum folder name length in characters.
    pub max_name_length: usize,

    /// JSON snapshot file; the in-memory store is used when unset.
    pub store_path: Option<PathBuf>,
}

impl Default for DriveConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            root_name: "Mi Unidad".to_string(),
            root_owner: None,
            naming_rules: NamingRulesSource::Default,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            store_path: None,
        }
    }
}

impl DriveConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DRIVE_ROOT_NAME`: Root folder name (default: Mi Unidad)
    /// - `DRIVE_ROOT_OWNER`: Owner of a freshly created root (e.g. alice@example.com)
    /// - `DRIVE_NAMING_RULES`: `default`, `none`, or a path to a JSON rule list (default: default)
    /// - `DRIVE_MAX_NAME_LENGTH`: Maximum name length (default: 255)
    /// - `DRIVE_STORE_PATH`: JSON snapshot file (default: in-memory)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            root_name: std::env::var("DRIVE_ROOT_NAME").unwrap_or(default.root_name),
            root_owner: std::env::var("DRIVE_ROOT_OWNER").ok().filter(|s| !s.trim().is_empty()),
            naming_rules: std::env::var("DRIVE_NAMING_RULES")
                .map(|s| NamingRulesSource::parse(&s))
                .unwrap_or(default.naming_rules),
            max_name_length: std::env::var("DRIVE_MAX_NAME_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_name_length),
            store_path: std::env::var("DRIVE_STORE_PATH").ok().map(PathBuf::from),
        }
    }

    /// Set the root owner.
    pub fn with_root_owner(mut self, owner: impl Into<String>) -> Self {
        self.root_owner = Some(owner.into());
        self
    }

    /// Set the naming rules.
    pub fn with_naming_rules(mut self, rules: NamingRulesSource) -> Self {
        self.naming_rules = rules;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> DriveResult<()> {
        if self.root_name.trim().is_empty() {
            return Err(DriveError::Config("root name must not be empty".to_string()));
        }
        if self.max_name_length == 0 {
            return Err(DriveError::Config("max name length must be positive".to_string()));
        }
        if let Some(owner) = &self.root_owner {
            match drive_acl::Principal::parse(owner) {
                Some(drive_acl::Principal::User(_)) => {}
                Some(other) => {
                    return Err(DriveError::Config(format!(
                        "root owner must be a user, not {}",
                        other
                    )));
                }
                None => return Err(DriveError::Config(format!("invalid root owner: {}", owner))),
            }
        }
        Ok(())
    }

    /// Build the naming policy this configuration describes.
    ///
    /// Reads the rule file when the source is a path.
    pub fn naming_policy(&self) -> DriveResult<NamingPolicy> {
        let rules = match &self.naming_rules {
            NamingRulesSource::Default => default_rules(),
            NamingRulesSource::None => Vec::new(),
            NamingRulesSource::Inline(rules) => rules.clone(),
            NamingRulesSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    DriveError::Config(format!("cannot read naming rules {}: {}", path.display(), e))
                })?;
                serde_json::from_slice(&bytes).map_err(|e| {
                    DriveError::Config(format!("cannot parse naming rules {}: {}", path.display(), e))
                })?
            }
        };

        let policy = NamingPolicy::new(rules).map_err(|e| DriveError::Config(e.to_string()))?;
        Ok(policy.with_max_length(self.max_name_length))
    }

    /// Build the tree store: a JSON file when `store_path` is set, otherwise
    /// an in-memory store.
    pub fn tree_store(&self) -> Arc<dyn TreeStore> {
        match &self.store_path {
            Some(path) => Arc::new(JsonFileTreeStore::new(path.clone())),
            None => Arc::new(MemoryTreeStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriveConfig::default();
        assert_eq!(config.root_name, "Mi Unidad");
        assert_eq!(config.max_name_length, 255);
        assert_eq!(config.naming_rules, NamingRulesSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_naming_rules_source_parse() {
        assert_eq!(NamingRulesSource::parse("default"), NamingRulesSource::Default);
        assert_eq!(NamingRulesSource::parse("NONE"), NamingRulesSource::None);
        assert_eq!(
            NamingRulesSource::parse("/etc/drive/rules.json"),
            NamingRulesSource::File(PathBuf::from("/etc/drive/rules.json"))
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DriveConfig::default();
        config.root_name = "  ".to_string();
        assert!(config.validate().is_err());

        let config = DriveConfig::default().with_root_owner("not-an-email");
        assert!(matches!(config.validate(), Err(DriveError::Config(_))));

        let mut config = DriveConfig::default();
        config.max_name_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_user_root_owner() {
        assert!(DriveConfig::default().with_root_owner("alice@x.com").validate().is_ok());
        for owner in ["anyone", "domain:x.com", "group:team@x.com"] {
            let config = DriveConfig::default().with_root_owner(owner);
            assert!(matches!(config.validate(), Err(DriveError::Config(_))), "{}", owner);
        }
    }

    #[test]
    fn test_naming_policy_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"[{"id": "lower", "name": "Lowercase", "pattern": "^[a-z]+$", "required": true}]"#,
        )
        .unwrap();

        let config = DriveConfig::default().with_naming_rules(NamingRulesSource::File(path));
        let policy = config.naming_policy().unwrap();
        assert!(policy.accepts("docs"));
        assert!(!policy.accepts("Docs"));
    }

    #[test]
    fn test_naming_policy_reports_bad_rules() {
        let config = DriveConfig::default()
            .with_naming_rules(NamingRulesSource::Inline(vec![NamingRule::required("x", "X", "(")]));
        assert!(matches!(config.naming_policy(), Err(DriveError::Config(_))));

        let config = DriveConfig::default()
            .with_naming_rules(NamingRulesSource::File(PathBuf::from("/nonexistent/rules.json")));
        assert!(matches!(config.naming_policy(), Err(DriveError::Config(_))));
    }
}
