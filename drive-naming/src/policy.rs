//! # Naming Policy
//!
//! Compiles a rule set once and validates candidate names against it.
//! Validation is pure: the same name and policy always yield the same result.

use regex::Regex;
use std::collections::HashSet;

use crate::defaults::default_rules;
use crate::error::{NamingError, NamingResult};
use crate::rule::NamingRule;

/// Maximum name length in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Characters reserved by the storage path grammar.
pub const RESERVED_CHARACTERS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Ids reported for the built-in checks.
pub mod rule_ids {
    /// Name is empty or whitespace only.
    pub const NOT_EMPTY: &str = "not-empty";
    /// Name exceeds the maximum length.
    pub const MAX_LENGTH: &str = "max-length";
    /// Name contains a reserved character.
    pub const RESERVED_CHARACTERS: &str = "reserved-characters";
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingReport {
    /// Ids of advisory rules the name does not follow.
    pub warnings: Vec<String>,
}

impl NamingReport {
    /// Check if the name follows every rule, advisory ones included.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: NamingRule,
    matcher: Regex,
}

/// A compiled set of naming rules plus the built-in checks.
///
/// # Example
///
/// ```
/// use drive_naming::{NamingPolicy, NamingRule};
///
/// let policy = NamingPolicy::new(vec![
///     NamingRule::required("lower", "Lowercase", r"^[a-z_]+$"),
/// ]).unwrap();
///
/// assert!(policy.validate("quarterly_numbers").is_ok());
/// assert!(policy.validate("Quarterly").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    rules: Vec<CompiledRule>,
    max_length: usize,
}

impl NamingPolicy {
    /// Build a policy from a rule set.
    ///
    /// # Arguments
    ///
    /// * `rules` - The rules to enforce, evaluated in order
    ///
    /// # Returns
    ///
    /// The compiled policy, or an error if a pattern does not compile or
    /// two rules share an id
    pub fn new(rules: Vec<NamingRule>) -> NamingResult<Self> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if !seen.insert(rule.id.clone()) {
                return Err(NamingError::DuplicateRule(rule.id));
            }
            let matcher = Regex::new(&rule.pattern).map_err(|e| NamingError::InvalidPattern {
                rule_id: rule.id.clone(),
                message: e.to_string(),
            })?;
            compiled.push(CompiledRule { rule, matcher });
        }

        Ok(Self {
            rules: compiled,
            max_length: DEFAULT_MAX_NAME_LENGTH,
        })
    }

    /// A policy with only the built-in checks.
    pub fn permissive() -> Self {
        Self {
            rules: Vec::new(),
            max_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }

    /// A policy with the shipped default rules.
    pub fn with_default_rules() -> NamingResult<Self> {
        Self::new(default_rules())
    }

    /// Override the maximum name length (in characters).
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Get the maximum name length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Get the configured rules.
    pub fn rules(&self) -> impl Iterator<Item = &NamingRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Validate a candidate name.
    ///
    /// Built-in checks run first, then every configured rule. All failures are
    /// collected; the name is rejected if any required check failed.
    ///
    /// # Arguments
    ///
    /// * `name` - The candidate name
    ///
    /// # Returns
    ///
    /// A report listing advisory warnings, or [`NamingError::Rejected`] listing
    /// every violated required rule
    pub fn validate(&self, name: &str) -> NamingResult<NamingReport> {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if name.trim().is_empty() {
            violations.push(rule_ids::NOT_EMPTY.to_string());
        }
        if name.chars().count() > self.max_length {
            violations.push(rule_ids::MAX_LENGTH.to_string());
        }
        if name.contains(RESERVED_CHARACTERS) {
            violations.push(rule_ids::RESERVED_CHARACTERS.to_string());
        }

        for compiled in &self.rules {
            if compiled.matcher.is_match(name) {
                continue;
            }
            if compiled.rule.required {
                violations.push(compiled.rule.id.clone());
            } else {
                warnings.push(compiled.rule.id.clone());
            }
        }

        if violations.is_empty() {
            Ok(NamingReport { warnings })
        } else {
            Err(NamingError::Rejected {
                name: name.to_string(),
                violations,
            })
        }
    }

    /// Check if a name would be accepted.
    pub fn accepts(&self, name: &str) -> bool {
        self.validate(name).is_ok()
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations(policy: &NamingPolicy, name: &str) -> Vec<String> {
        match policy.validate(name) {
            Err(NamingError::Rejected { violations, .. }) => violations,
            other => panic!("expected rejection for {:?}, got {:?}", name, other),
        }
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        let policy = NamingPolicy::permissive();
        assert_eq!(violations(&policy, ""), vec![rule_ids::NOT_EMPTY]);
        assert_eq!(violations(&policy, "   \t"), vec![rule_ids::NOT_EMPTY]);
    }

    #[test]
    fn test_max_length_counts_characters() {
        let policy = NamingPolicy::permissive();
        assert!(policy.accepts(&"a".repeat(255)));
        assert_eq!(violations(&policy, &"a".repeat(256)), vec![rule_ids::MAX_LENGTH]);

        // 255 multi-byte characters are still within the limit
        assert!(policy.accepts(&"ñ".repeat(255)));
    }

    #[test]
    fn test_reserved_characters() {
        let policy = NamingPolicy::permissive();
        for c in RESERVED_CHARACTERS {
            let name = format!("bad{}name", c);
            assert_eq!(violations(&policy, &name), vec![rule_ids::RESERVED_CHARACTERS]);
        }
        assert!(policy.accepts("fine name (copy)"));
    }

    #[test]
    fn test_aggregates_every_violation() {
        let policy = NamingPolicy::with_default_rules().unwrap();
        let found = violations(&policy, "bad:name");
        assert_eq!(found, vec![rule_ids::RESERVED_CHARACTERS, "1", "2"]);
    }

    #[test]
    fn test_advisory_rules_only_warn() {
        let policy = NamingPolicy::with_default_rules().unwrap();

        let report = policy.validate("2024-01-15_Report").unwrap();
        assert_eq!(report.warnings, vec!["3", "4"]);
        assert!(!report.is_clean());

        let report = policy.validate("2024-01-15_Report_v2").unwrap();
        assert_eq!(report.warnings, vec!["4"]);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let policy = NamingPolicy::with_default_rules().unwrap();
        for name in ["2024-01-15_Report", "bad:name", "", "Informe Final"] {
            assert_eq!(policy.validate(name), policy.validate(name));
        }
    }

    #[test]
    fn test_default_policy_keeps_every_rule() {
        let policy = NamingPolicy::with_default_rules().unwrap();
        assert_eq!(policy.rules().count(), default_rules().len());
    }

    #[test]
    fn test_invalid_pattern_rejected_at_construction() {
        let err = NamingPolicy::new(vec![NamingRule::required("broken", "Broken", "([a-z")]).unwrap_err();
        assert!(matches!(err, NamingError::InvalidPattern { ref rule_id, .. } if rule_id == "broken"));
    }

    #[test]
    fn test_duplicate_rule_ids_rejected() {
        let err = NamingPolicy::new(vec![
            NamingRule::required("a", "One", ".*"),
            NamingRule::advisory("a", "Two", ".*"),
        ])
        .unwrap_err();
        assert_eq!(err, NamingError::DuplicateRule("a".to_string()));
    }

    #[test]
    fn test_custom_max_length() {
        let policy = NamingPolicy::permissive().with_max_length(4);
        assert!(policy.accepts("abcd"));
        assert_eq!(violations(&policy, "abcde"), vec![rule_ids::MAX_LENGTH]);
    }

    #[test]
    fn test_rules_load_from_json() {
        let json = r#"[
            {"id": "lower", "name": "Lowercase", "pattern": "^[a-z]+$", "required": true},
            {"id": "short", "name": "Short", "pattern": "^.{1,5}$", "required": false}
        ]"#;
        let rules: Vec<NamingRule> = serde_json::from_str(json).unwrap();
        let policy = NamingPolicy::new(rules).unwrap();

        assert_eq!(policy.validate("abc").unwrap().warnings, Vec::<String>::new());
        assert_eq!(policy.validate("abcdefg").unwrap().warnings, vec!["short"]);
        assert_eq!(violations(&policy, "ABC"), vec!["lower"]);
    }
}
