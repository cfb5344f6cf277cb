//! Shipped naming conventions.

use crate::rule::NamingRule;

/// The default rule set for shared-drive folders.
///
/// Rules `1` and `2` are required; `3` and `4` are advisory.
///
/// # Example
///
/// ```
/// use drive_naming::default_rules;
///
/// let rules = default_rules();
/// assert_eq!(rules.iter().filter(|r| r.required).count(), 2);
/// ```
pub fn default_rules() -> Vec<NamingRule> {
    vec![
        NamingRule::required("1", "Date format", r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])")
            .with_description("Start names with an ISO date (YYYY-MM-DD)")
            .with_example("2024-01-15_Project_Report"),
        NamingRule::required("2", "No spaces", r"^[A-Za-z0-9._-]+$")
            .with_description("Use underscores or hyphens instead of spaces")
            .with_example("Project_Nexus_Report"),
        NamingRule::advisory("3", "Versions", r"_v[0-9]+$")
            .with_description("End the name with a version suffix")
            .with_example("Document_v2"),
        NamingRule::advisory("4", "Categories", r"^\[[^\]]+\]")
            .with_description("Use square brackets for categories or tags")
            .with_example("[Design]_Final_Mockup"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_default_patterns_compile() {
        for rule in default_rules() {
            assert!(Regex::new(&rule.pattern).is_ok(), "rule {}", rule.id);
        }
    }

    #[test]
    fn test_examples_match_their_own_rule() {
        for rule in default_rules() {
            let re = Regex::new(&rule.pattern).unwrap();
            assert!(re.is_match(&rule.example), "rule {} example {}", rule.id, rule.example);
        }
    }

    #[test]
    fn test_default_rule_ids_unique() {
        let rules = default_rules();
        let mut ids: Vec<_> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }
}
