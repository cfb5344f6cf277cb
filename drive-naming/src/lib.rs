//! # Drive Naming Policy
//!
//! This crate validates proposed folder names before they enter the drive tree.
//!
//! ## Overview
//!
//! The drive-naming crate handles:
//! - **Built-in checks**: Non-empty names, a maximum length, and the characters
//!   reserved by the storage path grammar (`< > : " / \ | ? *`)
//! - **Naming rules**: Pattern rules that are either required (blocking) or
//!   advisory (reported as warnings)
//! - **Default rules**: The shipped conventions (ISO date prefix, no spaces,
//!   version suffix, category tag)
//!
//! ## Usage
//!
//! ```rust
//! use drive_naming::{NamingPolicy, NamingError, rule_ids};
//!
//! let policy = NamingPolicy::with_default_rules().unwrap();
//!
//! let report = policy.validate("2024-01-15_Report").unwrap();
//! assert!(report.warnings.contains(&"3".to_string()));
//!
//! match policy.validate("bad:name") {
//!     Err(NamingError::Rejected { violations, .. }) => {
//!         assert!(violations.contains(&rule_ids::RESERVED_CHARACTERS.to_string()));
//!     }
//!     other => panic!("expected rejection, got {:?}", other),
//! }
//! ```
//!
//! ## Evaluation
//!
//! Every rule is evaluated on every call; a name is accepted only if all
//! required rules pass, and the rejection lists every violated rule.

pub mod defaults;
pub mod error;
pub mod policy;
pub mod rule;

// Re-export main types for convenience
pub use defaults::default_rules;
pub use error::{NamingError, NamingResult};
pub use policy::{rule_ids, NamingPolicy, NamingReport, DEFAULT_MAX_NAME_LENGTH, RESERVED_CHARACTERS};
pub use rule::NamingRule;
