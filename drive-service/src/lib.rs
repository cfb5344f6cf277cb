//! # Drive Service
//!
//! The facade the UI layer uses to manage shared-drive folders and their
//! permissions.
//!
//! ## Overview
//!
//! The drive-service crate handles:
//! - **Folders**: Create, rename, move, delete, list, search, templates
//! - **Permissions**: Grants, role changes, visibility, ownership transfer,
//!   effective-role resolution
//! - **Persistence**: Every successful mutation is saved through a `TreeStore`
//! - **Configuration**: `DriveConfig` loaded from `DRIVE_*` environment variables
//! - **Logging**: `tracing` spans on every call, see [`telemetry`]
//!
//! ## Usage
//!
//! ```rust
//! use drive_acl::{Principal, Role, Visibility};
//! use drive_service::{DriveConfig, DriveError, ResourceService};
//!
//! # async fn example() -> Result<(), DriveError> {
//! let config = DriveConfig::default().with_root_owner("alice@x.com");
//! let service = ResourceService::from_config(&config).await?;
//! let root = service.root().await;
//!
//! let report = service.create_folder("2024-01-15_Report", root, None).await?;
//! service.add_permission(report.id, Principal::user("bob@x.com"), Role::Reader).await?;
//! service.set_visibility(root, Visibility::Public).await?;
//!
//! let carol = Principal::user("carol@x.com");
//! assert_eq!(service.get_effective_permissions(report.id, &carol).await?, Some(Role::Reader));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Reads share the tree lock; mutations hold it exclusively for validation,
//! the save, and the commit. Readers never see a half-applied change.

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

// Re-export main types for convenience
pub use config::{DriveConfig, NamingRulesSource};
pub use error::{DriveError, DriveResult};
pub use service::ResourceService;
pub use telemetry::init_tracing;
