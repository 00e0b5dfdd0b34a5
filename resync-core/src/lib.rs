//! resync core library: configuration, transform rules and change records.
//!
//! Public API surface:
//! - [`transform`]: ordered regex rewrite rules ([`RuleSet`])
//! - [`types`]: [`ChangeRecord`] and [`ChangeStatus`]
//! - [`config`]: `resync.yaml` loading ([`SyncConfig`])
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod transform;
pub mod types;

pub use config::{ReleaseConfig, RuleSpec, SyncConfig, SyncPaths, UpstreamConfig};
pub use error::ConfigError;
pub use transform::{RuleSet, TransformRule};
pub use types::{ChangeRecord, ChangeStatus};
