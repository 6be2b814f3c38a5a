//! Crash-consistent EBS snapshots.
//!
//! A run freezes a set of mount points, requests one snapshot per volume in
//! parallel and thaws the mount points again on every exit path. Which mount
//! points back which volumes is not checked: the caller pairs them.

pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod http;
pub mod operations;
pub mod services;
pub mod signals;
pub mod snapshot;
pub mod targets;

// Re-export commonly used types
pub use config::{ConfigManager, Settings};
pub use context::RunContext;
pub use errors::{ConfigError, ShutterError, ValidationError};
pub use operations::{Orchestrator, RunReport};
pub use services::{CommandFreezer, FreezePrimitive, FreezeTool};
pub use snapshot::{Ec2SnapshotClient, SnapshotBackend, SnapshotId};
pub use targets::{TargetSet, VolumeTarget};
