// File: shutter/src/snapshot/mod.rs

//! Block-volume snapshot creation
//!
//! # Key Features
//!
//! - **Backend Trait**: [`SnapshotBackend`] is the only thing the dispatcher
//!   knows about the storage API
//! - **Per-Volume Isolation**: one worker per volume, a failure never cancels
//!   or delays its siblings, nothing is retried
//! - **EC2 Client**: `CreateSnapshot` over the EC2 Query API, signed with
//!   Signature Version 4
//!
//! # Dispatch Process
//!
//! 1. Spawn one request per [`crate::targets::VolumeTarget`]
//! 2. Wait for every request to finish
//! 3. Return exactly one [`SnapshotOutcome`] per volume, in request order

pub mod backend;
pub mod credentials;
pub mod dispatcher;
pub mod ec2;
pub mod sigv4;

pub use backend::{SnapshotBackend, SnapshotId};
pub use credentials::Credentials;
pub use dispatcher::{dispatch_snapshots, SnapshotOutcome};
pub use ec2::Ec2SnapshotClient;
