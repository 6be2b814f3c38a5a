// File: shutter/src/http/mod.rs
//! HTTP access to the EC2 instance metadata service
//!
//! Used only during pre-flight: region discovery when `--region` is absent and
//! instance role credentials when the environment carries none.
//!
//! # Communication Pattern
//!
//! 1. Request an IMDSv2 session token (`PUT /latest/api/token`)
//! 2. Send metadata `GET`s with the token header, or without it when the
//!    token request failed (IMDSv1)
//! 3. Every request has a short timeout so runs off-instance fail fast

pub mod metadata;

pub use metadata::{InstanceMetadataClient, RoleCredentials};
