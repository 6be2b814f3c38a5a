//! Error types for shutter
//!
//! Pre-flight errors (validation, configuration) terminate a run before any
//! filesystem or backend side effect. Per-item errors (freeze commands,
//! snapshot requests) are captured into outcomes and never abort a run.

use thiserror::Error;

/// Main error type for a backup run
#[derive(Debug, Error)]
pub enum ShutterError {
    /// Invalid volume/description input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Region, credential or configuration file problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Other errors with context
    #[error("{0}")]
    Other(String),
}

/// Target set validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No volume identifiers were supplied
    #[error("No volumes specified")]
    NoVolumes,

    /// Description count is neither 1 nor equal to the volume count
    #[error("Mis-matched {descriptions} descriptions to {volumes} volumes")]
    DescriptionMismatch { descriptions: usize, volumes: usize },

    /// The same volume identifier was listed more than once
    #[error("Volume '{volume_id}' specified more than once")]
    DuplicateVolume { volume_id: String },

    /// An empty or whitespace-only volume identifier. Any other identifier
    /// is passed to the backend exactly as given, surrounding whitespace
    /// included.
    #[error("Volume identifier at position {position} is blank")]
    BlankVolume { position: usize },
}

/// Configuration error variants
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load configuration file
    #[error("Failed to load config from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// Configuration parsing error
    #[error("Failed to parse config '{path}': {reason}")]
    ParseError { path: String, reason: String },

    /// Region name is not a known AWS region
    #[error("Given region {region} not a supported AWS region")]
    UnknownRegion { region: String },

    /// No region given and the instance metadata service could not supply one
    #[error("Could not get instance metadata for region: {reason}")]
    RegionUnavailable { reason: String },

    /// Neither environment nor instance role credentials were found
    #[error("No AWS credentials found: {reason}")]
    MissingCredentials { reason: String },

    /// Invalid configuration value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Freeze/thaw command failures. Logged and counted, never escalated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FreezeCommandError {
    /// The command could not be started at all
    #[error("Failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The command ran and exited unsuccessfully
    #[error("{program} exited with code {exit_code}: {stderr}")]
    NonZeroExit {
        program: String,
        exit_code: i32,
        stderr: String,
    },

    /// The worker for this mount point panicked or was cancelled
    #[error("Freeze worker aborted: {reason}")]
    WorkerAborted { reason: String },
}

/// A single volume's snapshot request failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotRequestError {
    /// Transport-level failure talking to the API
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// The API rejected the request
    #[error("{code}: {message}")]
    Api { code: String, message: String },

    /// The API answered with something we could not interpret
    #[error("Invalid response (HTTP {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },

    /// The worker for this volume panicked or was cancelled
    #[error("Snapshot worker aborted: {reason}")]
    WorkerAborted { reason: String },
}

impl From<anyhow::Error> for ShutterError {
    fn from(err: anyhow::Error) -> Self {
        ShutterError::Other(err.to_string())
    }
}

impl ShutterError {
    /// Process exit code for a run that failed before any side effect
    pub fn exit_code(&self) -> i32 {
        crate::constants::exit_codes::PREFLIGHT_FAILURE
    }
}
