use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::services::FreezeTool;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Crash-consistent EBS snapshots.
///
/// Freezes the given partitions, snapshots the given volumes in parallel and
/// thaws the partitions again, whether or not the snapshots succeeded.
///
/// shutter does not check that a frozen partition lives on one of the
/// snapshotted volumes. Pairing them correctly is up to the operator.
#[derive(Debug, Clone, Parser)]
#[command(name = "shutter", version)]
pub struct Cli {
    /// EC2 region to look for EBS volumes in. Only required when not running
    /// on an EC2 instance.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Volume to snapshot. Can be given multiple times.
    #[arg(long = "volume", value_name = "VOLUME_ID")]
    pub volumes: Vec<String>,

    /// Snapshot description. Give exactly one to share it between all
    /// volumes, or one per volume in the same order as --volume.
    #[arg(long = "description", value_name = "TEXT")]
    pub descriptions: Vec<String>,

    /// Mount point to freeze while the snapshots are requested. Can be given
    /// multiple times.
    #[arg(long = "partition", value_name = "MOUNT_POINT")]
    pub partitions: Vec<String>,

    /// TOML file with defaults for any of these options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tool used to freeze and thaw partitions [default: xfs_freeze]
    #[arg(long, value_enum)]
    pub freeze_tool: Option<FreezeTool>,

    /// Override the EC2 API endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Exit non-zero when any snapshot request fails
    #[arg(long)]
    pub strict: bool,

    /// Print the run report to stdout in this format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Enable debug output, including freeze tool output
    #[arg(long)]
    pub debug: bool,
}
