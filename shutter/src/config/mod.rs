pub mod manager;
pub mod region;

use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};
use crate::services::FreezeTool;

pub use manager::ConfigManager;
pub use region::resolve_region;

/// Contents of the optional `--config` TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub region: Option<String>,
    #[serde(default)]
    pub volumes: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub partitions: Vec<String>,
    pub freeze_tool: Option<FreezeTool>,
    pub endpoint: Option<String>,
    pub strict: Option<bool>,
}

/// Effective settings for one run: command line over file over defaults
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub region: Option<String>,
    pub volumes: Vec<String>,
    pub descriptions: Vec<String>,
    pub partitions: Vec<String>,
    pub freeze_tool: FreezeTool,
    pub endpoint: Option<String>,
    pub strict: bool,
    pub output: OutputFormat,
    pub debug: bool,
}

impl Settings {
    /// List options given on the command line replace the file's list
    pub fn merge(file: FileConfig, cli: &Cli) -> Self {
        let pick = |from_cli: &Vec<String>, from_file: Vec<String>| {
            if from_cli.is_empty() {
                from_file
            } else {
                from_cli.clone()
            }
        };

        Self {
            region: cli.region.clone().or(file.region),
            volumes: pick(&cli.volumes, file.volumes),
            descriptions: pick(&cli.descriptions, file.descriptions),
            partitions: pick(&cli.partitions, file.partitions),
            freeze_tool: cli.freeze_tool.or(file.freeze_tool).unwrap_or_default(),
            endpoint: cli.endpoint.clone().or(file.endpoint),
            strict: cli.strict || file.strict.unwrap_or(false),
            output: cli.output,
            debug: cli.debug,
        }
    }
}
