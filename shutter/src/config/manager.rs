use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use super::{FileConfig, Settings};
use crate::cli::Cli;
use crate::errors::ConfigError;

pub struct ConfigManager {
    settings: Settings,
}

impl ConfigManager {
    pub async fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Self::load_file(path).await?,
            None => FileConfig::default(),
        };

        Ok(Self {
            settings: Settings::merge(file, cli),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub async fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
        debug!("Loading config file: {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(
            "Loaded config {}: {} volumes, {} descriptions, {} partitions",
            path.display(),
            config.volumes.len(),
            config.descriptions.len(),
            config.partitions.len()
        );

        Ok(config)
    }
}
