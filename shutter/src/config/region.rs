use tracing::debug;

use crate::constants::regions;
use crate::errors::ConfigError;
use crate::http::InstanceMetadataClient;

/// Explicit region if given, else the instance's own region.
///
/// Either way the name must be a known AWS region.
pub async fn resolve_region(
    explicit: Option<&str>,
    metadata: &InstanceMetadataClient,
) -> Result<String, ConfigError> {
    let region = match explicit.map(str::trim).filter(|r| !r.is_empty()) {
        Some(region) => region.to_string(),
        None => {
            debug!("No region given, asking instance metadata");
            metadata
                .region()
                .await
                .map_err(|e| ConfigError::RegionUnavailable {
                    reason: e.to_string(),
                })?
        }
    };

    if !regions::is_known(&region) {
        return Err(ConfigError::UnknownRegion { region });
    }

    Ok(region)
}
