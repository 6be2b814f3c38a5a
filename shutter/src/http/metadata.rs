use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::constants::metadata;

/// Temporary credentials of the instance profile role
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleCredentials {
    pub code: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub token: Option<String>,
    pub expiration: Option<String>,
}

pub struct InstanceMetadataClient {
    base_url: String,
    client: Client,
}

impl InstanceMetadataClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(metadata::BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(metadata::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to create metadata HTTP client: {}", e))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// IMDSv2 session token, or `None` when only IMDSv1 is available
    async fn session_token(&self) -> Option<String> {
        let url = format!("{}{}", self.base_url, metadata::TOKEN_PATH);

        let response = self
            .client
            .put(&url)
            .header(metadata::TOKEN_TTL_HEADER, metadata::TOKEN_TTL_SECONDS.to_string())
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => response.text().await.ok(),
            Ok(response) => {
                debug!("IMDSv2 token request returned {}, falling back to IMDSv1", response.status());
                None
            }
            Err(e) => {
                debug!("IMDSv2 token request failed, falling back to IMDSv1: {}", e);
                None
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.session_token().await;

        let mut request = self.client.get(&url);
        if let Some(token) = &token {
            request = request.header(metadata::TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Metadata request {} failed: {}", path, e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Metadata request {} returned {}", path, response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read metadata {}: {}", path, e))?;

        Ok(body.trim().to_string())
    }

    pub async fn availability_zone(&self) -> Result<String> {
        self.get(metadata::AVAILABILITY_ZONE_PATH).await
    }

    /// Region of the running instance, derived from its availability zone
    pub async fn region(&self) -> Result<String> {
        let zone = self.availability_zone().await?;
        region_from_zone(&zone).ok_or_else(|| anyhow!("Unexpected availability zone '{}'", zone))
    }

    pub async fn role_credentials(&self) -> Result<RoleCredentials> {
        let roles = self.get(metadata::SECURITY_CREDENTIALS_PATH).await?;
        let role = roles
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| anyhow!("No instance profile role attached"))?;

        debug!("Using instance profile role {}", role);

        let body = self
            .get(&format!("{}{}", metadata::SECURITY_CREDENTIALS_PATH, role))
            .await?;

        let credentials: RoleCredentials = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse role credentials: {}", e))?;

        if let Some(code) = &credentials.code {
            if code != "Success" {
                return Err(anyhow!("Role credentials unavailable: {}", code));
            }
        }

        Ok(credentials)
    }
}

/// `us-east-1a` → `us-east-1`: drop the trailing zone letter
pub fn region_from_zone(zone: &str) -> Option<String> {
    let zone = zone.trim();
    let last = zone.chars().last()?;
    if !last.is_ascii_alphabetic() || zone.len() < 2 {
        return None;
    }
    Some(zone[..zone.len() - 1].to_string())
}
