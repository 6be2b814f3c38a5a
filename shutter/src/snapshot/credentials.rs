use std::fmt;
use tracing::{debug, info};

use crate::constants::env;
use crate::errors::ConfigError;
use crate::http::InstanceMetadataClient;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    /// Static credentials from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
    pub fn from_env() -> Option<Self> {
        let access_key_id = non_empty_var(env::ACCESS_KEY_ID)?;
        let secret_access_key = non_empty_var(env::SECRET_ACCESS_KEY)?;

        Some(Self::new(
            access_key_id,
            secret_access_key,
            non_empty_var(env::SESSION_TOKEN),
        ))
    }

    /// Environment first, then the instance profile role.
    pub async fn resolve(metadata: &InstanceMetadataClient) -> Result<Self, ConfigError> {
        if let Some(credentials) = Self::from_env() {
            debug!("Using credentials from environment");
            return Ok(credentials);
        }

        let role = metadata
            .role_credentials()
            .await
            .map_err(|e| ConfigError::MissingCredentials {
                reason: format!(
                    "{} / {} not set and instance role unavailable ({})",
                    env::ACCESS_KEY_ID,
                    env::SECRET_ACCESS_KEY,
                    e
                ),
            })?;

        info!("Using instance profile credentials");
        Ok(Self::new(role.access_key_id, role.secret_access_key, role.token))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
