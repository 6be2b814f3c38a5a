use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::errors::SnapshotRequestError;

/// Opaque backend-assigned snapshot identifier, e.g. `snap-0a1b2c3d`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote storage API able to snapshot a single volume.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<SnapshotId, SnapshotRequestError>;
}
