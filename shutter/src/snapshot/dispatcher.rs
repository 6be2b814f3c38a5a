use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, Instrument};

use super::backend::{SnapshotBackend, SnapshotId};
use crate::context::RunContext;
use crate::errors::SnapshotRequestError;
use crate::targets::{TargetSet, VolumeTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    pub volume_id: String,
    pub description: String,
    pub result: Result<SnapshotId, SnapshotRequestError>,
}

impl SnapshotOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn snapshot_id(&self) -> Option<&SnapshotId> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&SnapshotRequestError> {
        self.result.as_ref().err()
    }
}

/// Request one snapshot per target, concurrently, and wait for all of them.
///
/// Returns one outcome per target in target order.
pub async fn dispatch_snapshots(
    ctx: &RunContext,
    backend: Arc<dyn SnapshotBackend>,
    targets: &TargetSet,
) -> Vec<SnapshotOutcome> {
    let mut tasks = Vec::with_capacity(targets.len());

    for target in targets.iter() {
        let task = {
            let backend = backend.clone();
            let VolumeTarget {
                volume_id,
                description,
            } = target.clone();

            tokio::spawn(
                async move {
                    info!("Creating snapshot for {}", volume_id);

                    let result = backend.create_snapshot(&volume_id, &description).await;
                    match &result {
                        Ok(snapshot_id) => {
                            info!("✓ Created snapshot {} for {}", snapshot_id, volume_id)
                        }
                        Err(e) => error!("Could not create snapshot for {}: {}", volume_id, e),
                    }
                    result
                }
                .instrument(ctx.span()),
            )
        };
        tasks.push(task);
    }

    let results = join_all(tasks).await;

    targets
        .iter()
        .zip(results)
        .map(|(target, joined)| {
            let result = joined.unwrap_or_else(|e| {
                error!("Snapshot worker for {} panicked: {}", target.volume_id, e);
                Err(SnapshotRequestError::WorkerAborted {
                    reason: e.to_string(),
                })
            });
            SnapshotOutcome {
                volume_id: target.volume_id.clone(),
                description: target.description.clone(),
                result,
            }
        })
        .collect()
}
