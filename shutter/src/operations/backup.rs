use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

use super::report::RunReport;
use crate::context::RunContext;
use crate::errors::ValidationError;
use crate::services::{with_frozen, FreezePrimitive};
use crate::snapshot::{dispatch_snapshots, SnapshotBackend};
use crate::targets::TargetSet;

/// Progress of a run. `Unfrozen` is reached from any state after `Frozen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Validated,
    Frozen,
    SnapshotsDispatched,
    Unfrozen,
    Done,
}

fn enter(state: RunState) {
    debug!("run state: {:?}", state);
}

/// Freeze → snapshot → thaw sequencing over injectable collaborators
pub struct Orchestrator {
    freezer: Arc<dyn FreezePrimitive>,
    backend: Arc<dyn SnapshotBackend>,
}

impl Orchestrator {
    pub fn new(freezer: Arc<dyn FreezePrimitive>, backend: Arc<dyn SnapshotBackend>) -> Self {
        Self { freezer, backend }
    }

    /// Validate the inputs, then run. Validation failures happen before
    /// anything is frozen.
    pub async fn run<V, D>(
        &self,
        ctx: &RunContext,
        volumes: &[V],
        descriptions: &[D],
        partitions: Vec<String>,
    ) -> Result<RunReport, ValidationError>
    where
        V: AsRef<str>,
        D: AsRef<str>,
    {
        enter(RunState::Start);
        let targets = TargetSet::build(volumes, descriptions)?;
        Ok(self.execute(ctx, targets, partitions).await)
    }

    /// Run against an already validated target set.
    ///
    /// The partitions are thawed after the snapshot phase on every path,
    /// including a panic inside it.
    pub async fn execute(
        &self,
        ctx: &RunContext,
        targets: TargetSet,
        partitions: Vec<String>,
    ) -> RunReport {
        let span = ctx.span();

        async {
            enter(RunState::Validated);
            info!(
                "Backing up {} volume(s), freezing {} partition(s)",
                targets.len(),
                partitions.len()
            );

            let backend = self.backend.clone();
            let frozen = with_frozen(ctx, self.freezer.clone(), partitions, || async {
                enter(RunState::Frozen);
                let outcomes = dispatch_snapshots(ctx, backend, &targets).await;
                enter(RunState::SnapshotsDispatched);
                outcomes
            })
            .await;
            enter(RunState::Unfrozen);

            let report = RunReport {
                run_id: ctx.run_id,
                region: ctx.region.clone(),
                started_at: ctx.started_at,
                finished_at: Utc::now(),
                freeze_outcomes: frozen.freeze_outcomes,
                thaw_outcomes: frozen.thaw_outcomes,
                snapshot_outcomes: frozen.value,
            };
            enter(RunState::Done);
            report
        }
        .instrument(span)
        .await
    }
}
