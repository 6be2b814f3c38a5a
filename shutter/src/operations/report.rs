//! Aggregate outcome of one backup run
//!
//! Holds one outcome per frozen mount point, per thawed mount point and per
//! requested volume. Serializes to the JSON printed by `--output json`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::exit_codes;
use crate::services::{CommandOutput, FreezeAction, FreezeOutcome};
use crate::snapshot::SnapshotOutcome;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub region: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub freeze_outcomes: Vec<FreezeOutcome>,
    pub thaw_outcomes: Vec<FreezeOutcome>,
    pub snapshot_outcomes: Vec<SnapshotOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.snapshot_outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.snapshot_outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SnapshotOutcome> {
        self.snapshot_outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn freeze_failures(&self) -> usize {
        self.freeze_outcomes.iter().filter(|o| !o.is_success()).count()
    }

    pub fn thaw_failures(&self) -> usize {
        self.thaw_outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Partial snapshot failure only affects the exit code in strict mode
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.failed() > 0 {
            exit_codes::SNAPSHOT_FAILURES
        } else {
            exit_codes::SUCCESS
        }
    }

    pub fn log_summary(&self) {
        for outcome in self.failures() {
            if let Some(e) = outcome.error() {
                warn!("Snapshot of {} failed: {}", outcome.volume_id, e);
            }
        }

        let freeze_failures = self.freeze_failures();
        let thaw_failures = self.thaw_failures();
        if freeze_failures > 0 || thaw_failures > 0 {
            warn!(
                "{} of {} freezes and {} of {} thaws failed; affected snapshots may not be consistent",
                freeze_failures,
                self.freeze_outcomes.len(),
                thaw_failures,
                self.thaw_outcomes.len()
            );
        }

        info!(
            "Done! {} snapshot(s) created, {} failed in {:.1}s",
            self.succeeded(),
            self.failed(),
            (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
        );
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    run_id: Uuid,
    region: Option<&'a str>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    succeeded: usize,
    failed: usize,
    snapshots: Vec<SnapshotView<'a>>,
    freezes: Vec<FreezeView<'a>>,
    thaws: Vec<FreezeView<'a>>,
}

#[derive(Serialize)]
struct SnapshotView<'a> {
    volume_id: &'a str,
    description: &'a str,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct FreezeView<'a> {
    mount_point: &'a str,
    action: FreezeAction,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a CommandOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a SnapshotOutcome> for SnapshotView<'a> {
    fn from(outcome: &'a SnapshotOutcome) -> Self {
        Self {
            volume_id: &outcome.volume_id,
            description: &outcome.description,
            success: outcome.is_success(),
            snapshot_id: outcome.snapshot_id().map(|id| id.as_str()),
            error: outcome.error().map(|e| e.to_string()),
        }
    }
}

impl<'a> From<&'a FreezeOutcome> for FreezeView<'a> {
    fn from(outcome: &'a FreezeOutcome) -> Self {
        Self {
            mount_point: &outcome.mount_point,
            action: outcome.action,
            success: outcome.is_success(),
            output: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

impl Serialize for RunReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReportView {
            run_id: self.run_id,
            region: self.region.as_deref(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            succeeded: self.succeeded(),
            failed: self.failed(),
            snapshots: self.snapshot_outcomes.iter().map(SnapshotView::from).collect(),
            freezes: self.freeze_outcomes.iter().map(FreezeView::from).collect(),
            thaws: self.thaw_outcomes.iter().map(FreezeView::from).collect(),
        }
        .serialize(serializer)
    }
}
