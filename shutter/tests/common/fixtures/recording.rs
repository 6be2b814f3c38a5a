//! In-memory collaborators that record every call

use async_trait::async_trait;
use shutter::errors::{FreezeCommandError, SnapshotRequestError};
use shutter::services::{CommandOutput, FreezeAction, FreezePrimitive};
use shutter::snapshot::{SnapshotBackend, SnapshotId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Freeze primitive that records calls and fails for selected mount points
#[derive(Default)]
pub struct RecordingFreezer {
    calls: Mutex<Vec<(FreezeAction, String)>>,
    failing: HashSet<String>,
    freeze_delay: Option<Duration>,
}

impl RecordingFreezer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mount_points: &[&str]) -> Self {
        Self {
            failing: mount_points.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Freezes take `delay` before they are recorded as done
    pub fn with_freeze_delay(mut self, delay: Duration) -> Self {
        self.freeze_delay = Some(delay);
        self
    }

    /// Mount points passed to `action`, sorted
    pub fn calls(&self, action: FreezeAction) -> Vec<String> {
        let mut calls: Vec<String> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| *a == action)
            .map(|(_, mount_point)| mount_point.clone())
            .collect();
        calls.sort();
        calls
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every call in the order it was made
    pub fn sequence(&self) -> Vec<(FreezeAction, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, action: FreezeAction, mount_point: &str) -> Result<CommandOutput, FreezeCommandError> {
        self.calls
            .lock()
            .unwrap()
            .push((action, mount_point.to_string()));

        if self.failing.contains(mount_point) {
            return Err(FreezeCommandError::NonZeroExit {
                program: "xfs_freeze".to_string(),
                exit_code: 1,
                stderr: format!("{}: Operation not supported", mount_point),
            });
        }

        Ok(CommandOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

#[async_trait]
impl FreezePrimitive for RecordingFreezer {
    async fn freeze(&self, mount_point: &str) -> Result<CommandOutput, FreezeCommandError> {
        if let Some(delay) = self.freeze_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(FreezeAction::Freeze, mount_point)
    }

    async fn thaw(&self, mount_point: &str) -> Result<CommandOutput, FreezeCommandError> {
        self.record(FreezeAction::Thaw, mount_point)
    }
}

/// Snapshot backend with per-volume scripted behaviour
#[derive(Default)]
pub struct ScriptedBackend {
    requests: Mutex<Vec<(String, String)>>,
    rejected: HashSet<String>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting(volume_ids: &[&str]) -> Self {
        Self {
            rejected: volume_ids.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn panicking_on(volume_ids: &[&str]) -> Self {
        Self {
            panicking: volume_ids.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of requests that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// `(volume_id, description)` pairs, sorted
    pub fn requests(&self) -> Vec<(String, String)> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort();
        requests
    }
}

#[async_trait]
impl SnapshotBackend for ScriptedBackend {
    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<SnapshotId, SnapshotRequestError> {
        self.requests
            .lock()
            .unwrap()
            .push((volume_id.to_string(), description.to_string()));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.contains(volume_id) {
            panic!("backend crashed on {}", volume_id);
        }

        if self.rejected.contains(volume_id) {
            return Err(SnapshotRequestError::Api {
                code: "InvalidVolume.NotFound".to_string(),
                message: format!("The volume '{}' does not exist.", volume_id),
            });
        }

        Ok(SnapshotId::new(format!("snap-{}", volume_id.trim_start_matches("vol-"))))
    }
}
