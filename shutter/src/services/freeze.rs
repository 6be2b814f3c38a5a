//! Filesystem freeze/thaw coordination
//!
//! Every mount point gets its own worker; a phase returns only after all of
//! its workers finished. Failures are logged and recorded in the outcome but
//! never propagated: a mount point that failed to freeze is still thawed.

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use serde::Serialize;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};

use super::commands::CommandOutput;
use crate::context::RunContext;
use crate::errors::FreezeCommandError;

/// External freeze/thaw mechanism for a single mount point
#[async_trait]
pub trait FreezePrimitive: Send + Sync {
    async fn freeze(&self, mount_point: &str) -> Result<CommandOutput, FreezeCommandError>;
    async fn thaw(&self, mount_point: &str) -> Result<CommandOutput, FreezeCommandError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeAction {
    Freeze,
    Thaw,
}

impl FreezeAction {
    fn verb(&self) -> &'static str {
        match self {
            FreezeAction::Freeze => "freeze",
            FreezeAction::Thaw => "thaw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeOutcome {
    pub mount_point: String,
    pub action: FreezeAction,
    pub result: Result<CommandOutput, FreezeCommandError>,
}

impl FreezeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

pub async fn freeze_all(
    ctx: &RunContext,
    freezer: Arc<dyn FreezePrimitive>,
    mount_points: &[String],
) -> Vec<FreezeOutcome> {
    run_phase(ctx, freezer, mount_points, FreezeAction::Freeze).await
}

pub async fn thaw_all(
    ctx: &RunContext,
    freezer: Arc<dyn FreezePrimitive>,
    mount_points: &[String],
) -> Vec<FreezeOutcome> {
    run_phase(ctx, freezer, mount_points, FreezeAction::Thaw).await
}

async fn run_phase(
    ctx: &RunContext,
    freezer: Arc<dyn FreezePrimitive>,
    mount_points: &[String],
    action: FreezeAction,
) -> Vec<FreezeOutcome> {
    let mut tasks = Vec::with_capacity(mount_points.len());

    for mount_point in mount_points {
        let task = {
            let freezer = freezer.clone();
            let mount_point = mount_point.clone();
            let log_output = ctx.log_command_output;

            tokio::spawn(
                async move {
                    let result = match action {
                        FreezeAction::Freeze => {
                            debug!("freezing {} for the snapshots", mount_point);
                            freezer.freeze(&mount_point).await
                        }
                        FreezeAction::Thaw => {
                            debug!("unfreezing {} now that snapshots are complete", mount_point);
                            freezer.thaw(&mount_point).await
                        }
                    };

                    match &result {
                        Ok(output) => {
                            if log_output {
                                debug!("{} debug: {}", mount_point, output.combined());
                            }
                        }
                        Err(e) => warn!("Could not {} {}: {}", action.verb(), mount_point, e),
                    }
                    result
                }
                .instrument(ctx.span()),
            )
        };
        tasks.push(task);
    }

    // join_all keeps input order, so results line up with mount_points
    let results = join_all(tasks).await;

    mount_points
        .iter()
        .zip(results)
        .map(|(mount_point, joined)| {
            let result = joined.unwrap_or_else(|e| {
                error!("{} worker for {} panicked: {}", action.verb(), mount_point, e);
                Err(FreezeCommandError::WorkerAborted {
                    reason: e.to_string(),
                })
            });
            FreezeOutcome {
                mount_point: mount_point.clone(),
                action,
                result,
            }
        })
        .collect()
}

/// Frozen mount points that must be thawed on every exit path.
///
/// Call [`FreezeGuard::release`] to thaw and collect outcomes. A guard that is
/// dropped unreleased (its owning future was cancelled) schedules the thaw on
/// the current runtime. Cancellation during [`FreezeGuard::acquire`] is
/// covered too: the scheduled thaw waits for the in-flight freezes first.
pub struct FreezeGuard {
    ctx: RunContext,
    freezer: Arc<dyn FreezePrimitive>,
    mount_points: Vec<String>,
    freeze_outcomes: Vec<FreezeOutcome>,
    pending_freeze: Option<JoinHandle<Vec<FreezeOutcome>>>,
    released: bool,
}

impl FreezeGuard {
    pub async fn acquire(
        ctx: &RunContext,
        freezer: Arc<dyn FreezePrimitive>,
        mount_points: Vec<String>,
    ) -> Self {
        if !mount_points.is_empty() {
            info!("Freezing {} mount point(s)", mount_points.len());
        }

        let pending_freeze = {
            let ctx = ctx.clone();
            let freezer = freezer.clone();
            let mount_points = mount_points.clone();
            tokio::spawn(async move { freeze_all(&ctx, freezer, &mount_points).await })
        };

        // Armed before the first await: dropping this future from here on
        // still thaws every mount point
        let mut guard = Self {
            ctx: ctx.clone(),
            freezer,
            mount_points,
            freeze_outcomes: Vec::new(),
            pending_freeze: Some(pending_freeze),
            released: false,
        };

        if let Some(pending) = guard.pending_freeze.as_mut() {
            let joined = pending.await;
            guard.pending_freeze = None;
            guard.freeze_outcomes = match joined {
                Ok(outcomes) => outcomes,
                Err(e) => {
                    error!("Freeze phase aborted: {}", e);
                    guard
                        .mount_points
                        .iter()
                        .map(|mount_point| FreezeOutcome {
                            mount_point: mount_point.clone(),
                            action: FreezeAction::Freeze,
                            result: Err(FreezeCommandError::WorkerAborted {
                                reason: e.to_string(),
                            }),
                        })
                        .collect()
                }
            };
        }

        guard
    }

    pub fn freeze_outcomes(&self) -> &[FreezeOutcome] {
        &self.freeze_outcomes
    }

    pub fn mount_points(&self) -> &[String] {
        &self.mount_points
    }

    /// Thaw every mount point, including those whose freeze failed.
    /// Returns `(freeze_outcomes, thaw_outcomes)`.
    pub async fn release(mut self) -> (Vec<FreezeOutcome>, Vec<FreezeOutcome>) {
        if !self.mount_points.is_empty() {
            info!("Thawing {} mount point(s)", self.mount_points.len());
        }
        let thaw_outcomes = thaw_all(&self.ctx, self.freezer.clone(), &self.mount_points).await;
        self.released = true;

        (std::mem::take(&mut self.freeze_outcomes), thaw_outcomes)
    }
}

impl Drop for FreezeGuard {
    fn drop(&mut self) {
        if self.released || self.mount_points.is_empty() {
            return;
        }

        warn!(
            "Freeze guard dropped before release, scheduling thaw of {:?}",
            self.mount_points
        );

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let ctx = self.ctx.clone();
                let freezer = self.freezer.clone();
                let mount_points = std::mem::take(&mut self.mount_points);
                let pending_freeze = self.pending_freeze.take();
                handle.spawn(async move {
                    // Thaw only once the freezes have settled
                    if let Some(pending) = pending_freeze {
                        let _ = pending.await;
                    }
                    thaw_all(&ctx, freezer, &mount_points).await;
                });
            }
            Err(_) => error!(
                "No runtime available to thaw {:?}, thaw them manually",
                self.mount_points
            ),
        }
    }
}

/// Result of a body run between freeze and thaw
#[derive(Debug)]
pub struct FrozenRun<T> {
    pub value: T,
    pub freeze_outcomes: Vec<FreezeOutcome>,
    pub thaw_outcomes: Vec<FreezeOutcome>,
}

/// Freeze `mount_points`, run `body`, then thaw, whatever `body` does.
///
/// A panic inside `body` is caught long enough to thaw and then resumed.
pub async fn with_frozen<F, Fut, T>(
    ctx: &RunContext,
    freezer: Arc<dyn FreezePrimitive>,
    mount_points: Vec<String>,
    body: F,
) -> FrozenRun<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let guard = FreezeGuard::acquire(ctx, freezer, mount_points).await;

    let result = AssertUnwindSafe(body()).catch_unwind().await;

    let (freeze_outcomes, thaw_outcomes) = guard.release().await;

    match result {
        Ok(value) => FrozenRun {
            value,
            freeze_outcomes,
            thaw_outcomes,
        },
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
