//! Integration tests running a real freeze tool process
//!
//! A shell script stands in for `xfs_freeze`. Each test writes and executes
//! a fresh script, so they run serially.

mod common;

use common::fixtures::*;
use serial_test::serial;
use shutter::errors::FreezeCommandError;
use shutter::services::FreezeAction;
use shutter::{CommandFreezer, FreezePrimitive, Orchestrator, RunContext};
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_freeze_and_thaw_flags() {
    let tool = FakeFreezeTool::install();
    let freezer = CommandFreezer::new(tool.program());

    let output = freezer.freeze("/data").await.unwrap();
    assert_eq!(output.stdout.trim(), "/data done");
    freezer.thaw("/data").await.unwrap();

    assert_eq!(tool.raw_calls(), vec!["-f /data", "-u /data"]);
}

#[tokio::test]
#[serial]
async fn test_failing_tool_reports_stderr() {
    let tool = FakeFreezeTool::install();
    let freezer = CommandFreezer::new(tool.program());

    let err = freezer.freeze("/fail-xfs").await.unwrap_err();

    match err {
        FreezeCommandError::NonZeroExit {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, 1);
            assert_eq!(stderr, "/fail-xfs: Operation not supported");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
#[serial]
async fn test_missing_tool_is_spawn_error() {
    let freezer = CommandFreezer::new("/nonexistent/xfs_freeze");

    let err = freezer.freeze("/data").await.unwrap_err();
    assert!(matches!(err, FreezeCommandError::Spawn { .. }));
}

#[tokio::test]
#[serial]
async fn test_backup_thaws_every_frozen_partition() {
    let tool = FakeFreezeTool::install();
    let freezer = Arc::new(CommandFreezer::new(tool.program()));
    let backend = Arc::new(ScriptedBackend::rejecting(&["vol-2"]));
    let orchestrator = Orchestrator::new(freezer, backend);

    let report = orchestrator
        .run(
            &RunContext::new(true),
            &["vol-1", "vol-2"],
            &["nightly"],
            vec!["/data".to_string(), "/fail".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.freeze_failures(), 1);
    assert_eq!(report.thaw_failures(), 1);
    assert_eq!(
        tool.calls(),
        vec!["-f /data", "-f /fail", "-u /data", "-u /fail"]
    );

    let frozen: Vec<&str> = report
        .freeze_outcomes
        .iter()
        .filter(|o| o.action == FreezeAction::Freeze && o.result.is_ok())
        .map(|o| o.mount_point.as_str())
        .collect();
    assert_eq!(frozen, vec!["/data"]);
}
