//! Shell script standing in for `xfs_freeze` / `fsfreeze`
//!
//! Appends `<flag> <mount point>` to a call log and fails for mount points
//! starting with `/fail`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct FakeFreezeTool {
    dir: TempDir,
    pub program: PathBuf,
    pub log: PathBuf,
}

impl FakeFreezeTool {
    pub fn install() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let program = dir.path().join("fake_freeze");
        let log = dir.path().join("calls.log");

        let script = format!(
            r#"#!/bin/sh
echo "$1 $2" >> '{}'
case "$2" in
    /fail*) echo "$2: Operation not supported" >&2; exit 1 ;;
esac
echo "$2 done"
"#,
            log.display()
        );

        fs::write(&program, script).expect("Failed to write fake freeze tool");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake freeze tool executable");

        Self { dir, program, log }
    }

    pub fn program(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Logged calls, sorted
    pub fn calls(&self) -> Vec<String> {
        let mut calls: Vec<String> = fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();
        calls.sort();
        calls
    }

    /// Logged calls in execution order
    pub fn raw_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
