use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use super::freeze::FreezePrimitive;
use crate::errors::FreezeCommandError;

/// Captured result of an external command that exited successfully
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout and stderr joined, trimmed, for debug logging
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (false, false) => format!("{}\n{}", stdout, stderr),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (true, true) => String::new(),
        }
    }
}

pub async fn execute_command(program: &str, args: &[&str]) -> Result<CommandOutput, FreezeCommandError> {
    debug!("Executing command: {} {}", program, args.join(" "));

    let output = AsyncCommand::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| FreezeCommandError::Spawn {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    if output.status.success() {
        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr,
        })
    } else {
        let stderr = if !stderr.trim().is_empty() { stderr } else { stdout };
        Err(FreezeCommandError::NonZeroExit {
            program: program.to_string(),
            exit_code,
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Userspace tools that implement filesystem freeze/thaw with `-f` / `-u`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FreezeTool {
    /// xfsprogs `xfs_freeze`
    #[default]
    #[value(name = "xfs_freeze")]
    XfsFreeze,
    /// util-linux `fsfreeze`, works for ext4, btrfs and xfs
    #[value(name = "fsfreeze")]
    Fsfreeze,
}

impl FreezeTool {
    pub fn program(&self) -> &'static str {
        match self {
            FreezeTool::XfsFreeze => "xfs_freeze",
            FreezeTool::Fsfreeze => "fsfreeze",
        }
    }
}

/// Freeze primitive backed by an external freeze tool
#[derive(Debug, Clone)]
pub struct CommandFreezer {
    program: String,
}

impl CommandFreezer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl From<FreezeTool> for CommandFreezer {
    fn from(tool: FreezeTool) -> Self {
        Self::new(tool.program())
    }
}

#[async_trait]
impl FreezePrimitive for CommandFreezer {
    async fn freeze(&self, mount_point: &str) -> Result<CommandOutput, FreezeCommandError> {
        execute_command(&self.program, &["-f", mount_point]).await
    }

    async fn thaw(&self, mount_point: &str) -> Result<CommandOutput, FreezeCommandError> {
        execute_command(&self.program, &["-u", mount_point]).await
    }
}
