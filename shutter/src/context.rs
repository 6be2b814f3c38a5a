use chrono::{DateTime, Utc};
use tracing::Span;
use uuid::Uuid;

/// Per-run state handed to every component of a backup run.
///
/// Replaces process-wide logger configuration: workers instrument their
/// futures with [`RunContext::span`] so every log line carries the run id.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Region the snapshots are requested in, when known
    pub region: Option<String>,
    /// Log captured freeze/thaw command output
    pub log_command_output: bool,
    span: Span,
}

impl RunContext {
    pub fn new(log_command_output: bool) -> Self {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", run_id = %run_id);

        Self {
            run_id,
            started_at: Utc::now(),
            region: None,
            log_command_output,
            span,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(false)
    }
}
