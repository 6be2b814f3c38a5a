//! Termination signal handling
//!
//! SIGINT and SIGTERM must not end the process while partitions are frozen.
//! Once the watcher is installed both are logged and counted, and the run
//! carries on to its thaw phase.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::warn;

/// Background task swallowing SIGINT/SIGTERM for the lifetime of a run
pub struct SignalWatcher {
    received: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl SignalWatcher {
    /// Install the handlers. They are active as soon as this returns.
    pub fn spawn() -> io::Result<Self> {
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let received = Arc::new(AtomicUsize::new(0));

        let task = {
            let received = received.clone();
            tokio::spawn(async move {
                loop {
                    let name = tokio::select! {
                        Some(()) = interrupt.recv() => "SIGINT",
                        Some(()) = terminate.recv() => "SIGTERM",
                        else => break,
                    };
                    received.fetch_add(1, Ordering::SeqCst);
                    warn!(
                        "{} received, finishing the run so frozen partitions get thawed",
                        name
                    );
                }
            })
        };

        Ok(Self { received, task })
    }

    /// Number of signals caught so far
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
