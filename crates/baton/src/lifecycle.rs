//! Process-wide lifecycle supervision
//!
//! One `Supervisor` owns the cancellation token and the join handles
//! of every long-running component in the process. Components are
//! spawned with explicit names; the first failure cancels everything
//! else so the process never limps along half-configured.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Supervisor for the process's long-running tasks
pub struct Supervisor {
    cancel: CancellationToken,
    failed: Arc<AtomicBool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Supervisor {
    /// Create a new supervisor
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            failed: Arc::new(AtomicBool::new(false)),
            tasks: Vec::new(),
        }
    }

    /// Get a clone of the cancellation token
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn a supervised component
    ///
    /// A component that returns an error marks the process failed and
    /// cancels every other component. Components that finish cleanly
    /// (e.g., a publish-once producer task) just end.
    pub fn spawn<E>(
        &mut self,
        name: &'static str,
        task: impl Future<Output = Result<(), E>> + Send + 'static,
    ) where
        E: std::fmt::Display,
    {
        let cancel = self.cancel.clone();
        let failed = Arc::clone(&self.failed);

        let handle = tokio::spawn(async move {
            if let Err(e) = task.await {
                tracing::error!(task = name, error = %e, "component failed");
                failed.store(true, Ordering::Relaxed);
                cancel.cancel();
            }
        });

        self.tasks.push((name, handle));
    }

    /// Begin shutdown: cancel every component
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Join every component task
    ///
    /// Returns an error if any component failed or panicked.
    pub async fn wait(self) -> anyhow::Result<()> {
        let failed = Arc::clone(&self.failed);

        for (name, handle) in self.tasks {
            if handle.await.is_err() {
                tracing::error!(task = name, "component task panicked");
                failed.store(true, Ordering::Relaxed);
            }
        }

        if failed.load(Ordering::Relaxed) {
            anyhow::bail!("one or more components failed");
        }

        Ok(())
    }
}
