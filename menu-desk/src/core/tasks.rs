//! Background task management
//!
//! - [`TaskKind::Periodic`] - timer-driven loops (the refresh poller)
//! - [`TaskKind::Worker`] - long-lived consumers (the UI intent dispatcher)
//!
//! Every task observes the shared [`CancellationToken`]; [`BackgroundTasks::shutdown`]
//! cancels it and waits for all tasks to return.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::controller::Controller;
use super::state::RefreshMode;

/// Period between background refreshes
pub const POLLING_INTERVAL: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Periodic,
    Worker,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Periodic => write!(f, "Periodic"),
            TaskKind::Worker => write!(f, "Worker"),
        }
    }
}

struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Owner of all long-running tasks
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token tasks watch for the shutdown signal
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Spawn a task; panics are caught and logged
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        let wrapped_future = async move {
            let result: Result<(), Box<dyn std::any::Any + Send>> =
                AssertUnwindSafe(future).catch_unwind().await;
            match result {
                Ok(()) if token.is_cancelled() => {
                    tracing::debug!(task = %name, kind = %kind, "Background task stopped");
                }
                Ok(()) => {
                    tracing::warn!(task = %name, kind = %kind, "Background task completed unexpectedly");
                }
                Err(panic_info) => {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(task = %name, kind = %kind, panic = %panic_msg, "Background task panicked");
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    /// Number of tasks that already returned, logged at error level
    pub fn check_health(&self) -> usize {
        let finished: Vec<_> = self
            .tasks
            .iter()
            .filter(|task| task.handle.is_finished())
            .collect();
        for task in &finished {
            tracing::error!(task = %task.name, kind = %task.kind, "Background task finished before shutdown");
        }
        finished.len()
    }

    /// Cancel every task and wait for it to return
    pub async fn shutdown(self) {
        self.check_health();
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::debug!(task = %task.name, "Task completed"),
                Err(e) if e.is_cancelled() => tracing::debug!(task = %task.name, "Task cancelled"),
                Err(e) => tracing::error!(task = %task.name, error = ?e, "Task join failed"),
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the refresh poller.
///
/// Runs one foreground refresh right away, then a background refresh every
/// `period` until shutdown. Failures are already recorded on the snapshot by
/// the controller; the loop only keeps going.
pub fn spawn_poller(tasks: &mut BackgroundTasks, controller: Arc<Controller>, period: Duration) {
    let token = tasks.shutdown_token();

    tasks.spawn("refresh_poller", TaskKind::Periodic, async move {
        let initial = tokio::select! {
            _ = token.cancelled() => return,
            result = controller.refresh(RefreshMode::Foreground) => result,
        };
        if let Err(e) = initial {
            tracing::warn!(error = %e, "Initial refresh failed");
        }

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Refresh poller cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = controller.refresh(RefreshMode::Background).await {
                        tracing::debug!(error = %e, "Background refresh failed");
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alert::SilentCue;
    use async_trait::async_trait;
    use menu_client::{RawTable, ReadError, TableSource, WriteError};
    use shared::SheetConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        reads: AtomicUsize,
    }

    #[async_trait]
    impl TableSource for CountingSource {
        async fn read_table(&self, _config: &SheetConfig, _table: &str) -> Result<RawTable, ReadError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn write_row(&self, _config: &SheetConfig, _range: &str, _values: &[String]) -> Result<(), WriteError> {
            Ok(())
        }
    }

    fn poller_controller(source: Arc<CountingSource>) -> Arc<Controller> {
        Arc::new(Controller::new(
            source,
            Arc::new(SilentCue),
            SheetConfig::new("sheet-1").with_api_key("key"),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_refreshes_each_period_until_shutdown() {
        let source = Arc::new(CountingSource::default());
        let mut tasks = BackgroundTasks::new();
        spawn_poller(&mut tasks, poller_controller(source.clone()), POLLING_INTERVAL);

        // Initial foreground refresh reads both tables
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 2);

        tokio::time::sleep(POLLING_INTERVAL * 3).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 8);
        assert_eq!(tasks.check_health(), 0);

        tasks.shutdown().await;
        let after_shutdown = source.reads.load(Ordering::SeqCst);
        tokio::time::sleep(POLLING_INTERVAL * 5).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), after_shutdown);
    }

    #[tokio::test]
    async fn test_panicking_task_is_contained() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("exploding", TaskKind::Worker, async {
            panic!("boom");
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(tasks.check_health(), 1);
        tasks.shutdown().await;
    }
}
