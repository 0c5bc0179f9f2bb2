//! Tracing setup
//!
//! Both modes write a daily-rolling file under the log directory. The TUI
//! routes console output into the in-app log pane (tui-logger); headless
//! modes print to stdout.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::core::AppError;

const LOG_FILE_NAME: &str = "menu-desk.log";

/// Where console output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// In-app log pane
    Tui,
    Stdout,
}

impl LogTarget {
    /// The alternate screen hides stderr while the TUI runs
    fn echoes_panics(self) -> bool {
        matches!(self, LogTarget::Stdout)
    }
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn env_filter() -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if cfg!(debug_assertions) {
        EnvFilter::new("info,menu_desk=debug,menu_client=debug")
    } else {
        EnvFilter::new("warn,menu_desk=info,menu_client=info")
    }
}

/// Install the global subscriber and panic hook.
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits.
pub fn init(log_dir: &Path, target: LogTarget) -> Result<WorkerGuard, AppError> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_file);

    match target {
        LogTarget::Tui => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(file_layer)
                .with(tui_logger::tracing_subscriber_layer())
                .try_init()
                .map_err(|e| AppError::Logging(e.to_string()))?;

            // Dependencies that still log through the `log` facade
            tui_logger::init_logger(log::LevelFilter::Info).ok();
            tui_logger::set_default_level(log::LevelFilter::Info);
        }
        LogTarget::Stdout => {
            let stdout_layer = fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(true)
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stdout);

            tracing_subscriber::registry()
                .with(env_filter())
                .with(file_layer)
                .with(stdout_layer)
                .try_init()
                .map_err(|e| AppError::Logging(e.to_string()))?;
        }
    }

    let echo = target.echoes_panics();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let msg = info.to_string();
        if echo {
            eprintln!("!!! APPLICATION PANIC !!!\nMessage: {}\nBacktrace:\n{}", msg, backtrace);
        }
        tracing::error!(target: "panic", message = %msg, backtrace = %backtrace, "panic occurred");
    }));

    tracing::info!(path = %log_dir.display(), ?target, "Tracing initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panics_reach_stderr_only_outside_tui() {
        assert!(LogTarget::Stdout.echoes_panics());
        assert!(!LogTarget::Tui.echoes_panics());
    }
}
