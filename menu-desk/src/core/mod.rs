//! Application core: snapshot ownership, refresh cycle, edit flow

pub mod alert;
pub mod controller;
pub mod error;
pub mod state;
pub mod tasks;

pub use alert::{AlertCue, AlertError, SilentCue, TerminalBell};
pub use controller::Controller;
pub use error::{AppError, ConnectionError, EditError};
pub use state::{RefreshMode, Snapshot};
pub use tasks::{BackgroundTasks, POLLING_INTERVAL, TaskKind, spawn_poller};
