//! MenuDesk - restaurant menu and live order dashboard
//!
//! - [`core`]: the controller owning the snapshot, the poller, alerts
//! - [`ui`]: terminal presentation, emits intents back to the controller
//! - [`headless`]: `watch` and `ask` commands without the terminal UI

// Re-export the adapters for embedding
pub use menu_client;
pub use shared;

pub mod cli;
pub mod core;
pub mod headless;
pub mod logging;
pub mod ui;

pub use crate::core::{Controller, RefreshMode, Snapshot};
