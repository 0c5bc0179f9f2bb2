//! New-order attention cue
//!
//! The cue is best effort: a failure to play is logged at debug level and
//! never reaches the caller.

use std::io::Write;

use thiserror::Error;

use shared::Order;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Audio cue unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Side-effecting attention cue
pub trait AlertCue: Send + Sync {
    fn play(&self) -> Result<(), AlertError>;
}

/// Rings the terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertCue for TerminalBell {
    fn play(&self) -> Result<(), AlertError> {
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// No-op cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl AlertCue for SilentCue {
    fn play(&self) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Log and cue a non-empty set of new orders
pub fn announce(cue: &dyn AlertCue, new_orders: &[Order]) {
    let Some(latest) = new_orders.first() else {
        return;
    };

    tracing::info!(
        count = new_orders.len(),
        order = %latest.id,
        table = %latest.table_number,
        "New order received"
    );

    if let Err(e) = cue.play() {
        tracing::debug!(error = %e, "Alert cue failed");
    }
}

/// Toast headline and detail line, `None` when there is nothing to show
pub fn banner_lines(new_orders: &[Order]) -> Option<(String, String)> {
    let latest = new_orders.first()?;
    Some((
        format!("{} new order(s) waiting for preparation.", new_orders.len()),
        format!("Latest: {} (Table {})", latest.items, latest.table_number),
    ))
}
