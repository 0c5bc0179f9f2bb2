//! Controller - single owner of the dashboard snapshot
//!
//! Every mutation goes through a method here: refresh, save an edit,
//! dismiss the new-order alert, apply settings. The presentation layer only
//! reads clones of the snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use menu_client::mapping::menu_sheet_row;
use menu_client::{SheetsService, TableSource};
use shared::demo::{demo_menu, demo_orders};
use shared::{MenuItem, MenuItemUpdate, SheetConfig};

use super::alert::{AlertCue, announce};
use super::error::{CONNECTION_FAILED_MESSAGE, ConnectionError, EditError};
use super::state::{RefreshMode, Snapshot};

struct State {
    snapshot: Snapshot,
    /// Ticket of the newest refresh whose result has been applied
    applied_ticket: u64,
    /// Foreground refreshes still waiting on their reads
    foreground_reads: usize,
}

/// Dashboard controller
pub struct Controller {
    sheets: SheetsService,
    alert: Arc<dyn AlertCue>,
    config: RwLock<SheetConfig>,
    state: RwLock<State>,
    /// Tickets handed out to refreshes
    next_ticket: AtomicU64,
    /// Re-locate rows by item id before writing
    verify_row_identity: bool,
}

impl Controller {
    pub fn new(source: Arc<dyn TableSource>, alert: Arc<dyn AlertCue>, config: SheetConfig) -> Self {
        Self {
            sheets: SheetsService::new(source),
            alert,
            config: RwLock::new(config),
            state: RwLock::new(State {
                snapshot: Snapshot::default(),
                applied_ticket: 0,
                foreground_reads: 0,
            }),
            next_ticket: AtomicU64::new(0),
            verify_row_identity: false,
        }
    }

    /// Check that the target row still holds the edited item before writing
    pub fn with_row_verification(mut self, enabled: bool) -> Self {
        self.verify_row_identity = enabled;
        self
    }

    // ============ Read views ============

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn config(&self) -> SheetConfig {
        self.config.read().await.clone()
    }

    /// No read key: sample data instead of live reads
    pub async fn is_demo_mode(&self) -> bool {
        !self.config.read().await.has_read_key()
    }

    // ============ Refresh ============

    /// Read menu and orders and reconcile the snapshot.
    ///
    /// Both reads run concurrently and must both succeed; on failure the
    /// snapshot keeps its last good contents and the error banner is set.
    /// Results of a refresh that was overtaken by a newer, already applied
    /// one are dropped. Entering demo mode counts as applied, so live reads
    /// still in flight never land over the sample data.
    pub async fn refresh(&self, mode: RefreshMode) -> Result<(), ConnectionError> {
        let config = self.config().await;
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        if !config.has_read_key() {
            let mut state = self.state.write().await;
            state.applied_ticket = state.applied_ticket.max(ticket);
            if mode.is_foreground() {
                let orders = demo_orders();
                state.snapshot.last_order_count = orders.len();
                state.snapshot.menu = demo_menu();
                state.snapshot.orders = orders;
                tracing::info!("No read key configured, showing demonstration data");
            }
            return Ok(());
        }

        if mode.is_foreground() {
            let mut state = self.state.write().await;
            state.foreground_reads += 1;
            state.snapshot.loading = true;
        }

        let result = tokio::try_join!(
            self.sheets.get_menu(&config),
            self.sheets.get_orders(&config)
        );

        let mut state = self.state.write().await;
        if mode.is_foreground() {
            state.foreground_reads = state.foreground_reads.saturating_sub(1);
            state.snapshot.loading = state.foreground_reads > 0;
        }

        let stale = ticket < state.applied_ticket;

        match result {
            Ok((menu, orders)) => {
                if stale {
                    tracing::debug!(ticket, applied = state.applied_ticket, "Dropping stale refresh result");
                    return Ok(());
                }
                state.applied_ticket = ticket;
                state.snapshot.error = None;

                tracing::debug!(menu = menu.len(), orders = orders.len(), ?mode, "Snapshot refreshed");
                let arrived = state.snapshot.apply_read(menu, orders).to_vec();
                drop(state);

                announce(self.alert.as_ref(), &arrived);
                Ok(())
            }
            Err(source) => {
                tracing::error!(error = %source, ?mode, "Refresh failed");
                if !stale {
                    state.snapshot.error = Some(CONNECTION_FAILED_MESSAGE.to_string());
                }
                Err(ConnectionError::from(source))
            }
        }
    }

    // ============ Edit ============

    /// Overwrite the menu row at `position` with `original` merged with `delta`.
    ///
    /// The row is addressed by position (`position + 2` in the sheet). On
    /// success a foreground refresh re-reads the committed state; the local
    /// snapshot is never patched directly.
    pub async fn save_item(
        &self,
        original: &MenuItem,
        position: usize,
        delta: &MenuItemUpdate,
    ) -> Result<(), EditError> {
        let config = self.config().await;
        if !config.has_write_token() {
            return Err(EditError::MissingCredential);
        }

        let position = if self.verify_row_identity {
            self.locate_row(&config, original, position).await?
        } else {
            position
        };

        self.sheets
            .update_menu_item(&config, position, original, delta)
            .await
            .map_err(|e| {
                tracing::error!(item = %original.id, error = %e, "Menu item save failed");
                EditError::from(e)
            })?;

        tracing::info!(item = %original.id, row = menu_sheet_row(position), "Menu item saved");

        // A failed re-read already raised the banner
        if let Err(e) = self.refresh(RefreshMode::Foreground).await {
            tracing::warn!(error = %e, "Refresh after save failed");
        }
        Ok(())
    }

    /// Position of `original` in the remote menu, preferring `position`
    async fn locate_row(
        &self,
        config: &SheetConfig,
        original: &MenuItem,
        position: usize,
    ) -> Result<usize, EditError> {
        let remote = self
            .sheets
            .get_menu(config)
            .await
            .map_err(|e| EditError::UpstreamRejected(e.to_string()))?;

        if remote.get(position).is_some_and(|item| item.id == original.id) {
            return Ok(position);
        }

        match remote.iter().position(|item| item.id == original.id) {
            Some(found) => {
                tracing::warn!(item = %original.id, expected = position, found, "Menu row moved, re-targeting write");
                Ok(found)
            }
            None => Err(EditError::RowNotFound(original.id.clone())),
        }
    }

    // ============ Other intents ============

    /// Clear the new-order alert; the observed order count is kept
    pub async fn dismiss_alert(&self) {
        self.state.write().await.snapshot.new_orders.clear();
    }

    /// Replace the connection settings and reload
    pub async fn apply_config(&self, config: SheetConfig) -> Result<(), ConnectionError> {
        tracing::info!(spreadsheet = %config.spreadsheet_id, read_key = config.has_read_key(), write_token = config.has_write_token(), "Settings updated");
        *self.config.write().await = config;
        self.refresh(RefreshMode::Foreground).await
    }
}
