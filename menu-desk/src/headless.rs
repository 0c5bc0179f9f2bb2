//! Non-interactive modes: `watch` and `ask`

use std::sync::Arc;

use menu_client::MenuAssistant;

use crate::core::{AppError, BackgroundTasks, Controller, POLLING_INTERVAL, RefreshMode, spawn_poller};

/// Poll until Ctrl-C; new orders are logged and cued by the controller
pub async fn watch(controller: Arc<Controller>) -> Result<(), AppError> {
    if controller.is_demo_mode().await {
        tracing::warn!("No read key configured, watching demonstration data only");
    }

    let mut tasks = BackgroundTasks::new();
    spawn_poller(&mut tasks, controller, POLLING_INTERVAL);
    tracing::info!(interval_ms = POLLING_INTERVAL.as_millis() as u64, "Watching for new orders, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    Ok(())
}

/// Load the menu once and answer `question` on stdout
pub async fn ask(controller: &Controller, assistant: &MenuAssistant, question: &str) -> Result<String, AppError> {
    // A failed read leaves the menu empty; the assistant still answers
    if let Err(e) = controller.refresh(RefreshMode::Foreground).await {
        tracing::warn!(error = %e, "Menu unavailable, asking without context");
    }

    let menu = controller.snapshot().await.menu;
    tracing::debug!(items = menu.len(), "Asking menu assistant");
    Ok(assistant.ask(&menu, question, &[]).await)
}
