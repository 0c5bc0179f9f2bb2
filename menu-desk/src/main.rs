use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use menu_client::MenuAssistant;
use menu_desk::cli::{Cli, Command};
use menu_desk::core::{AlertCue, Controller, SilentCue, TerminalBell};
use menu_desk::logging::{self, LogTarget};
use menu_desk::{headless, ui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command();

    let target = match command {
        Command::Tui => LogTarget::Tui,
        Command::Watch | Command::Ask { .. } => LogTarget::Stdout,
    };
    let _guard = logging::init(&cli.log_dir, target).context("Failed to initialize logging")?;

    let client_config = cli.client_config();
    let sheets = client_config
        .build_sheets_client()
        .context("Failed to build spreadsheet client")?;
    let backend = client_config
        .build_gemini_backend()
        .context("Failed to build assistant backend")?;
    tracing::debug!(model = backend.model(), "Assistant backend ready");
    let assistant = MenuAssistant::new(Arc::new(backend));

    // `ask` never announces orders
    let alert: Arc<dyn AlertCue> = match command {
        Command::Ask { .. } => Arc::new(SilentCue),
        _ => Arc::new(TerminalBell),
    };

    let sheet_config = cli.sheet_config();
    tracing::info!(
        spreadsheet = %sheet_config.spreadsheet_id,
        demo = !sheet_config.has_read_key(),
        verify_rows = cli.verify_row_identity,
        "MenuDesk starting..."
    );

    let controller = Arc::new(
        Controller::new(Arc::new(sheets), alert, sheet_config).with_row_verification(cli.verify_row_identity),
    );

    match command {
        Command::Tui => ui::run(controller, assistant).await?,
        Command::Watch => headless::watch(controller).await?,
        Command::Ask { question } => {
            let answer = headless::ask(&controller, &assistant, &question.join(" ")).await?;
            println!("{answer}");
        }
    }

    Ok(())
}
