//! Interactive terminal dashboard
//!
//! The event loop draws from a cloned [`Snapshot`](crate::core::Snapshot)
//! and turns key presses into [`Intent`]s. Intents run on a dispatcher task
//! so the loop never waits on the network.

pub mod app;
pub mod forms;
pub mod render;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tui_logger::{TuiWidgetEvent, TuiWidgetState};

use menu_client::MenuAssistant;

pub use app::{App, Intent, Mode, Outcome, Tab};

use crate::core::{AppError, BackgroundTasks, Controller, POLLING_INTERVAL, RefreshMode, TaskKind, spawn_poller};

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Raw mode and alternate screen for the lifetime of the guard
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard until the user quits
pub async fn run(controller: Arc<Controller>, assistant: MenuAssistant) -> Result<(), AppError> {
    let mut tasks = BackgroundTasks::new();
    spawn_poller(&mut tasks, controller.clone(), POLLING_INTERVAL);

    let (intent_tx, intent_rx) = mpsc::channel::<Intent>(32);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(32);
    let token = tasks.shutdown_token();
    tasks.spawn(
        "intent_dispatcher",
        TaskKind::Worker,
        dispatch_intents(controller.clone(), assistant, intent_rx, outcome_tx, token),
    );

    let mut app = App::new(controller.config().await);
    let logger_state = TuiWidgetState::new();
    tracing::info!("Dashboard ready, press q to quit");

    let result = {
        let mut guard = TerminalGuard::enter()?;
        run_loop(&mut guard.terminal, &mut app, &logger_state, &controller, &intent_tx, &mut outcome_rx).await
    };

    tasks.shutdown().await;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    logger_state: &TuiWidgetState,
    controller: &Controller,
    intent_tx: &mpsc::Sender<Intent>,
    outcome_rx: &mut mpsc::Receiver<Outcome>,
) -> Result<(), AppError> {
    loop {
        app.sync(controller.snapshot().await, controller.config().await);
        app.tick = app.tick.wrapping_add(1);
        terminal.draw(|f| render::draw(f, app, logger_state))?;

        // crossterm polling blocks; keep it off the async workers
        let next = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
            if event::poll(FRAME_INTERVAL)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })?;

        let pressed = match next {
            Some(Event::Key(key)) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => Some(key),
            _ => None,
        };

        if let Some(key) = pressed {
            if app.is_normal() {
                match key.code {
                    KeyCode::PageUp => logger_state.transition(TuiWidgetEvent::PrevPageKey),
                    KeyCode::PageDown => logger_state.transition(TuiWidgetEvent::NextPageKey),
                    _ => {}
                }
            }

            match app.handle_key(key) {
                Some(Intent::Quit) => return Ok(()),
                Some(intent) => {
                    app.notice = None;
                    if intent_tx.send(intent).await.is_err() {
                        tracing::error!("Intent dispatcher stopped");
                        return Ok(());
                    }
                }
                None => {}
            }
        }

        while let Ok(outcome) = outcome_rx.try_recv() {
            app.apply_outcome(outcome);
        }
    }
}

/// Execute intents concurrently and report their results
async fn dispatch_intents(
    controller: Arc<Controller>,
    assistant: MenuAssistant,
    mut intents: mpsc::Receiver<Intent>,
    outcomes: mpsc::Sender<Outcome>,
    token: CancellationToken,
) {
    loop {
        let intent = tokio::select! {
            _ = token.cancelled() => break,
            intent = intents.recv() => match intent {
                Some(intent) => intent,
                None => break,
            },
        };

        let controller = controller.clone();
        let assistant = assistant.clone();
        let outcomes = outcomes.clone();
        tokio::spawn(async move {
            let Some(outcome) = execute_intent(&controller, &assistant, intent).await else {
                return;
            };
            if outcomes.send(outcome).await.is_err() {
                tracing::debug!("Dashboard closed before intent finished");
            }
        });
    }
}

async fn execute_intent(controller: &Controller, assistant: &MenuAssistant, intent: Intent) -> Option<Outcome> {
    match intent {
        Intent::Refresh => {
            // Failure is already on the snapshot banner
            let _ = controller.refresh(RefreshMode::Foreground).await;
            None
        }
        Intent::SaveItem { original, position, delta } => {
            let result = controller
                .save_item(&original, position, &delta)
                .await
                .map_err(|e| e.to_string());
            Some(Outcome::SaveFinished(result))
        }
        Intent::ApplyConfig(config) => {
            let _ = controller.apply_config(config).await;
            None
        }
        Intent::Ask { question, history, menu } => {
            Some(Outcome::ChatReply(assistant.ask(&menu, &question, &history).await))
        }
        Intent::DismissAlert => {
            controller.dismiss_alert().await;
            None
        }
        Intent::Quit => None,
    }
}
