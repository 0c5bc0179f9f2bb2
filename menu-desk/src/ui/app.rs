//! View state and key handling
//!
//! [`App`] never touches the network. Key presses that need the controller
//! or the assistant come out as an [`Intent`]; their results come back as an
//! [`Outcome`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use menu_client::ChatSession;
use shared::{MenuItem, MenuItemUpdate, SheetConfig};

use super::forms::{EditForm, FormAction, SettingsForm};
use crate::core::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Menu,
    Orders,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Menu => "Menu",
            Tab::Orders => "Live Orders",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Tab::Menu => Tab::Orders,
            Tab::Orders => Tab::Menu,
        }
    }
}

/// Which surface receives key presses
#[derive(Debug, Clone, Default)]
pub enum Mode {
    #[default]
    Normal,
    Editing(EditForm),
    Settings(SettingsForm),
    Chat,
}

/// Work the event loop hands to a spawned task
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Refresh,
    SaveItem {
        original: MenuItem,
        position: usize,
        delta: MenuItemUpdate,
    },
    ApplyConfig(SheetConfig),
    Ask {
        question: String,
        history: Vec<String>,
        menu: Vec<MenuItem>,
    },
    DismissAlert,
    Quit,
}

/// Result of a spawned intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `Err` carries the message shown under the edit form
    SaveFinished(Result<(), String>),
    ChatReply(String),
}

pub struct App {
    pub tab: Tab,
    pub mode: Mode,
    pub snapshot: Snapshot,
    pub demo_mode: bool,
    /// Connection settings shown when the settings modal opens
    pub config: SheetConfig,
    pub selected: usize,
    pub chat: ChatSession,
    pub chat_input: Input,
    pub chat_open: bool,
    /// Short-lived status line, e.g. after a save
    pub notice: Option<String>,
    /// Animation frame counter
    pub tick: usize,
}

impl App {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            tab: Tab::default(),
            mode: Mode::default(),
            snapshot: Snapshot::default(),
            demo_mode: !config.has_read_key(),
            config,
            selected: 0,
            chat: ChatSession::new(),
            chat_input: Input::default(),
            chat_open: false,
            notice: None,
            tick: 0,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self.mode, Mode::Normal)
    }

    /// Adopt a newer snapshot, keeping the selection in range
    pub fn sync(&mut self, snapshot: Snapshot, config: SheetConfig) {
        self.demo_mode = !config.has_read_key();
        self.config = config;
        self.snapshot = snapshot;
        if self.selected >= self.snapshot.menu.len() {
            self.selected = self.snapshot.menu.len().saturating_sub(1);
        }
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.snapshot.menu.get(self.selected)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Intent::Quit);
        }

        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Editing(form) => self.handle_edit_key(form, key),
            Mode::Settings(form) => self.handle_settings_key(form, key),
            Mode::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(Intent::Quit),
            KeyCode::Tab => self.tab = self.tab.toggled(),
            KeyCode::Char('1') => self.tab = Tab::Menu,
            KeyCode::Char('2') => self.tab = Tab::Orders,
            KeyCode::Char('r') => return Some(Intent::Refresh),
            KeyCode::Char('d') if !self.snapshot.new_orders.is_empty() => {
                return Some(Intent::DismissAlert);
            }
            KeyCode::Char('s') => self.mode = Mode::Settings(SettingsForm::open(&self.config)),
            KeyCode::Char('c') => {
                self.chat_open = true;
                self.mode = Mode::Chat;
            }
            KeyCode::Char('e') | KeyCode::Enter if self.tab == Tab::Menu => {
                if let Some(item) = self.selected_item() {
                    self.mode = Mode::Editing(EditForm::open(item.clone(), self.selected));
                }
            }
            KeyCode::Up | KeyCode::Char('k') if self.tab == Tab::Menu => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') if self.tab == Tab::Menu => {
                if self.selected + 1 < self.snapshot.menu.len() {
                    self.selected += 1;
                }
            }
            _ => {}
        }
        None
    }

    fn handle_edit_key(&mut self, mut form: EditForm, key: KeyEvent) -> Option<Intent> {
        match form.handle_key(key) {
            FormAction::Cancel => None,
            FormAction::Submit => {
                // The table may have shifted since the form opened
                let position = self
                    .snapshot
                    .menu_position(&form.original.id)
                    .unwrap_or(form.position);
                let intent = Intent::SaveItem {
                    original: form.original.clone(),
                    position,
                    delta: form.delta(),
                };
                form.error = None;
                form.saving = true;
                self.mode = Mode::Editing(form);
                Some(intent)
            }
            FormAction::None => {
                self.mode = Mode::Editing(form);
                None
            }
        }
    }

    fn handle_settings_key(&mut self, mut form: SettingsForm, key: KeyEvent) -> Option<Intent> {
        match form.handle_key(key) {
            FormAction::Cancel => None,
            FormAction::Submit => Some(Intent::ApplyConfig(form.config())),
            FormAction::None => {
                self.mode = Mode::Settings(form);
                None
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Esc => {
                self.chat_open = false;
                None
            }
            KeyCode::Enter => {
                let intent = self.chat.begin(self.chat_input.value()).map(|(question, history)| {
                    self.chat_input.reset();
                    Intent::Ask {
                        question,
                        history,
                        menu: self.snapshot.menu.clone(),
                    }
                });
                self.mode = Mode::Chat;
                intent
            }
            _ => {
                self.chat_input.handle_event(&Event::Key(key));
                self.mode = Mode::Chat;
                None
            }
        }
    }

    pub fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::SaveFinished(Ok(())) => {
                if let Mode::Editing(form) = &self.mode {
                    self.notice = Some(format!("Saved {}", form.original.name));
                }
                self.mode = Mode::Normal;
            }
            Outcome::SaveFinished(Err(message)) => {
                if let Mode::Editing(form) = &mut self.mode {
                    form.saving = false;
                    form.error = Some(message);
                } else {
                    self.notice = Some(message);
                }
            }
            Outcome::ChatReply(reply) => self.chat.finish(reply),
        }
    }
}
