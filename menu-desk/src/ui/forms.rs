//! Edit and settings forms

use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use shared::{MenuItem, MenuItemUpdate, SheetConfig};

/// What a key press did to a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

fn text_field(value: impl Into<String>) -> Input {
    Input::new(value.into())
}

/// Shared focus and input handling for text fields
fn handle_text_key(fields: &mut [Input], focus: &mut usize, slots: usize, key: KeyEvent) -> FormAction {
    match key.code {
        KeyCode::Esc => FormAction::Cancel,
        KeyCode::Enter => FormAction::Submit,
        KeyCode::Tab | KeyCode::Down => {
            *focus = (*focus + 1) % slots;
            FormAction::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            *focus = (*focus + slots - 1) % slots;
            FormAction::None
        }
        _ => {
            if let Some(field) = fields.get_mut(*focus) {
                field.handle_event(&Event::Key(key));
            }
            FormAction::None
        }
    }
}

// ============ Edit form ============

pub const EDIT_LABELS: [&str; 4] = ["Name", "Description", "Price", "Category"];

/// Index of the availability toggle in the focus order
pub const AVAILABILITY_SLOT: usize = EDIT_LABELS.len();

/// Inline editor for one menu item
#[derive(Debug, Clone)]
pub struct EditForm {
    pub original: MenuItem,
    /// Position when the form was opened; re-resolved by id on save
    pub position: usize,
    pub fields: [Input; 4],
    pub available: bool,
    pub focus: usize,
    pub error: Option<String>,
    pub saving: bool,
}

impl EditForm {
    pub fn open(original: MenuItem, position: usize) -> Self {
        let fields = [
            text_field(original.name.clone()),
            text_field(original.description.clone()),
            text_field(original.price.clone()),
            text_field(original.category.clone()),
        ];
        Self {
            available: original.available,
            original,
            position,
            fields,
            focus: 0,
            error: None,
            saving: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.saving {
            return FormAction::None;
        }
        if self.focus == AVAILABILITY_SLOT && key.code == KeyCode::Char(' ') {
            self.available = !self.available;
            return FormAction::None;
        }
        handle_text_key(&mut self.fields, &mut self.focus, AVAILABILITY_SLOT + 1, key)
    }

    /// Field values as an update; blank fields fall back to the original
    pub fn delta(&self) -> MenuItemUpdate {
        let value = |i: usize| Some(self.fields[i].value().trim().to_string());
        MenuItemUpdate {
            name: value(0),
            description: value(1),
            price: value(2),
            category: value(3),
            available: Some(self.available),
            ..Default::default()
        }
    }
}

// ============ Settings form ============

pub const SETTINGS_LABELS: [&str; 3] = ["Spreadsheet ID", "API Key (read)", "Access Token (write)"];

/// Slots rendered masked
pub fn is_secret_slot(slot: usize) -> bool {
    slot > 0
}

/// Connection settings modal
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub fields: [Input; 3],
    pub focus: usize,
}

impl SettingsForm {
    pub fn open(config: &SheetConfig) -> Self {
        Self {
            fields: [
                text_field(config.spreadsheet_id.clone()),
                text_field(config.api_key.clone().unwrap_or_default()),
                text_field(config.access_token.clone().unwrap_or_default()),
            ],
            focus: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let slots = self.fields.len();
        handle_text_key(&mut self.fields, &mut self.focus, slots, key)
    }

    pub fn config(&self) -> SheetConfig {
        let mut config = SheetConfig::new(self.fields[0].value().trim());
        let key = self.fields[1].value().trim();
        if !key.is_empty() {
            config = config.with_api_key(key);
        }
        let token = self.fields[2].value().trim();
        if !token.is_empty() {
            config = config.with_access_token(token);
        }
        config
    }

    /// Text to draw for `slot`, masked for credentials
    pub fn display_value(&self, slot: usize) -> String {
        let value = self.fields[slot].value();
        if is_secret_slot(slot) {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        }
    }
}
