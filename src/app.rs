//! Screen navigation for the terminal front-end
//!
//! Mirrors the three screens of the client: persona selection, persona
//! detail and chat. Holds no business logic; the chat screen is backed by a
//! session runtime owned by the caller.

pub mod render;

use crate::persona::{CatalogLoad, Persona};
use thiserror::Error;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Selection,
    /// Index into the catalog
    Detail(usize),
    Chat(usize),
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based persona number on the selection screen
    Select(usize),
    StartChat,
    Back,
    /// Open the birth-details form
    Details,
    Help,
    Quit,
    /// Free text typed into the chat
    Say(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("No persona numbered {0}")]
    UnknownPersona(usize),
    #[error("Not available on this screen")]
    WrongView,
}

/// Parse one line of input for the given screen
pub fn parse_command(view: View, line: &str) -> Option<Command> {
    let input = line.trim();
    if input.is_empty() {
        return None;
    }

    if let View::Chat(_) = view {
        return Some(match input {
            "/back" => Command::Back,
            "/details" => Command::Details,
            "/help" => Command::Help,
            "/quit" => Command::Quit,
            // Send what was typed, not the trimmed copy
            _ => Command::Say(line.trim_end_matches(['\r', '\n']).to_string()),
        });
    }

    match input.to_ascii_lowercase().as_str() {
        "q" | "quit" => Some(Command::Quit),
        "b" | "back" => Some(Command::Back),
        "c" | "chat" => Some(Command::StartChat),
        "h" | "help" | "?" => Some(Command::Help),
        other => other.parse().ok().map(Command::Select),
    }
}

/// Navigation state over a loaded catalog
pub struct App {
    catalog: CatalogLoad,
    view: View,
}

impl App {
    pub fn new(catalog: CatalogLoad) -> Self {
        Self {
            catalog,
            view: View::Selection,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn personas(&self) -> &[Persona] {
        &self.catalog.personas
    }

    /// Banner shown above the persona list
    pub fn notice(&self) -> Option<&'static str> {
        self.catalog.notice()
    }

    /// Persona behind the detail or chat screen
    pub fn selected(&self) -> Option<&Persona> {
        match self.view {
            View::Selection => None,
            View::Detail(i) | View::Chat(i) => self.catalog.personas.get(i),
        }
    }

    /// Selection → Detail
    pub fn select(&mut self, number: usize) -> Result<&Persona, NavigationError> {
        if self.view != View::Selection {
            return Err(NavigationError::WrongView);
        }
        let index = number
            .checked_sub(1)
            .filter(|i| *i < self.catalog.personas.len())
            .ok_or(NavigationError::UnknownPersona(number))?;
        self.view = View::Detail(index);
        Ok(&self.catalog.personas[index])
    }

    /// Swap in a refreshed copy of the selected persona (e.g. with reviews)
    pub fn update_selected(&mut self, persona: Persona) {
        if let View::Detail(i) | View::Chat(i) = self.view {
            if let Some(slot) = self.catalog.personas.get_mut(i) {
                *slot = persona;
            }
        }
    }

    /// Detail → Chat
    pub fn start_chat(&mut self) -> Result<&Persona, NavigationError> {
        let View::Detail(index) = self.view else {
            return Err(NavigationError::WrongView);
        };
        self.view = View::Chat(index);
        Ok(&self.catalog.personas[index])
    }

    /// Chat → Detail → Selection
    pub fn back(&mut self) -> View {
        self.view = match self.view {
            View::Chat(i) => View::Detail(i),
            View::Detail(_) | View::Selection => View::Selection,
        };
        self.view
    }
}
