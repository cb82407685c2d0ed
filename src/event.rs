// src/event.rs
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything the main loop feeds into the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    /// A background reference lookup finished.
    Lookup(LookupOutcome),
    /// A fire-and-forget store write failed on the worker.
    StoreFailure(String),
}

impl From<KeyEvent> for AppEvent {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    pub exercise: String,
    /// The summary, or the error text when the lookup failed.
    pub text: String,
}

/// Ctrl+C, which always quits the whole program.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub fn is_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k'))
}

pub fn is_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Tab | KeyCode::Char('j'))
}
