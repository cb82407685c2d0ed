// src/screens/mod.rs
use crate::config::Theme;
use crate::event::AppEvent;
use crate::lookup::Lookups;
use crate::store_worker::StoreHandle;
use anyhow::Result;
use ratatui::{layout::Rect, Frame};

pub mod main_menu;
pub mod table;
pub mod text_input;
pub mod workout;

pub use main_menu::{MainMenu, MenuEntry};
pub use table::{TableKind, TableScreen};
pub use text_input::TextInput;
pub use workout::WorkoutScreen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenKind {
    MainMenu,
    WorkoutEntry,
    HistoryTable,
    BestsTable,
}

/// What a screen asks the navigator to do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    None,
    PopToParent,
    Quit,
    Push(ScreenKind),
}

/// Collaborators handed to every screen on construction.
#[derive(Clone)]
pub struct ScreenContext {
    pub store: StoreHandle,
    pub lookups: Lookups,
    pub theme: Theme,
}

/// One interactive view.
pub trait Screen {
    fn kind(&self) -> ScreenKind;

    /// Draws the current state. Must not change it.
    fn render(&self, f: &mut Frame, area: Rect);

    /// Consumes one event and reports the navigation it wants.
    fn handle_input(&mut self, event: &AppEvent) -> Result<Transition>;

    /// Key help for the status bar.
    fn key_hints(&self) -> &'static str;
}

/// Moves `cursor` one step back, stopping at the first row.
pub(crate) fn cursor_up(cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1);
}

/// Moves `cursor` one step forward, stopping at the last row.
pub(crate) fn cursor_down(cursor: &mut usize, len: usize) {
    if *cursor + 1 < len {
        *cursor += 1;
    }
}
