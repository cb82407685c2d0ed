// src/screens/main_menu.rs
use super::{cursor_down, cursor_up, Screen, ScreenKind, Transition};
use crate::event::{is_down, is_interrupt, is_up, AppEvent};
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum MenuEntry {
    #[strum(serialize = "Begin workout!")]
    BeginWorkout,
    #[strum(serialize = "Exercise History")]
    History,
    #[strum(serialize = "Personal Bests")]
    Bests,
}

impl MenuEntry {
    pub const fn target(self) -> ScreenKind {
        match self {
            MenuEntry::BeginWorkout => ScreenKind::WorkoutEntry,
            MenuEntry::History => ScreenKind::HistoryTable,
            MenuEntry::Bests => ScreenKind::BestsTable,
        }
    }
}

pub struct MainMenu {
    entries: Vec<MenuEntry>,
    cursor: usize,
    highlight: Color,
}

impl MainMenu {
    pub fn new(highlight: Color) -> Self {
        Self {
            entries: MenuEntry::iter().collect(),
            cursor: 0,
            highlight,
        }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }
}

impl Screen for MainMenu {
    fn kind(&self) -> ScreenKind {
        ScreenKind::MainMenu
    }

    fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        f.render_widget(
            Paragraph::new("What would you like to do?")
                .style(Style::default().add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| ListItem::new(entry.to_string()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Main Menu")
                    .border_style(Style::default().fg(self.highlight)),
            )
            .highlight_style(Style::default().fg(self.highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.cursor));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn handle_input(&mut self, event: &AppEvent) -> Result<Transition> {
        let AppEvent::Key(key) = event else {
            return Ok(Transition::None);
        };
        if is_interrupt(key) {
            return Ok(Transition::Quit);
        }
        let transition = match key.code {
            KeyCode::Char('q') => Transition::Quit,
            KeyCode::Enter => match self.entries.get(self.cursor) {
                Some(entry) => Transition::Push(entry.target()),
                None => Transition::None,
            },
            _ if is_up(key) => {
                cursor_up(&mut self.cursor);
                Transition::None
            }
            _ if is_down(key) => {
                cursor_down(&mut self.cursor, self.entries.len());
                Transition::None
            }
            _ => Transition::None,
        };
        Ok(transition)
    }

    fn key_hints(&self) -> &'static str {
        "[↑↓/jk/Tab] Nav | [Enter] Select | [Q]uit "
    }
}
