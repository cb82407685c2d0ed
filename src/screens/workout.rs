// src/screens/workout.rs
use super::{cursor_down, cursor_up, Screen, ScreenContext, ScreenKind, TextInput, Transition};
use crate::event::{is_down, is_interrupt, is_up, AppEvent};
use crate::parser::{format_set, parse_set};
use crate::store_worker::StoreHandle;
use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Seeded into an empty database.
pub const DEFAULT_EXERCISES: [&str; 9] = [
    "Bench Press",
    "Squats",
    "Pullups",
    "Dips",
    "Tricep Dips",
    "Bicep Curls",
    "Overhead Press",
    "Deadlifts",
    "Rows",
];

const INPUT_CHAR_LIMIT: usize = 20;
const INPUT_PLACEHOLDER: &str = "After selecting, type Weight (kg) x Reps here";

pub struct WorkoutScreen {
    store: StoreHandle,
    choices: Vec<String>,
    history: HashMap<String, Vec<String>>, // Formatted sets per exercise
    cursor: usize,
    selected: BTreeSet<usize>, // At most one index, the row being typed into
    typing: bool,
    input: TextInput,
    highlight: Color,
}

impl WorkoutScreen {
    /// Loads the exercise list, seeding the defaults into an empty store,
    /// and replays today's sets into the per-exercise history.
    pub fn new(ctx: &ScreenContext) -> Result<Self> {
        let store = ctx.store.clone();
        let mut choices = store
            .list_distinct_exercises()
            .context("Failed to load exercise list")?;

        if choices.is_empty() {
            info!("empty exercise list, seeding defaults");
            choices = DEFAULT_EXERCISES.iter().map(|s| s.to_string()).collect();
            for name in &choices {
                store
                    .insert(name, None, None, None)
                    .context("Failed to seed default exercises")?;
            }
        }

        let mut history: HashMap<String, Vec<String>> = HashMap::new();
        let today = Local::now().date_naive();
        for entry in store
            .sets_recorded_on(today)
            .context("Failed to load today's sets")?
        {
            history
                .entry(entry.exercise)
                .or_default()
                .push(format_set(entry.weight, entry.reps));
        }

        Ok(Self {
            store,
            choices,
            history,
            cursor: 0,
            selected: BTreeSet::new(),
            typing: false,
            input: TextInput::new(INPUT_CHAR_LIMIT, INPUT_PLACEHOLDER),
            highlight: ctx.theme.highlight(),
        })
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub const fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn input_value(&self) -> &str {
        self.input.value()
    }

    /// Sets recorded for `exercise` in this session, formatted for display.
    pub fn history_for(&self, exercise: &str) -> &[String] {
        self.history.get(exercise).map(Vec::as_slice).unwrap_or(&[])
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<Transition> {
        if is_interrupt(key) {
            return Ok(Transition::Quit);
        }
        match key.code {
            KeyCode::Enter => self.enter()?,
            KeyCode::Delete | KeyCode::Backspace if !self.typing => self.delete_at_cursor()?,
            KeyCode::Char('q') if !self.typing => return Ok(Transition::PopToParent),
            _ if !self.typing && is_up(key) => cursor_up(&mut self.cursor),
            _ if !self.typing && is_down(key) => cursor_down(&mut self.cursor, self.choices.len()),
            _ => self.input.handle_key(key),
        }
        Ok(Transition::None)
    }

    // Enter selects the row under the cursor, or submits the typed set when
    // the row is already selected.
    fn enter(&mut self) -> Result<()> {
        if self.cursor >= self.choices.len() {
            return Ok(());
        }
        self.input.blur();
        if self.selected.remove(&self.cursor) {
            self.submit_set()
        } else {
            self.selected.clear();
            self.selected.insert(self.cursor);
            self.input.focus();
            self.typing = true;
            Ok(())
        }
    }

    fn submit_set(&mut self) -> Result<()> {
        let parsed = parse_set(self.input.value());
        self.input.reset();
        self.typing = false;

        let Some(set) = parsed else {
            debug!("set text did not hold exactly two numbers, discarding");
            return Ok(());
        };
        let exercise = self.choices[self.cursor].clone();
        self.history
            .entry(exercise.clone())
            .or_default()
            .push(format_set(set.weight, set.reps));
        self.store
            .insert(&exercise, Some(set.weight), Some(set.reps), None)
            .with_context(|| format!("Failed to queue set for {exercise}"))?;
        Ok(())
    }

    fn delete_at_cursor(&mut self) -> Result<()> {
        if self.cursor >= self.choices.len() {
            return Ok(());
        }
        let index = self.cursor;
        let name = self.choices.remove(index);

        // Selection is index based, shift it together with the list
        self.selected = self
            .selected
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
        self.history.remove(&name);
        if self.cursor >= self.choices.len() {
            self.cursor = self.choices.len().saturating_sub(1);
        }

        info!(exercise = %name, "removing exercise and all its sets");
        self.store
            .delete_by_exercise(&name)
            .with_context(|| format!("Failed to queue delete of {name}"))?;
        Ok(())
    }
}

impl Screen for WorkoutScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::WorkoutEntry
    }

    fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Exercise list
                Constraint::Length(3), // Set input
            ])
            .split(area);

        f.render_widget(
            Paragraph::new("What exercise did you do?")
                .style(Style::default().add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        let list_block = Block::default()
            .borders(Borders::ALL)
            .title("Exercises")
            .border_style(if self.typing {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(self.highlight)
            });

        if self.choices.is_empty() {
            f.render_widget(
                Paragraph::new("No exercises left. Press Q to go back.").block(list_block),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = self
                .choices
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let checked = if self.selected.contains(&i) { "x" } else { " " };
                    let mut spans = vec![
                        Span::raw(format!("[{checked}] ")),
                        Span::styled(name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                    ];
                    let sets = self.history_for(name);
                    if !sets.is_empty() {
                        spans.push(Span::styled(
                            format!(" {}", sets.join(" ")),
                            Style::default().fg(Color::Green),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();
            let list = List::new(items)
                .block(list_block)
                .highlight_style(Style::default().fg(self.highlight))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(self.cursor));
            f.render_stateful_widget(list, chunks[1], &mut state);
        }

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title("Set")
            .border_style(if self.input.is_focused() {
                Style::default().fg(self.highlight)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let input_text = if self.input.value().is_empty() && !self.typing {
            Span::styled(self.input.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(format!("{}_", self.input.value()))
        };
        f.render_widget(
            Paragraph::new(Line::from(input_text)).block(input_block),
            chunks[2],
        );
    }

    fn handle_input(&mut self, event: &AppEvent) -> Result<Transition> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            _ => Ok(Transition::None),
        }
    }

    fn key_hints(&self) -> &'static str {
        if self.typing {
            "[Enter] Save set | [Backspace] Erase | [Ctrl+C] Quit "
        } else {
            "[↑↓/jk] Nav | [Enter] Select | [Del] Remove exercise | [Q] Menu | [Ctrl+C] Quit "
        }
    }
}
