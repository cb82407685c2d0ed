// src/screens/table.rs
use super::{cursor_down, cursor_up, Screen, ScreenContext, ScreenKind, Transition};
use crate::db::PAGE_SIZE;
use crate::event::{is_down, is_interrupt, is_up, AppEvent, LookupOutcome};
use crate::lookup::Lookups;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    History,
    Bests,
}

impl TableKind {
    const fn title(self) -> &'static str {
        match self {
            TableKind::History => "Exercise History",
            TableKind::Bests => "Personal Bests",
        }
    }
}

/// One displayed row, history entries and bests share the same columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub exercise: String,
    pub weight: u32,
    pub reps: u32,
    pub date: String,
}

/// Read-only table over history or personal bests.
pub struct TableScreen {
    kind: TableKind,
    rows: Vec<TableRow>,
    selected: usize,
    focused: bool,
    output: Vec<String>,
    pending: Vec<String>, // Exercises with a lookup in flight
    lookups: Lookups,
    highlight: Color,
}

impl TableScreen {
    /// Fetches the rows once, they are not refreshed while the screen is open.
    pub fn new(kind: TableKind, ctx: &ScreenContext) -> Result<Self> {
        let rows = match kind {
            TableKind::History => ctx
                .store
                .query_history(PAGE_SIZE)
                .context("Failed to load exercise history")?
                .into_iter()
                .map(|e| TableRow {
                    exercise: e.exercise,
                    weight: e.weight,
                    reps: e.reps,
                    date: e.date.format("%Y-%m-%d").to_string(),
                })
                .collect(),
            TableKind::Bests => ctx
                .store
                .query_bests(PAGE_SIZE)
                .context("Failed to load personal bests")?
                .into_iter()
                .map(|b| TableRow {
                    exercise: b.exercise,
                    weight: b.weight,
                    reps: b.reps,
                    date: b.date.format("%Y-%m-%d").to_string(),
                })
                .collect(),
        };
        Ok(Self {
            kind,
            rows,
            selected: 0,
            focused: true,
            output: Vec::new(),
            pending: Vec::new(),
            lookups: ctx.lookups.clone(),
            highlight: ctx.theme.highlight(),
        })
    }

    pub const fn table_kind(&self) -> TableKind {
        self.kind
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Lookup results received so far, oldest first.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Transition {
        if is_interrupt(key) {
            return Transition::Quit;
        }
        match key.code {
            KeyCode::Char('q') => return Transition::PopToParent,
            KeyCode::Esc => self.focused = !self.focused,
            KeyCode::Enter => self.request_lookup(),
            _ if self.focused && is_up(key) => cursor_up(&mut self.selected),
            _ if self.focused && is_down(key) => cursor_down(&mut self.selected, self.rows.len()),
            _ => {}
        }
        Transition::None
    }

    fn request_lookup(&mut self) {
        let Some(row) = self.rows.get(self.selected) else {
            return;
        };
        debug!(exercise = %row.exercise, "requesting reference lookup");
        self.pending.push(row.exercise.clone());
        self.lookups.request(&row.exercise);
    }

    fn receive_lookup(&mut self, outcome: &LookupOutcome) {
        if let Some(pos) = self.pending.iter().position(|e| *e == outcome.exercise) {
            self.pending.remove(pos);
        }
        self.output
            .push(format!("{}: {}", outcome.exercise, outcome.text));
    }

    // Older lines scroll off the top so the newest result stays visible.
    fn render_output(&self, f: &mut Frame, area: Rect) {
        let width = usize::from(area.width.max(1));
        let height = usize::from(area.height.saturating_sub(1)); // Top border

        let summary = format!(
            "There are {} entries total. Select an exercise to learn more about it.",
            self.rows.len()
        );
        let mut lines: Vec<Line> = wrap_text(&summary, width)
            .into_iter()
            .map(Line::from)
            .collect();

        let pending_style = Style::default().fg(Color::DarkGray);
        let mut feed: Vec<Line> = self
            .output
            .iter()
            .flat_map(|o| wrap_text(o, width))
            .map(Line::from)
            .collect();
        feed.extend(
            self.pending
                .iter()
                .flat_map(|e| wrap_text(&format!("Looking up {e}..."), width))
                .map(|l| Line::styled(l, pending_style)),
        );

        let room = height.saturating_sub(lines.len());
        let hidden = feed.len().saturating_sub(room);
        lines.extend(feed.into_iter().skip(hidden));

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
            area,
        );
    }

    fn header_cells(&self) -> [&'static str; 5] {
        match self.kind {
            TableKind::History => ["#", "Exercise", "Weight", "Rep", "Date"],
            TableKind::Bests => ["#", "Exercise", "Best (kg)", "Rep", "Date"],
        }
    }
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        while word.len() > width - current_len {
            let rest = word.split_off(width - current_len);
            current.extend(word);
            lines.push(std::mem::take(&mut current));
            current_len = 0;
            word = rest;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

impl Screen for TableScreen {
    fn kind(&self) -> ScreenKind {
        match self.kind {
            TableKind::History => ScreenKind::HistoryTable,
            TableKind::Bests => ScreenKind::BestsTable,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.kind.title())
            .border_style(if self.focused {
                Style::default().fg(self.highlight)
            } else {
                Style::default().fg(Color::DarkGray)
            });

        if self.rows.is_empty() {
            f.render_widget(Paragraph::new("No previous results found.").block(block), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(8)])
            .split(area);

        let header = Row::new(
            self.header_cells()
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().fg(Color::LightBlue))),
        )
        .height(1)
        .bottom_margin(1);

        let rows = self.rows.iter().enumerate().map(|(i, row)| {
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(row.exercise.clone()),
                Cell::from(row.weight.to_string()),
                Cell::from(row.reps.to_string()),
                Cell::from(row.date.clone()),
            ])
        });

        let widths = [
            Constraint::Length(4),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(12),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(self.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        let mut state = TableState::default();
        state.select(Some(self.selected));
        f.render_stateful_widget(table, chunks[0], &mut state);

        self.render_output(f, chunks[1]);
    }

    fn handle_input(&mut self, event: &AppEvent) -> Result<Transition> {
        let transition = match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Lookup(outcome) => {
                self.receive_lookup(outcome);
                Transition::None
            }
            AppEvent::StoreFailure(_) => Transition::None,
        };
        Ok(transition)
    }

    fn key_hints(&self) -> &'static str {
        "[↑↓/jk] Scroll | [Esc] Focus | [Enter] Look up | [Q] Menu | [Ctrl+C] Quit "
    }
}
