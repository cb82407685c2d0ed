// src/ui.rs
use crate::navigator::Navigator;
use crate::screens::ScreenKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

/// Title line, active screen, status bar.
pub fn render_ui(f: &mut Frame, nav: &Navigator) {
    let size = f.size();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status Bar
        ])
        .split(size);

    render_title(f, nav.current_kind(), main_chunks[0]);
    nav.current().render(f, main_chunks[1]);
    render_status_bar(f, nav, main_chunks[2]);
}

fn render_title(f: &mut Frame, kind: ScreenKind, area: Rect) {
    let name = match kind {
        ScreenKind::MainMenu => "Main Menu",
        ScreenKind::WorkoutEntry => "Workout",
        ScreenKind::HistoryTable => "History",
        ScreenKind::BestsTable => "Personal Bests",
    };
    f.render_widget(
        Paragraph::new(format!(" gym-log | {name}"))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        area,
    );
}

fn render_status_bar(f: &mut Frame, nav: &Navigator, area: Rect) {
    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let status_paragraph = Paragraph::new(nav.current().key_hints())
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(nav.last_error().unwrap_or(""))
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
