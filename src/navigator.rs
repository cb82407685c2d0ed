// src/navigator.rs
use crate::event::AppEvent;
use crate::screens::{
    MainMenu, Screen, ScreenContext, ScreenKind, TableKind, TableScreen, Transition,
    WorkoutScreen,
};
use crate::ui;
use anyhow::Result;
use ratatui::Frame;
use std::time::{Duration, Instant};
use tracing::{error, info};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Owns the active screen and switches between screens.
pub struct Navigator {
    ctx: ScreenContext,
    current: Box<dyn Screen>,
    should_quit: bool,
    last_error: Option<String>, // For status bar errors
    error_clear_time: Option<Instant>,
}

impl Navigator {
    pub fn new(ctx: ScreenContext) -> Self {
        let current = Box::new(MainMenu::new(ctx.theme.highlight()));
        Self {
            ctx,
            current,
            should_quit: false,
            last_error: None,
            error_clear_time: None,
        }
    }

    /// Routes one event to the active screen and applies its transition.
    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        if let AppEvent::StoreFailure(message) = event {
            self.set_error(message);
            return Ok(());
        }
        let transition = self.current.handle_input(&event)?;
        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> Result<()> {
        match transition {
            Transition::None => {}
            Transition::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Transition::PopToParent => {
                info!(from = ?self.current.kind(), "returning to main menu");
                // The child is dropped here, the menu starts over at the top
                self.current = Box::new(MainMenu::new(self.ctx.theme.highlight()));
            }
            Transition::Push(kind) => {
                info!(screen = ?kind, "opening screen");
                // A screen that cannot load its data leaves the current one in place
                match self.build(kind) {
                    Ok(screen) => self.current = screen,
                    Err(e) => self.set_error(format!("Could not open screen: {e:#}")),
                }
            }
        }
        Ok(())
    }

    fn build(&self, kind: ScreenKind) -> Result<Box<dyn Screen>> {
        let screen: Box<dyn Screen> = match kind {
            ScreenKind::MainMenu => Box::new(MainMenu::new(self.ctx.theme.highlight())),
            ScreenKind::WorkoutEntry => Box::new(WorkoutScreen::new(&self.ctx)?),
            ScreenKind::HistoryTable => Box::new(TableScreen::new(TableKind::History, &self.ctx)?),
            ScreenKind::BestsTable => Box::new(TableScreen::new(TableKind::Bests, &self.ctx)?),
        };
        Ok(screen)
    }

    pub fn current(&self) -> &dyn Screen {
        self.current.as_ref()
    }

    pub fn current_kind(&self) -> ScreenKind {
        self.current.kind()
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: String) {
        error!("{msg}");
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY_TIME);
    }

    /// Clears the status bar error once its display time is over.
    pub fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    pub fn render(&self, f: &mut Frame) {
        ui::render_ui(f, self);
    }
}
