// src/screens/text_input.rs
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line input that only accepts keys while focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    focused: bool,
    char_limit: usize,
    placeholder: &'static str,
}

impl TextInput {
    pub fn new(char_limit: usize, placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            focused: false,
            char_limit,
            placeholder,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn reset(&mut self) {
        self.value.clear();
    }

    /// Applies an editing key. Ignored while blurred.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if !self.focused {
            return;
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.value.chars().count() < self.char_limit {
                    self.value.push(c);
                }
            }
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => {}
        }
    }
}
