//! # StatusBar Component
//!
//! Single line above the console showing the prompt label, how much history
//! is held, and whether Up/Down recall is on.
//!
//! ## Stateless Component
//!
//! StatusBar is purely presentational: it receives all data as props and has
//! no internal state.
//!
//! ```rust,ignore
//! let mut status_bar = StatusBar::from_console(&console);
//! status_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Message**: `"conch | prompt: sh> | history 3/10 | recall on | Cleared"`
//! 2. **Default**: `"conch | prompt: sh> | history 3/10 | recall on"`

use crate::core::{Console, TextBuffer};
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

/// Top status line for the console host.
///
/// # Props
///
/// - `prompt_label`: prompt text plus suffix, as shown in the buffer
/// - `history_len` / `history_limit`: how full the history is
/// - `recall_enabled`: whether Up/Down cycle history
/// - `message`: transient note from the host (empty for none)
pub struct StatusBar {
    pub prompt_label: String,
    pub history_len: usize,
    pub history_limit: usize,
    pub recall_enabled: bool,
    pub message: String,
}

impl StatusBar {
    /// Read the props straight off a console.
    pub fn from_console<B: TextBuffer>(console: &Console<B>) -> Self {
        Self {
            prompt_label: format!("{}{}", console.prompt(), console.prompt_suffix()),
            history_len: console.history().len(),
            history_limit: console.history().limit(),
            recall_enabled: console.history_cycling(),
            message: String::new(),
        }
    }

    fn text(&self) -> String {
        let recall = if self.recall_enabled { "on" } else { "off" };
        let base = format!(
            "conch | prompt: {} | history {}/{} | recall {}",
            self.prompt_label, self.history_len, self.history_limit, recall
        );
        if self.message.is_empty() {
            base
        } else {
            format!("{} | {}", base, self.message)
        }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default().add_modifier(Modifier::REVERSED);
        frame.render_widget(Span::styled(self.text(), style), area);
    }
}
