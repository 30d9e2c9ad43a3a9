//! # ConsoleView Component
//!
//! Hosts a `Console<StringBuffer>` inside the terminal.
//!
//! ## Responsibilities
//!
//! - Feed key presses to the console and apply default editing when allowed
//! - Route bracketed pastes through the console's confined write
//! - Keep the caret line in view (unless the user scrolled away)
//! - Render the buffer with the selection highlighted and place the cursor
//!
//! ## State Management
//!
//! The console (buffer, prompt, history) and the clipboard are internal state.
//! Scrolling is presentation state: `scroll_top` is the first visible line,
//! and `follow` snaps the view back to the caret on the next key press.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::editing::apply_default;
use crate::core::{Console, Disposition, StringBuffer, TextBuffer};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 3;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;

/// High-level events emitted by the ConsoleView
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A command went through the submission pipeline
    Submitted,
    /// Input text or caret changed
    Edited,
    /// The policy (or the confined write) dropped the input
    Rejected,
}

pub struct ConsoleView {
    console: Console<StringBuffer>,
    clipboard: String,
    scroll_top: usize,
    follow: bool,
    /// Inner height from the last render (used for scrolling)
    last_viewport_height: usize,
}

impl ConsoleView {
    pub fn new(console: Console<StringBuffer>) -> Self {
        Self {
            console,
            clipboard: String::new(),
            scroll_top: 0,
            follow: true,
            last_viewport_height: 1,
        }
    }

    pub fn console(&self) -> &Console<StringBuffer> {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console<StringBuffer> {
        &mut self.console
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Adjust `scroll_top` so the interesting line is on screen.
    fn update_scroll(&mut self, viewport_height: usize) {
        let buffer = self.console.buffer();
        let line_count = buffer.line_count();
        let max_top = line_count.saturating_sub(viewport_height);

        if self.follow {
            let caret_line = buffer.to_coordinate(buffer.caret()).line;
            // The console's scroll request first, then the caret wins
            for line in [buffer.scroll_line, caret_line] {
                if line < self.scroll_top {
                    self.scroll_top = line;
                } else if line >= self.scroll_top + viewport_height {
                    self.scroll_top = line + 1 - viewport_height;
                }
            }
        }

        self.scroll_top = self.scroll_top.min(max_top);
    }

    fn visible_lines(&self, viewport_height: usize) -> Vec<Line<'static>> {
        let buffer = self.console.buffer();
        let selection = buffer.selection();
        let selected = Style::default().add_modifier(Modifier::REVERSED);

        let mut offset = 0;
        let mut lines = Vec::new();
        for (idx, text) in buffer.text().split('\n').enumerate() {
            let len = text.chars().count();
            let line_start = offset;
            offset += len + 1;

            if idx < self.scroll_top {
                continue;
            }
            if lines.len() >= viewport_height {
                break;
            }

            // Selection as a char range local to this line
            let from = selection.from().clamp(line_start, line_start + len) - line_start;
            let to = selection.to().clamp(line_start, line_start + len) - line_start;
            if selection.is_empty() || from == to {
                lines.push(Line::from(text.to_string()));
                continue;
            }

            let before: String = text.chars().take(from).collect();
            let inside: String = text.chars().skip(from).take(to - from).collect();
            let after: String = text.chars().skip(to).collect();
            lines.push(Line::from(vec![
                Span::raw(before),
                Span::styled(inside, selected),
                Span::raw(after),
            ]));
        }
        lines
    }

    /// Screen position for the caret, or None if it is scrolled out of view.
    fn cursor_position(&self, inner: Rect) -> Option<(u16, u16)> {
        let buffer = self.console.buffer();
        let caret = buffer.to_coordinate(buffer.caret());
        if caret.line < self.scroll_top {
            return None;
        }
        let row = caret.line - self.scroll_top;
        if row >= inner.height as usize {
            return None;
        }

        let line = buffer.text().split('\n').nth(caret.line).unwrap_or("");
        let before_caret: String = line.chars().take(caret.column).collect();
        let column = before_caret.width().min(inner.width.saturating_sub(1) as usize);

        Some((inner.x + column as u16, inner.y + row as u16))
    }
}

impl Component for ConsoleView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let viewport_height = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1) as usize;
        self.last_viewport_height = viewport_height;
        self.update_scroll(viewport_height);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Console");
        let inner = block.inner(area);

        let paragraph = Paragraph::new(self.visible_lines(viewport_height)).block(block);
        frame.render_widget(paragraph, area);

        if let Some(position) = self.cursor_position(inner) {
            frame.set_cursor_position(position);
        }
    }
}

impl EventHandler for ConsoleView {
    type Event = ConsoleEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Key(key) => {
                self.follow = true;
                let disposition = self.console.handle_key(key);
                if disposition.allows_default() {
                    apply_default(self.console.buffer_mut(), key, &mut self.clipboard);
                }
                Some(match disposition {
                    Disposition::Submit => ConsoleEvent::Submitted,
                    Disposition::Ignore => ConsoleEvent::Rejected,
                    _ => ConsoleEvent::Edited,
                })
            }
            TuiEvent::Paste(text) => {
                self.follow = true;
                if self.console.write_text(text) {
                    Some(ConsoleEvent::Edited)
                } else {
                    Some(ConsoleEvent::Rejected)
                }
            }
            TuiEvent::ScrollUp => {
                self.follow = false;
                self.scroll_top = self.scroll_top.saturating_sub(SCROLL_STEP);
                None
            }
            TuiEvent::ScrollDown => {
                let max_top = self
                    .console
                    .buffer()
                    .line_count()
                    .saturating_sub(self.last_viewport_height);
                self.scroll_top = (self.scroll_top + SCROLL_STEP).min(max_top);
                // Back at the bottom: stick to it again
                self.follow = self.scroll_top == max_top;
                None
            }
            TuiEvent::Quit | TuiEvent::Resize => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConsoleConfig, KeyCode, KeyEvent};
    use crate::test_support::console_with_prompt;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent::plain(code))
    }

    fn type_into(view: &mut ConsoleView, text: &str) {
        for c in text.chars() {
            view.handle_event(&key(KeyCode::Char(c)));
        }
    }

    fn screen(view: &mut ConsoleView, width: u16, height: u16) -> (String, (u16, u16)) {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                view.render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        let cursor = terminal.get_cursor_position().unwrap();
        (text, (cursor.x, cursor.y))
    }

    #[test]
    fn test_typing_goes_through_policy_and_default_editing() {
        let mut view = ConsoleView::new(console_with_prompt("sh"));
        type_into(&mut view, "ls");
        assert_eq!(view.console().text(), "sh>ls");

        let res = view.handle_event(&key(KeyCode::Enter));
        assert_eq!(res, Some(ConsoleEvent::Submitted));
        assert_eq!(view.console().text(), "sh>ls\nsh>");
    }

    #[test]
    fn test_backspace_at_prompt_is_rejected() {
        let mut view = ConsoleView::new(console_with_prompt("sh"));
        let res = view.handle_event(&key(KeyCode::Backspace));
        assert_eq!(res, Some(ConsoleEvent::Rejected));
        assert_eq!(view.console().text(), "sh>");
    }

    #[test]
    fn test_paste_is_confined_and_flattened() {
        let mut view = ConsoleView::new(console_with_prompt("sh"));
        let res = view.handle_event(&TuiEvent::Paste("a\nb".to_string()));
        assert_eq!(res, Some(ConsoleEvent::Edited));
        assert_eq!(view.console().input(), "a b");
    }

    #[test]
    fn test_copy_fills_clipboard() {
        let mut view = ConsoleView::new(console_with_prompt("sh"));
        view.handle_event(&TuiEvent::Key(KeyEvent::ctrl('a')));
        view.handle_event(&TuiEvent::Key(KeyEvent::ctrl('c')));
        assert_eq!(view.clipboard(), "sh>");
    }

    #[test]
    fn test_render_shows_prompt_and_cursor() {
        let mut view = ConsoleView::new(console_with_prompt("sh"));
        type_into(&mut view, "ab");
        let (text, cursor) = screen(&mut view, 30, 5);

        assert!(text.contains("Console"));
        assert!(text.contains("sh>ab"));
        // Border at column 0 / row 0, then "sh>ab"
        assert_eq!(cursor, (6, 1));
    }

    #[test]
    fn test_render_follows_last_line() {
        let mut view = ConsoleView::new(Console::new(StringBuffer::new(), ConsoleConfig::default()));
        for i in 0..10 {
            view.console_mut().append_text(&format!("line {i}"));
        }
        let (text, cursor) = screen(&mut view, 30, 5);

        // Three visible rows: the last two output lines and the prompt
        assert!(text.contains("line 8"));
        assert!(text.contains("line 9"));
        assert!(!text.contains("line 7"));
        assert_eq!(cursor, (2, 3));
    }

    #[test]
    fn test_scroll_up_then_down_resumes_follow() {
        let mut view = ConsoleView::new(Console::new(StringBuffer::new(), ConsoleConfig::default()));
        for i in 0..10 {
            view.console_mut().append_text(&format!("line {i}"));
        }
        screen(&mut view, 30, 5);
        let bottom = view.scroll_top;

        view.handle_event(&TuiEvent::ScrollUp);
        assert!(!view.follow);
        assert_eq!(view.scroll_top, bottom - SCROLL_STEP);

        view.handle_event(&TuiEvent::ScrollDown);
        assert!(view.follow);
        assert_eq!(view.scroll_top, bottom);
    }
}
