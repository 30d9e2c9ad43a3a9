//! # TUI Adapter
//!
//! The ratatui-specific host. Owns the terminal, renders the console and
//! translates crossterm events into console keys.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! console only sees a `TextBuffer` and `KeyEvent`s, so another host could
//! replace this one.
//!
//! ## Redraw Strategy
//!
//! The loop sleeps up to 500ms waiting for input and only redraws after an
//! event arrived. All pending events are drained before the next draw so a
//! large paste or key repeat does not render once per key.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
pub mod components;
pub mod event;
mod ui;

use log::{debug, info, warn};
use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::config::ResolvedConfig;
use crate::core::shell::Shell;
use crate::core::{Console, ConsoleConfig, StringBuffer};
use crate::tui::component::EventHandler;
use crate::tui::components::{ConsoleEvent, ConsoleView};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_TIMEOUT: Duration = Duration::from_millis(500);
const BANNER: &str = "conch: type `help` for commands, Esc or Ctrl+D to leave\n";

/// TUI-specific presentation state (not part of core console logic)
pub struct TuiState {
    pub console_view: ConsoleView,
    pub status_message: String,
    exit: Rc<Cell<bool>>,
}

impl TuiState {
    pub fn new(config: ConsoleConfig) -> Self {
        let shell = Shell::new();
        let exit = shell.exit_flag();

        let mut console = Console::new(StringBuffer::from(BANNER), config);
        console.set_handler(shell);

        Self {
            console_view: ConsoleView::new(console),
            status_message: String::new(),
            exit,
        }
    }

    /// True once the shell saw `exit`.
    pub fn exit_requested(&self) -> bool {
        self.exit.get()
    }

    /// Feed one event through the console view. Returns true to quit.
    pub fn handle_event(&mut self, event: &TuiEvent) -> bool {
        if matches!(event, TuiEvent::Quit) {
            return true;
        }

        match self.console_view.handle_event(event) {
            Some(ConsoleEvent::Rejected) => {
                self.status_message = "Read-only transcript".to_string();
            }
            Some(ConsoleEvent::Submitted) | Some(ConsoleEvent::Edited) => {
                self.status_message.clear();
            }
            None => {}
        }
        self.exit_requested()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol distinguishes Ctrl/Shift combos where supported;
        // terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut tui = TuiState::new(config.console);

    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Could not enable terminal modes: {}", e);
            None
        }
    };

    let result = event_loop(&mut terminal, &mut tui);

    drop(terminal_mode_guard);
    ratatui::restore();
    info!(
        "Console closed with {} command(s) in history",
        tui.console_view.console().history().len()
    );
    result
}

fn event_loop(terminal: &mut DefaultTerminal, tui: &mut TuiState) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, tui))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let mut next = poll_event_timeout(IDLE_TIMEOUT)?;
        while let Some(event) = next {
            needs_redraw = true;
            if tui.handle_event(&event) {
                debug!("Quit on {:?}", event);
                return Ok(());
            }
            next = poll_event_immediate()?;
        }
    }
}
