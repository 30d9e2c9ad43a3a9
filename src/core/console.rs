//! # Console
//!
//! The REPL line: a frozen transcript, a prompt label, and one editable input
//! span at the end of the buffer.
//!
//! ```text
//!  key ──▶ DispatchPolicy::classify ──▶ Disposition
//!                                          │
//!            ┌──────────────┬──────────────┼──────────────┬─────────────┐
//!            ▼              ▼              ▼              ▼             ▼
//!      host default    history recall   caret move     submit()      dropped
//! ```
//!
//! The console owns its `TextBuffer` and never renders. A host feeds it keys
//! through [`Console::handle_key`] and applies its own default editing when
//! the returned disposition allows it.
//!
//! ## Write modes
//!
//! Internal writes (prompt placement, line breaks, handler output) run in
//! `WriteMode::Bypass`, entered through [`Console::with_write_mode`] so the
//! previous mode is always restored. The pending line break requested during
//! a submission is scoped the same way.

use std::fmt;
use std::mem;

use log::{debug, info, trace};

use crate::core::buffer::{Selection, TextBuffer};
use crate::core::dispatch::{CaretMove, Disposition, DispatchPolicy, KeyContext, Recall};
use crate::core::editing::{flatten_line_breaks, replace_selection};
use crate::core::history::{CommandHistory, DEFAULT_HISTORY_LIMIT};
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::position::char_len;
use crate::core::prompt::{DEFAULT_PROMPT_SUFFIX, PromptSpan, WriteMode};

/// Collaborator notified around each submitted command.
///
/// The console detaches its handler while calling it, so a handler is free to
/// call back into the console (write output, change the prompt, prefill input).
pub trait SubmitHandler<B: TextBuffer> {
    /// Input captured, transcript not yet frozen. `command` may be rewritten;
    /// the rewritten value is what history records.
    fn on_command(&mut self, _console: &mut Console<B>, _command: &mut String) {}

    /// Prompt, input, and history are already reset. `input` is the fresh
    /// input line (usually empty).
    fn on_post_command(&mut self, _console: &mut Console<B>, _input: &str) {}
}

/// Construction-time settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub prompt: String,
    pub prompt_suffix: String,
    pub history_limit: usize,
    pub history_cycling: bool,
    pub navigation_keys: Vec<KeyCode>,
    /// Remove one trailing line break the host may have inserted for Enter.
    pub strip_trailing_newline: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            prompt_suffix: DEFAULT_PROMPT_SUFFIX.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_cycling: true,
            navigation_keys: KeyCode::NAVIGATION.to_vec(),
            strip_trailing_newline: true,
        }
    }
}

pub struct Console<B: TextBuffer> {
    buffer: B,
    prompt: String,
    prompt_suffix: String,
    span: PromptSpan,
    history: CommandHistory,
    policy: DispatchPolicy,
    strip_trailing_newline: bool,
    write_mode: WriteMode,
    newline_requested: bool,
    handling_command: bool,
    handler: Option<Box<dyn SubmitHandler<B>>>,
}

impl<B: TextBuffer + fmt::Debug> fmt::Debug for Console<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("buffer", &self.buffer)
            .field("prompt", &self.prompt)
            .field("prompt_suffix", &self.prompt_suffix)
            .field("span", &self.span)
            .field("history", &self.history)
            .field("write_mode", &self.write_mode)
            .field("handling_command", &self.handling_command)
            .field("has_handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

impl<B: TextBuffer> Console<B> {
    /// Wrap `buffer` and place the first prompt after whatever it already holds.
    pub fn new(buffer: B, config: ConsoleConfig) -> Self {
        let mut console = Self {
            buffer,
            prompt: config.prompt,
            prompt_suffix: config.prompt_suffix,
            span: PromptSpan::default(),
            history: CommandHistory::new(config.history_limit),
            policy: DispatchPolicy::new(config.navigation_keys, config.history_cycling),
            strip_trailing_newline: config.strip_trailing_newline,
            write_mode: WriteMode::Normal,
            newline_requested: false,
            handling_command: false,
            handler: None,
        };
        console.insert_prompt();
        console
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Direct buffer access for the host's default editing. Writes made here
    /// skip every console check.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn prompt_suffix(&self) -> &str {
        &self.prompt_suffix
    }

    pub fn prompt_span(&self) -> PromptSpan {
        self.span
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    pub fn history_cycling(&self) -> bool {
        self.policy.history_cycling()
    }

    pub fn set_history_cycling(&mut self, enabled: bool) {
        self.policy.set_history_cycling(enabled);
    }

    pub fn is_handling_command(&self) -> bool {
        self.handling_command
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn set_handler(&mut self, handler: impl SubmitHandler<B> + 'static) {
        self.handler = Some(Box::new(handler));
    }

    pub fn take_handler(&mut self) -> Option<Box<dyn SubmitHandler<B>>> {
        self.handler.take()
    }

    // ------------------------------------------------------------------
    // Prompt region
    // ------------------------------------------------------------------

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.rewrite_prompt(|console| console.prompt = prompt);
    }

    pub fn set_prompt_suffix(&mut self, suffix: impl Into<String>) {
        let suffix = suffix.into();
        self.rewrite_prompt(|console| console.prompt_suffix = suffix);
    }

    pub fn set_prompt_with_suffix(&mut self, prompt: impl Into<String>, suffix: impl Into<String>) {
        let prompt = prompt.into();
        let suffix = suffix.into();
        self.rewrite_prompt(|console| {
            console.prompt = prompt;
            console.prompt_suffix = suffix;
        });
    }

    /// Swap the prompt label while keeping the in-progress input.
    fn rewrite_prompt(&mut self, change: impl FnOnce(&mut Self)) {
        // A handler changing the prompt mid-submission must not trigger the
        // pending line break when the input is restored.
        let newline = self.newline_requested && !self.handling_command;
        self.with_newline_request(newline, |console| {
            let input = console.input();
            console.clear_input();
            change(console);
            console.update_prompt();
            console.set_input(&input);
        });
        debug!("Prompt is now {:?}", self.prompt_label());
    }

    fn prompt_label(&self) -> String {
        format!("{}{}", self.prompt, self.prompt_suffix)
    }

    /// Write the prompt label at the end of the buffer and record its span.
    pub fn insert_prompt(&mut self) {
        let label = self.prompt_label();
        self.with_write_mode(WriteMode::Bypass, |console| {
            console.span.start = console.buffer.last_coordinate();
            let end = console.buffer.len();
            console.buffer.insert(end, &label);
            console.span.end = console.buffer.last_coordinate();
        });
        self.set_insertion_at_end();
    }

    /// Delete the current prompt label. The input after it is left alone.
    pub fn remove_prompt(&mut self) {
        let start = self.buffer.to_offset(self.span.start);
        let end = self.prompt_end_offset();
        self.with_write_mode(WriteMode::Bypass, |console| console.buffer.remove(start..end));
    }

    /// Re-render the prompt label at the end of the buffer.
    pub fn update_prompt(&mut self) {
        self.remove_prompt();
        self.insert_prompt();
    }

    fn prompt_end_offset(&self) -> usize {
        self.buffer.to_offset(self.span.end)
    }

    // ------------------------------------------------------------------
    // Input span
    // ------------------------------------------------------------------

    /// Text after the prompt.
    pub fn input(&self) -> String {
        self.buffer
            .range_text(self.prompt_end_offset()..self.buffer.len())
    }

    pub fn clear_input(&mut self) {
        let start = self.prompt_end_offset();
        let end = self.buffer.len();
        self.buffer.remove(start..end);
        self.clamp_caret();
    }

    pub fn set_input(&mut self, input: &str) {
        self.with_write_mode(WriteMode::Bypass, |console| {
            console.clear_input();
            console.append_text(input);
        });
        self.set_insertion_at_end();
    }

    /// Caret sits on the last line of the buffer.
    pub fn insertion_at_last_line(&self) -> bool {
        let caret = self.buffer.to_coordinate(self.buffer.caret());
        caret.line + 1 == self.buffer.line_count()
    }

    /// Caret sits inside the input span.
    pub fn insertion_at_input(&self) -> bool {
        let caret = self.buffer.to_coordinate(self.buffer.caret());
        self.span.contains_input(caret)
    }

    pub fn set_insertion_at_end(&mut self) {
        let end = self.buffer.len();
        self.buffer.set_caret(end);
        let last_line = self.buffer.line_count() - 1;
        self.buffer.scroll_to_line(last_line);
    }

    pub fn set_insertion_at_prompt(&mut self) {
        let end = self.prompt_end_offset();
        self.buffer.set_caret(end);
    }

    fn clamp_caret(&mut self) {
        let len = self.buffer.len();
        let selection = self.buffer.selection();
        self.buffer.set_selection(Selection::new(
            selection.anchor.min(len),
            selection.caret.min(len),
        ));
    }

    /// Cut a selection that starts in the transcript back to the prompt end.
    fn clamp_selection_to_input(&mut self) {
        let prompt_end = self.prompt_end_offset();
        let selection = self.buffer.selection();
        if selection.from() >= prompt_end {
            return;
        }
        let clamped = Selection::new(prompt_end, selection.to().max(prompt_end));
        debug!("Selection {:?} clamped to {:?}", selection, clamped);
        self.buffer.set_selection(clamped);
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Emit output.
    ///
    /// Normally `text` becomes transcript lines just above the prompt and the
    /// input line keeps its content and caret. In bypass mode (inside a
    /// submit handler, or internal writes) it goes to the end of the buffer.
    pub fn append_text(&mut self, text: &str) {
        if self.newline_requested {
            let end = self.buffer.len();
            self.buffer.insert(end, "\n");
        }

        match self.write_mode {
            WriteMode::Bypass => {
                let end = self.buffer.len();
                self.buffer.insert(end, text);
                self.set_insertion_at_end();
            }
            WriteMode::Normal => {
                let caret_in_input = self.insertion_at_input();
                let from_end = self.buffer.len().saturating_sub(self.buffer.caret());
                let start = self.buffer.to_offset(self.span.start);
                let end = self.buffer.to_offset(self.span.end);

                // A prompt that starts mid-line gets its output on a line of its own.
                let output = if self.span.start.column > 0 {
                    format!("\n{text}\n")
                } else {
                    format!("{text}\n")
                };
                self.buffer.insert(start, &output);
                let inserted = char_len(&output);
                self.span = PromptSpan {
                    start: self.buffer.to_coordinate(start + inserted),
                    end: self.buffer.to_coordinate(end + inserted),
                };

                if caret_in_input {
                    let caret = self.buffer.len() - from_end;
                    self.buffer.set_caret(caret);
                    self.buffer.scroll_to_line(self.span.end.line);
                } else {
                    self.set_insertion_at_end();
                }
            }
        }
    }

    /// Insert `text` at the caret as if typed. Outside bypass mode this only
    /// works with the caret in the input span, and line breaks are flattened.
    /// Returns whether anything was written.
    pub fn write_text(&mut self, text: &str) -> bool {
        if self.write_mode == WriteMode::Bypass {
            return replace_selection(&mut self.buffer, text);
        }

        if !self.insertion_at_input() {
            trace!("Write outside the input span dropped");
            return false;
        }

        self.clamp_selection_to_input();
        replace_selection(&mut self.buffer, &flatten_line_breaks(text))
    }

    /// Empty the buffer and start over with a fresh prompt. History is kept.
    pub fn clear(&mut self) {
        self.with_write_mode(WriteMode::Bypass, |console| console.buffer.clear());
        self.insert_prompt();
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Replace the input with the next older command.
    pub fn next_command(&mut self) {
        if self.history.is_empty() {
            return;
        }
        if let Ok(command) = self.history.next().map(str::to_string) {
            self.set_input(&command);
        }
    }

    /// Replace the input with the next newer command.
    pub fn prev_command(&mut self) {
        if self.history.is_empty() {
            return;
        }
        if let Ok(command) = self.history.prev().map(str::to_string) {
            self.set_input(&command);
        }
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    fn key_context(&self) -> KeyContext {
        let selection = self.buffer.selection();
        KeyContext {
            selection,
            caret: self.buffer.to_coordinate(selection.caret),
            prompt_end: self.span.end,
            prompt_end_offset: self.prompt_end_offset(),
            last_line: self.buffer.line_count() - 1,
        }
    }

    /// Classify `key` and perform everything the console owns. When the
    /// returned disposition [`allows_default`](Disposition::allows_default),
    /// the host must still apply its default editing for the key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Disposition {
        let disposition = self.policy.classify(key, &self.key_context());
        trace!("{:?} -> {:?}", key, disposition);

        match disposition {
            Disposition::Recall(Recall::Older) => self.next_command(),
            Disposition::Recall(Recall::Newer) => self.prev_command(),
            Disposition::Caret(CaretMove::ToPrompt) => self.set_insertion_at_prompt(),
            Disposition::Caret(CaretMove::SelectToPrompt) => {
                let to = self.buffer.selection().to();
                let prompt_end = self.prompt_end_offset();
                self.buffer.set_selection(Selection::new(prompt_end, to));
            }
            Disposition::Caret(CaretMove::SelectAll) => {
                let end = self.buffer.len();
                self.buffer.set_selection(Selection::new(0, end));
            }
            Disposition::Submit => self.submit(),
            Disposition::AllowClamped => self.clamp_selection_to_input(),
            Disposition::AllowDefault | Disposition::Ignore => {}
        }

        disposition
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Freeze the input line into the transcript, notify the handler, place a
    /// fresh prompt, and record the command.
    pub fn submit(&mut self) {
        self.handling_command = true;

        // Only a line break inside the input is stripped; the transcript is frozen.
        let len = self.buffer.len();
        if self.strip_trailing_newline
            && len > self.prompt_end_offset()
            && self.buffer.text().ends_with('\n')
        {
            self.buffer.remove(len - 1..len);
        }

        let command = self.with_newline_request(true, |console| {
            console.with_write_mode(WriteMode::Bypass, |console| {
                let mut command = console.input();
                console.notify_command(&mut command);
                command
            })
        });
        info!("Command submitted: {:?}", command);

        self.with_write_mode(WriteMode::Bypass, |console| {
            let end = console.buffer.len();
            console.buffer.insert(end, "\n");
            console.insert_prompt();
        });
        self.history.push(command);

        self.handling_command = false;

        let input = self.input();
        self.notify_post_command(&input);

        self.set_insertion_at_end();
    }

    fn notify_command(&mut self, command: &mut String) {
        if let Some(mut handler) = self.handler.take() {
            handler.on_command(self, command);
            self.restore_handler(handler);
        }
    }

    fn notify_post_command(&mut self, input: &str) {
        if let Some(mut handler) = self.handler.take() {
            handler.on_post_command(self, input);
            self.restore_handler(handler);
        }
    }

    /// Put a detached handler back unless it installed a replacement.
    fn restore_handler(&mut self, handler: Box<dyn SubmitHandler<B>>) {
        if self.handler.is_none() {
            self.handler = Some(handler);
        }
    }

    // ------------------------------------------------------------------
    // Scoped modes
    // ------------------------------------------------------------------

    /// Run `f` with `mode` active, restoring the previous mode afterwards.
    pub fn with_write_mode<R>(&mut self, mode: WriteMode, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = mem::replace(&mut self.write_mode, mode);
        let result = f(self);
        self.write_mode = previous;
        result
    }

    fn with_newline_request<R>(&mut self, requested: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = mem::replace(&mut self.newline_requested, requested);
        let result = f(self);
        self.newline_requested = previous;
        result
    }
}
