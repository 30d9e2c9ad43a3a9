//! # Key Dispatch Policy
//!
//! Decides what a key press is allowed to do to the console. The policy is a
//! pure function of the key and a `KeyContext` snapshot; the console applies
//! the outcome.
//!
//! Rules are checked in order, first match wins:
//!
//! | # | Key                                   | Outcome                      |
//! |---|---------------------------------------|------------------------------|
//! | 1 | Up/Down in input, cycling enabled     | recall older/newer command   |
//! | 2 | Shift+Home on last line               | select back to prompt end    |
//! | 3 | Home on last line                     | caret to prompt end          |
//! | 4 | navigation keys (motion only)         | default                      |
//! | 5 | Ctrl+C                                | default (copy)               |
//! | 6 | Ctrl+A                                | select whole buffer          |
//! | 7 | Ctrl+V / Ctrl+X in input              | default (paste/cut)          |
//! | 8 | Enter                                 | submit                       |
//! | 9 | caret before prompt end               | ignore                       |
//! | 10| Backspace                             | default if it stays in input |
//! | 11| Delete before prompt end              | ignore                       |
//! | 12| anything else                         | default                      |
//!
//! Destructive defaults (7, 10, 12) become `AllowClamped` when the selection
//! starts in the transcript: the selection is cut back to the prompt end first,
//! so the transcript is never edited. If clamping would leave nothing selected,
//! Backspace, Delete and Ctrl+X are ignored instead of acting on the caret.

use std::collections::HashSet;

use log::warn;

use crate::core::buffer::Selection;
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::position::Coordinate;

/// Which way to move through history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall {
    Older,
    Newer,
}

/// Caret and selection moves the console performs itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    /// Collapse the caret onto the prompt end.
    ToPrompt,
    /// Select from the prompt end to the current selection end.
    SelectToPrompt,
    /// Select the whole buffer.
    SelectAll,
}

/// Outcome of classifying a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The host applies its default behavior.
    AllowDefault,
    /// The selection is clamped to the input span, then the host applies its default.
    AllowClamped,
    /// The input is replaced by a history entry. Consumed.
    Recall(Recall),
    /// The console moves the caret. Consumed.
    Caret(CaretMove),
    /// The submission pipeline runs. Consumed.
    Submit,
    /// Dropped without effect.
    Ignore,
}

impl Disposition {
    /// Whether the host should still run its default handling for the key.
    pub fn allows_default(self) -> bool {
        matches!(self, Disposition::AllowDefault | Disposition::AllowClamped)
    }
}

/// Snapshot of caret and prompt state taken just before a key is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub selection: Selection,
    pub caret: Coordinate,
    pub prompt_end: Coordinate,
    /// Offset of `prompt_end`.
    pub prompt_end_offset: usize,
    pub last_line: usize,
}

impl KeyContext {
    fn caret_in_input(&self) -> bool {
        self.caret.line == self.prompt_end.line && self.caret.column >= self.prompt_end.column
    }

    fn caret_on_last_line(&self) -> bool {
        self.caret.line == self.last_line
    }

    /// Selection begins in the transcript while the caret is past the prompt.
    fn straddles_prompt(&self) -> bool {
        !self.selection.is_empty()
            && self.selection.from() < self.prompt_end_offset
            && self.caret >= self.prompt_end
    }

    /// Straddling selection that lies entirely before the prompt end.
    fn clamps_to_nothing(&self) -> bool {
        self.straddles_prompt() && self.selection.to() <= self.prompt_end_offset
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPolicy {
    navigation_keys: HashSet<KeyCode>,
    history_cycling: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::new(KeyCode::NAVIGATION, true)
    }
}

impl DispatchPolicy {
    /// Keys that are not pure motion are dropped from the navigation set:
    /// an allow-listed key bypasses confinement.
    pub fn new(navigation_keys: impl IntoIterator<Item = KeyCode>, history_cycling: bool) -> Self {
        let navigation_keys = navigation_keys
            .into_iter()
            .filter(|code| {
                if !code.is_motion() {
                    warn!("Dropping {:?} from navigation keys: not a motion key", code);
                }
                code.is_motion()
            })
            .collect();
        Self {
            navigation_keys,
            history_cycling,
        }
    }

    pub fn history_cycling(&self) -> bool {
        self.history_cycling
    }

    pub fn set_history_cycling(&mut self, enabled: bool) {
        self.history_cycling = enabled;
    }

    pub fn classify(&self, key: &KeyEvent, ctx: &KeyContext) -> Disposition {
        let shift = key.modifiers.shift;

        if self.history_cycling && ctx.caret_in_input() && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Up => return Disposition::Recall(Recall::Older),
                KeyCode::Down => return Disposition::Recall(Recall::Newer),
                _ => {}
            }
        }

        if key.code == KeyCode::Home && ctx.caret_on_last_line() {
            let caret_move = if shift {
                CaretMove::SelectToPrompt
            } else {
                CaretMove::ToPrompt
            };
            return Disposition::Caret(caret_move);
        }

        if self.navigation_keys.contains(&key.code) || key.is_ctrl('c') {
            return Disposition::AllowDefault;
        }

        if key.is_ctrl('a') {
            return Disposition::Caret(CaretMove::SelectAll);
        }

        if key.is_ctrl('x') && ctx.caret_in_input() && ctx.clamps_to_nothing() {
            return Disposition::Ignore;
        }

        if (key.is_ctrl('v') || key.is_ctrl('x')) && ctx.caret_in_input() {
            return Self::allow_edit(ctx);
        }

        if key.code == KeyCode::Enter {
            return Disposition::Submit;
        }

        // Confinement guard: nothing typed in the transcript has any effect.
        if ctx.caret < ctx.prompt_end {
            return Disposition::Ignore;
        }

        if key.code == KeyCode::Backspace {
            if !ctx.selection.is_empty() && ctx.selection.to() > ctx.prompt_end_offset {
                return Self::allow_edit(ctx);
            }
            if ctx.caret <= ctx.prompt_end {
                return Disposition::Ignore;
            }
        }

        // Delete before the prompt end was already dropped by the guard above.
        if key.code == KeyCode::Delete && ctx.clamps_to_nothing() {
            return Disposition::Ignore;
        }

        Self::allow_edit(ctx)
    }

    fn allow_edit(ctx: &KeyContext) -> Disposition {
        if ctx.straddles_prompt() {
            Disposition::AllowClamped
        } else {
            Disposition::AllowDefault
        }
    }
}
