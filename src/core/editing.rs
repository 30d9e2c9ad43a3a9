//! # Default Editing
//!
//! What a plain single-caret text control does with a key when the console
//! lets it through (`Disposition::allows_default`). Real GUI toolkits ship
//! this behavior natively; the terminal host and the tests use this one.
//!
//! The clipboard is a plain `String` owned by the host. System clipboard
//! integration is out of scope.

use log::trace;

use crate::core::buffer::{Selection, TextBuffer};
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::position::{Coordinate, char_len};

/// Apply the default behavior for `key`. Returns `true` if the text or the
/// caret changed.
pub fn apply_default<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    key: &KeyEvent,
    clipboard: &mut String,
) -> bool {
    if key.is_ctrl('c') {
        return copy(buffer, clipboard);
    }
    if key.is_ctrl('x') {
        return copy(buffer, clipboard) && delete_selection(buffer);
    }
    if key.is_ctrl('v') {
        let text = flatten_line_breaks(clipboard);
        return replace_selection(buffer, &text);
    }
    if let Some(c) = key.printable() {
        return replace_selection(buffer, c.encode_utf8(&mut [0; 4]));
    }

    let extend = key.modifiers.shift;
    match key.code {
        KeyCode::Tab => replace_selection(buffer, "\t"),
        KeyCode::Backspace => {
            if delete_selection(buffer) {
                return true;
            }
            let caret = buffer.caret();
            if caret == 0 {
                return false;
            }
            buffer.remove(caret - 1..caret);
            buffer.set_caret(caret - 1);
            true
        }
        KeyCode::Delete => {
            if delete_selection(buffer) {
                return true;
            }
            let caret = buffer.caret();
            if caret >= buffer.len() {
                return false;
            }
            buffer.remove(caret..caret + 1);
            true
        }
        KeyCode::Left => {
            let selection = buffer.selection();
            let target = if !extend && !selection.is_empty() {
                selection.from()
            } else {
                selection.caret.saturating_sub(1)
            };
            move_caret(buffer, target, extend)
        }
        KeyCode::Right => {
            let selection = buffer.selection();
            let target = if !extend && !selection.is_empty() {
                selection.to()
            } else {
                (selection.caret + 1).min(buffer.len())
            };
            move_caret(buffer, target, extend)
        }
        KeyCode::Up | KeyCode::Down => {
            let at = buffer.to_coordinate(buffer.caret());
            let line = if key.code == KeyCode::Up {
                match at.line.checked_sub(1) {
                    Some(line) => line,
                    None => return false,
                }
            } else {
                if at.line + 1 >= buffer.line_count() {
                    return false;
                }
                at.line + 1
            };
            let target = buffer.to_offset(Coordinate::new(line, at.column));
            move_caret(buffer, target, extend)
        }
        KeyCode::Home => {
            let at = buffer.to_coordinate(buffer.caret());
            let target = buffer.to_offset(Coordinate::new(at.line, 0));
            move_caret(buffer, target, extend)
        }
        KeyCode::End => {
            let at = buffer.to_coordinate(buffer.caret());
            let target = buffer.to_offset(Coordinate::new(at.line, usize::MAX));
            move_caret(buffer, target, extend)
        }
        _ => false,
    }
}

/// Replace the selection (or insert at the caret) with `text`; caret after it.
pub fn replace_selection<B: TextBuffer + ?Sized>(buffer: &mut B, text: &str) -> bool {
    let selection = buffer.selection();
    if text.is_empty() && selection.is_empty() {
        return false;
    }
    buffer.remove(selection.range());
    buffer.insert(selection.from(), text);
    buffer.set_caret(selection.from() + char_len(text));
    true
}

/// A console input is a single line; pasted line breaks become spaces.
pub fn flatten_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn copy<B: TextBuffer + ?Sized>(buffer: &B, clipboard: &mut String) -> bool {
    let selection = buffer.selection();
    if selection.is_empty() {
        return false;
    }
    *clipboard = buffer.range_text(selection.range());
    trace!("Copied {} chars", char_len(clipboard));
    true
}

fn delete_selection<B: TextBuffer + ?Sized>(buffer: &mut B) -> bool {
    let selection = buffer.selection();
    if selection.is_empty() {
        return false;
    }
    buffer.remove(selection.range());
    buffer.set_caret(selection.from());
    true
}

fn move_caret<B: TextBuffer + ?Sized>(buffer: &mut B, target: usize, extend: bool) -> bool {
    let before = buffer.selection();
    let after = if extend {
        Selection::new(before.anchor, target)
    } else {
        Selection::caret(target)
    };
    buffer.set_selection(after);
    buffer.selection() != before
}
