//! # Text Buffer Capability
//!
//! The console never owns rendering or native text storage. It drives an
//! abstract `TextBuffer` supplied by the host: insert, remove, range query,
//! selection, and scroll-into-view. Coordinate translation has provided
//! implementations built on `text()`; a host with native translation may
//! override them.
//!
//! `StringBuffer` is the in-memory implementation used by the terminal host
//! and by the tests.

use std::ops::Range;

use crate::core::position::{self, Coordinate};

/// Caret plus a contiguous selection, both in character offsets.
///
/// `anchor == caret` means no selection. The caret is the insertion point and
/// may sit at either end of the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub caret: usize,
}

impl Selection {
    /// Collapsed selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            caret: offset,
        }
    }

    pub const fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.caret)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.caret)
    }

    pub fn range(&self) -> Range<usize> {
        self.from()..self.to()
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }
}

/// Text-editing capability the console operates against.
///
/// All offsets are character offsets. Implementations clamp out-of-range
/// offsets to the buffer end.
pub trait TextBuffer {
    /// Entire buffer content.
    fn text(&self) -> &str;

    /// Insert `text` at `offset`. The selection is left for the caller to fix up.
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove the characters in `range`.
    fn remove(&mut self, range: Range<usize>);

    /// Current caret and selection.
    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// Ask the view to bring `line` into view. Hosts without scrolling ignore it.
    fn scroll_to_line(&mut self, _line: usize) {}

    fn len(&self) -> usize {
        position::char_len(self.text())
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    fn clear(&mut self) {
        let len = self.len();
        self.remove(0..len);
        self.set_selection(Selection::caret(0));
    }

    /// Text in `range`, clamped to the buffer.
    fn range_text(&self, range: Range<usize>) -> String {
        let text = self.text();
        let start = position::byte_index(text, range.start);
        let end = position::byte_index(text, range.end).max(start);
        text[start..end].to_string()
    }

    fn line_count(&self) -> usize {
        position::line_count(self.text())
    }

    fn to_coordinate(&self, offset: usize) -> Coordinate {
        position::to_coordinate(self.text(), offset)
    }

    fn to_offset(&self, coordinate: Coordinate) -> usize {
        position::to_offset(self.text(), coordinate)
    }

    fn last_coordinate(&self) -> Coordinate {
        position::last_coordinate(self.text())
    }

    fn caret(&self) -> usize {
        self.selection().caret
    }

    fn set_caret(&mut self, offset: usize) {
        self.set_selection(Selection::caret(offset));
    }
}

/// Plain `String`-backed buffer.
#[derive(Debug, Clone, Default)]
pub struct StringBuffer {
    text: String,
    selection: Selection,
    /// Last line requested through `scroll_to_line`.
    pub scroll_line: usize,
}

impl StringBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<&str> for StringBuffer {
    /// Buffer holding `text` with the caret at its end.
    fn from(text: &str) -> Self {
        let end = position::char_len(text);
        Self {
            text: text.to_string(),
            selection: Selection::caret(end),
            scroll_line: 0,
        }
    }
}

impl TextBuffer for StringBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn insert(&mut self, offset: usize, text: &str) {
        let at = position::byte_index(&self.text, offset);
        self.text.insert_str(at, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let start = position::byte_index(&self.text, range.start);
        let end = position::byte_index(&self.text, range.end).max(start);
        self.text.drain(start..end);
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        let len = self.len();
        self.selection = Selection {
            anchor: selection.anchor.min(len),
            caret: selection.caret.min(len),
        };
    }

    fn scroll_to_line(&mut self, line: usize) {
        self.scroll_line = line;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds_are_ordered() {
        let backwards = Selection::new(7, 3);
        assert_eq!(backwards.from(), 3);
        assert_eq!(backwards.to(), 7);
        assert!(!backwards.is_empty());
        assert!(Selection::caret(4).is_empty());
    }

    #[test]
    fn test_insert_and_remove_use_char_offsets() {
        let mut buffer = StringBuffer::new();
        buffer.insert(0, "λ>");
        buffer.insert(2, "ok");
        assert_eq!(buffer.text(), "λ>ok");

        buffer.remove(1..3);
        assert_eq!(buffer.text(), "λk");
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_set_selection_clamps_to_length() {
        let mut buffer = StringBuffer::new();
        buffer.insert(0, "abc");
        buffer.set_selection(Selection::new(1, 40));
        assert_eq!(buffer.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_range_text_and_clear() {
        let mut buffer = StringBuffer::new();
        buffer.insert(0, "sh>ls\nsh>");
        assert_eq!(buffer.range_text(3..5), "ls");
        assert_eq!(buffer.range_text(6..99), "sh>");

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.selection(), Selection::caret(0));
    }

    #[test]
    fn test_coordinate_helpers_follow_content() {
        let mut buffer = StringBuffer::new();
        buffer.insert(0, "one\ntwo");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.last_coordinate(), Coordinate::new(1, 3));
        assert_eq!(buffer.to_offset(Coordinate::new(1, 0)), 4);
    }

    #[test]
    fn test_from_str_puts_caret_at_end() {
        let buffer = StringBuffer::from("héllo\n");
        assert_eq!(buffer.text(), "héllo\n");
        assert_eq!(buffer.caret(), 6);
        assert!(buffer.selection().is_empty());
    }
}
