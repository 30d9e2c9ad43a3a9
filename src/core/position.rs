//! # Position Translation
//!
//! Converts between linear character offsets and `(line, column)` coordinates.
//!
//! Nothing here is cached. Every edit can change line lengths, so callers
//! recompute a `Coordinate` after each mutation instead of holding on to one.
//!
//! ```text
//! "ab\ncd"     offset 4  →  Coordinate { line: 1, column: 1 }
//!  01 234
//! ```
//!
//! Out-of-range input clamps rather than fails: an offset past the end maps to
//! the last coordinate, a line past the last line maps to the last line, and a
//! column past the end of its line maps to the line end.

/// A zero-based `(line, column)` position, measured in characters.
///
/// Ordering is lexicographic: line first, then column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub line: usize,
    pub column: usize,
}

impl Coordinate {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of lines in `text`. An empty buffer still has one (empty) line.
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Coordinate of the character offset `offset`.
pub fn to_coordinate(text: &str, offset: usize) -> Coordinate {
    let mut line = 0;
    let mut column = 0;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Coordinate { line, column }
}

/// Character offset of `coordinate`.
pub fn to_offset(text: &str, coordinate: Coordinate) -> usize {
    let mut offset = 0;
    let last_line = line_count(text) - 1;
    let target_line = coordinate.line.min(last_line);

    for (idx, line) in text.split('\n').enumerate() {
        let len = char_len(line);
        if idx == target_line {
            return offset + coordinate.column.min(len);
        }
        // +1 for the '\n' that split() consumed
        offset += len + 1;
    }

    char_len(text)
}

/// Coordinate just past the final character of `text`.
pub fn last_coordinate(text: &str) -> Coordinate {
    to_coordinate(text, char_len(text))
}

/// Byte index of the character offset `offset`, clamped to `text.len()`.
pub fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ordering_is_line_major() {
        assert!(Coordinate::new(0, 9) < Coordinate::new(1, 0));
        assert!(Coordinate::new(2, 3) < Coordinate::new(2, 4));
        assert_eq!(Coordinate::new(1, 1), Coordinate::new(1, 1));
    }

    #[test]
    fn test_to_coordinate_crosses_lines() {
        let text = "ab\ncd\n";
        assert_eq!(to_coordinate(text, 0), Coordinate::new(0, 0));
        assert_eq!(to_coordinate(text, 2), Coordinate::new(0, 2));
        assert_eq!(to_coordinate(text, 3), Coordinate::new(1, 0));
        assert_eq!(to_coordinate(text, 5), Coordinate::new(1, 2));
        assert_eq!(to_coordinate(text, 6), Coordinate::new(2, 0));
    }

    #[test]
    fn test_to_offset_inverts_to_coordinate() {
        let text = "sh>ls\nout\nsh>";
        for offset in 0..=char_len(text) {
            assert_eq!(to_offset(text, to_coordinate(text, offset)), offset);
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let text = "ab\ncd";
        assert_eq!(to_coordinate(text, 99), Coordinate::new(1, 2));
        assert_eq!(to_offset(text, Coordinate::new(0, 99)), 2);
        assert_eq!(to_offset(text, Coordinate::new(7, 1)), 4);
    }

    #[test]
    fn test_multibyte_characters_count_once() {
        let text = "λx\n→";
        assert_eq!(char_len(text), 4);
        assert_eq!(last_coordinate(text), Coordinate::new(1, 1));
        assert_eq!(byte_index(text, 1), 2);
        assert_eq!(byte_index(text, 4), text.len());
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(line_count(""), 1);
        assert_eq!(last_coordinate(""), Coordinate::new(0, 0));
        assert_eq!(to_offset("", Coordinate::new(3, 3)), 0);
    }
}
