//! # Prompt Region
//!
//! Bookkeeping for the frozen prompt label and the editable input after it.
//!
//! ```text
//!   sh>ls                 ◀── transcript (frozen)
//!   file.txt              ◀── transcript (frozen)
//!   sh>echo hi█
//!   ▲  ▲      ▲
//!   │  │      └── end of buffer
//!   │  └── span.end    ┐
//!   └── span.start     ┘ prompt label, never editable
//!                          input = [span.end, end of buffer]
//! ```
//!
//! The span stores coordinates, not offsets. Writers that insert before the
//! prompt recompute both ends from their shifted offsets.

use crate::core::position::Coordinate;

pub const DEFAULT_PROMPT_SUFFIX: &str = ">";

/// Where the current prompt label starts and ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptSpan {
    pub start: Coordinate,
    pub end: Coordinate,
}

impl PromptSpan {
    /// `coordinate` lies in the input span (prompt line, at or after the label).
    pub fn contains_input(&self, coordinate: Coordinate) -> bool {
        coordinate.line == self.end.line && coordinate.column >= self.end.column
    }
}

/// How internal writes are checked against the input span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Writes are confined to the input span; external output goes above the prompt.
    #[default]
    Normal,
    /// Trusted internal writes: prompt placement, line breaks, handler output.
    Bypass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_input_requires_prompt_line() {
        let span = PromptSpan {
            start: Coordinate::new(1, 0),
            end: Coordinate::new(1, 3),
        };
        assert!(span.contains_input(Coordinate::new(1, 3)));
        assert!(span.contains_input(Coordinate::new(1, 9)));
        assert!(!span.contains_input(Coordinate::new(1, 2)));
        assert!(!span.contains_input(Coordinate::new(0, 5)));
    }
}
