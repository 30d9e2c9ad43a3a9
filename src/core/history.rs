//! # Command History
//!
//! Bounded list of submitted commands with a recall cursor.
//!
//! ```text
//!   oldest                    newest
//!   ┌─────┬─────┬─────┬─────┐
//!   │ cd  │ ls  │ pwd │ ls  │  ◀── at end (no active recall)
//!   └─────┴─────┴─────┴─────┘
//!     ◀── next()      prev() ──▶
//! ```
//!
//! - A push equal to the newest entry is dropped.
//! - At capacity the oldest entry is evicted before appending.
//! - Every push puts the cursor back at the end.
//!
//! Changing the limit does not truncate what is already stored; the next push
//! evicts one entry as usual.

use std::collections::VecDeque;
use std::fmt;

use log::{debug, trace};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// Recall was requested but nothing has been pushed.
    Empty,
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Empty => write!(f, "command history is empty"),
        }
    }
}

impl std::error::Error for HistoryError {}

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    limit: usize,
    /// Index of the recalled entry; `None` means "at end".
    cursor: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    /// A limit of 0 is raised to 1: the newest command is always kept.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
            cursor: None,
        }
    }

    /// Record `value` as the newest entry.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.entries.back() == Some(&value) {
            trace!("History push skipped, same as newest: {:?}", value);
            return;
        }

        if self.entries.len() >= self.limit {
            if self.entries.len() > self.limit {
                debug!(
                    "History holds {} entries over a limit of {}",
                    self.entries.len(),
                    self.limit
                );
            }
            if let Some(evicted) = self.entries.pop_front() {
                trace!("History evicted {:?}", evicted);
            }
        }

        self.entries.push_back(value);
        self.cursor = None;
    }

    /// Step toward older entries, stopping at the oldest.
    pub fn next(&mut self) -> Result<&str, HistoryError> {
        let newest = self.newest_index()?;
        let idx = match self.cursor {
            None => newest,
            Some(idx) => idx.saturating_sub(1),
        };
        self.cursor = Some(idx);
        Ok(&self.entries[idx])
    }

    /// Step toward newer entries, stopping at the newest.
    ///
    /// From the end position this yields the newest entry and stays at the end.
    pub fn prev(&mut self) -> Result<&str, HistoryError> {
        let newest = self.newest_index()?;
        if let Some(idx) = self.cursor {
            self.cursor = Some((idx + 1).min(newest));
        }
        self.current()
    }

    /// Entry under the cursor, or the newest entry when at the end.
    pub fn current(&self) -> Result<&str, HistoryError> {
        let idx = match self.cursor {
            Some(idx) => idx,
            None => self.newest_index()?,
        };
        Ok(&self.entries[idx])
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Takes effect lazily on later pushes. Raised to at least 1.
    pub fn set_limit(&mut self, limit: usize) {
        let limit = limit.max(1);
        debug!("History limit changed from {} to {}", self.limit, limit);
        self.limit = limit;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn newest_index(&self) -> Result<usize, HistoryError> {
        self.entries.len().checked_sub(1).ok_or(HistoryError::Empty)
    }
}
