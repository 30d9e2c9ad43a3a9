//! # Core Console Logic
//!
//! The editing policy of a REPL line. It knows nothing about any specific UI
//! technology: a host hands it a `TextBuffer` and key events, and the core
//! decides what each key may do.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Console (prompt,     │
//!                    │    input, submission)   │
//!                    │  • DispatchPolicy       │
//!                    │  • CommandHistory       │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ TextBuffer
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    GUI     │      │   Tests    │
//!     │   Host     │      │  toolkit   │      │ (String-   │
//!     │ (ratatui)  │      │  (future)  │      │  Buffer)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`position`]: offset ↔ `(line, column)` translation
//! - [`buffer`]: the `TextBuffer` capability and `StringBuffer`
//! - [`key`]: toolkit-independent key events
//! - [`history`]: bounded command history with a recall cursor
//! - [`prompt`]: prompt span bookkeeping and write modes
//! - [`dispatch`]: the key classification rules
//! - [`console`]: the console itself and the submission pipeline
//! - [`editing`]: default single-caret editing for hosts without their own
//! - [`shell`]: a small built-in command interpreter
//! - [`config`]: layered configuration

pub mod buffer;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod editing;
pub mod history;
pub mod key;
pub mod position;
pub mod prompt;
pub mod shell;

pub use buffer::{Selection, StringBuffer, TextBuffer};
pub use console::{Console, ConsoleConfig, SubmitHandler};
pub use dispatch::{CaretMove, Disposition, DispatchPolicy, Recall};
pub use history::{CommandHistory, HistoryError};
pub use key::{KeyCode, KeyEvent, Modifiers};
pub use position::Coordinate;
