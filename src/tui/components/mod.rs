//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `StatusBar`: top line with prompt, history fill and recall state
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `ConsoleView`: the console buffer itself, with scrolling and the cursor
//!
//! Each component file holds its state types, event types, rendering, event
//! handling and tests.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── status_bar.rs    (Top status line)
//! └── console_view.rs  (Console buffer view)
//! ```

pub mod console_view;
mod status_bar;

pub use console_view::{ConsoleEvent, ConsoleView};
pub use status_bar::StatusBar;
