//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::buffer::StringBuffer;
use crate::core::console::{Console, ConsoleConfig, SubmitHandler};
use crate::core::editing::apply_default;
use crate::core::key::{KeyCode, KeyEvent};

/// Creates a console over an empty buffer with prompt `prompt` and suffix `">"`.
pub fn console_with_prompt(prompt: &str) -> Console<StringBuffer> {
    let config = ConsoleConfig {
        prompt: prompt.to_string(),
        ..Default::default()
    };
    Console::new(StringBuffer::new(), config)
}

/// Sends one key the way a host would: policy first, default editing if allowed.
pub fn press(console: &mut Console<StringBuffer>, key: KeyEvent) {
    let mut clipboard = String::new();
    if console.handle_key(&key).allows_default() {
        apply_default(console.buffer_mut(), &key, &mut clipboard);
    }
}

/// Types `text` one character at a time.
pub fn type_text(console: &mut Console<StringBuffer>, text: &str) {
    for c in text.chars() {
        press(console, KeyEvent::plain(KeyCode::Char(c)));
    }
}

/// Records `pre:<command>` and `post:<input>` for every notification.
pub struct Recorder {
    seen: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new(seen: Rc<RefCell<Vec<String>>>) -> Self {
        Self { seen }
    }
}

impl SubmitHandler<StringBuffer> for Recorder {
    fn on_command(&mut self, _console: &mut Console<StringBuffer>, command: &mut String) {
        self.seen.borrow_mut().push(format!("pre:{command}"));
    }

    fn on_post_command(&mut self, _console: &mut Console<StringBuffer>, input: &str) {
        self.seen.borrow_mut().push(format!("post:{input}"));
    }
}
