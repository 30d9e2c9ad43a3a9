//! # Key Events
//!
//! Toolkit-independent key representation. Hosts translate their native
//! events into `KeyEvent` (the terminal host does it in `tui::event`).

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Esc,
}

impl KeyCode {
    /// The default navigation allow-list: caret motion the host may always perform.
    pub const NAVIGATION: [KeyCode; 6] = [
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Home,
        KeyCode::End,
    ];

    /// Keys that only move the caret or scroll. Only these may be allow-listed
    /// as navigation, since allow-listed keys skip the input-span checks.
    pub fn is_motion(self) -> bool {
        matches!(
            self,
            KeyCode::Left
                | KeyCode::Right
                | KeyCode::Up
                | KeyCode::Down
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::PageUp
                | KeyCode::PageDown
        )
    }

    /// `Char` compared case-insensitively, for Ctrl+letter shortcuts.
    fn is_letter(self, letter: char) -> bool {
        matches!(self, KeyCode::Char(c) if c.eq_ignore_ascii_case(&letter))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name: {:?}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for KeyCode {
    type Err = UnknownKey;

    /// Parses the names used in the config file (`"left"`, `"page_up"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s.trim().to_ascii_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "page_up" | "pageup" => KeyCode::PageUp,
            "page_down" | "pagedown" => KeyCode::PageDown,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            _ => return Err(UnknownKey(s.to_string())),
        };
        Ok(code)
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    pub const fn ctrl(letter: char) -> Self {
        Self::new(KeyCode::Char(letter), Modifiers::CTRL)
    }

    /// Ctrl held together with `letter`, in either case.
    pub fn is_ctrl(&self, letter: char) -> bool {
        self.modifiers.ctrl && self.code.is_letter(letter)
    }

    /// A character that default editing would insert.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => Some(c),
            _ => None,
        }
    }
}
