use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode as TermKeyCode, KeyEvent as TermKeyEvent, KeyEventKind, KeyModifiers,
    MouseEventKind,
};

use crate::core::key::{KeyCode, KeyEvent, Modifiers};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Quit,
    /// A key for the console policy
    Key(KeyEvent),
    Paste(String), // Bracketed paste - goes through the console's confined write
    ScrollUp,
    ScrollDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    let translated = match event::read()? {
        Event::Key(key_event) => {
            log::trace!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            translate_key(key_event)
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    };
    Ok(translated)
}

/// Map a crossterm key press onto a console key. Releases and repeats of
/// non-press kinds are dropped.
pub fn translate_key(key_event: TermKeyEvent) -> Option<TuiEvent> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let modifiers = Modifiers {
        shift: key_event.modifiers.contains(KeyModifiers::SHIFT),
        ctrl: key_event.modifiers.contains(KeyModifiers::CONTROL),
        alt: key_event.modifiers.contains(KeyModifiers::ALT),
    };

    let code = match key_event.code {
        // Esc and Ctrl+D leave; Ctrl+C stays copy
        TermKeyCode::Esc => return Some(TuiEvent::Quit),
        TermKeyCode::Char('d') if modifiers.ctrl => return Some(TuiEvent::Quit),
        TermKeyCode::PageUp => return Some(TuiEvent::ScrollUp),
        TermKeyCode::PageDown => return Some(TuiEvent::ScrollDown),
        TermKeyCode::Char(c) => KeyCode::Char(c),
        TermKeyCode::Enter => KeyCode::Enter,
        TermKeyCode::Backspace => KeyCode::Backspace,
        TermKeyCode::Delete => KeyCode::Delete,
        TermKeyCode::Left => KeyCode::Left,
        TermKeyCode::Right => KeyCode::Right,
        TermKeyCode::Up => KeyCode::Up,
        TermKeyCode::Down => KeyCode::Down,
        TermKeyCode::Home => KeyCode::Home,
        TermKeyCode::End => KeyCode::End,
        TermKeyCode::Tab => KeyCode::Tab,
        _ => return None,
    };

    Some(TuiEvent::Key(KeyEvent::new(code, modifiers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: TermKeyCode, modifiers: KeyModifiers) -> TermKeyEvent {
        TermKeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_keys_translate() {
        assert_eq!(
            translate_key(press(TermKeyCode::Char('x'), KeyModifiers::NONE)),
            Some(TuiEvent::Key(KeyEvent::plain(KeyCode::Char('x'))))
        );
        assert_eq!(
            translate_key(press(TermKeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Key(KeyEvent::plain(KeyCode::Enter)))
        );
    }

    #[test]
    fn test_modifiers_carry_over() {
        assert_eq!(
            translate_key(press(TermKeyCode::Home, KeyModifiers::SHIFT)),
            Some(TuiEvent::Key(KeyEvent::new(KeyCode::Home, Modifiers::SHIFT)))
        );
        assert_eq!(
            translate_key(press(TermKeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Key(KeyEvent::ctrl('c')))
        );
    }

    #[test]
    fn test_quit_and_scroll_keys() {
        assert_eq!(
            translate_key(press(TermKeyCode::Esc, KeyModifiers::NONE)),
            Some(TuiEvent::Quit)
        );
        assert_eq!(
            translate_key(press(TermKeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Quit)
        );
        assert_eq!(
            translate_key(press(TermKeyCode::PageUp, KeyModifiers::NONE)),
            Some(TuiEvent::ScrollUp)
        );
    }

    #[test]
    fn test_release_is_dropped() {
        let release = TermKeyEvent::new_with_kind_and_state(
            TermKeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(translate_key(release), None);
        assert_eq!(translate_key(press(TermKeyCode::F(5), KeyModifiers::NONE)), None);
    }
}
