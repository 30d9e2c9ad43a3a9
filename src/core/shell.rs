//! # Built-in Shell
//!
//! A tiny command interpreter plugged into the console as its
//! `SubmitHandler`. It exists to give the terminal host something to talk to
//! and shows what handlers can do: write output, rename the prompt, clear the
//! screen after a command, and ask the host to exit.
//!
//! | Command            | Effect                                  |
//! |--------------------|-----------------------------------------|
//! | `echo <text>`      | prints `<text>`                         |
//! | `prompt <text>`    | renames the prompt                      |
//! | `suffix <text>`    | changes the prompt suffix               |
//! | `history`          | lists remembered commands, oldest first |
//! | `clear`            | wipes the screen (history survives)     |
//! | `help`             | lists commands                          |
//! | `exit` / `quit`    | asks the host to stop                   |

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::core::buffer::TextBuffer;
use crate::core::console::{Console, SubmitHandler};

const HELP: &str = "commands: echo <text>, prompt <text>, suffix <text>, history, clear, help, exit";

#[derive(Debug, Default)]
pub struct Shell {
    exit: Rc<Cell<bool>>,
    clear_after: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the host polls to know when `exit` was entered.
    pub fn exit_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.exit)
    }
}

impl<B: TextBuffer> SubmitHandler<B> for Shell {
    fn on_command(&mut self, console: &mut Console<B>, command: &mut String) {
        let line = command.trim();
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        debug!("Shell command {:?} with {:?}", name, rest);

        match name {
            "" => {}
            "echo" => console.append_text(rest),
            "prompt" => console.set_prompt(rest),
            "suffix" => console.set_prompt_suffix(rest),
            "history" => {
                let listing: Vec<String> = console
                    .history()
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| format!("{:>3}  {}", i + 1, entry))
                    .collect();
                for line in listing {
                    console.append_text(&line);
                }
            }
            "clear" => self.clear_after = true,
            "help" => console.append_text(HELP),
            "exit" | "quit" => self.exit.set(true),
            other => console.append_text(&format!("unknown command: {other}")),
        }

        // Store the trimmed form so recall doesn't bring back stray spaces
        let trimmed = line.to_string();
        *command = trimmed;
    }

    fn on_post_command(&mut self, console: &mut Console<B>, _input: &str) {
        if std::mem::take(&mut self.clear_after) {
            console.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{console_with_prompt, type_text};

    fn run(commands: &[&str]) -> (Console<crate::core::buffer::StringBuffer>, Rc<Cell<bool>>) {
        let mut console = console_with_prompt("sh");
        let shell = Shell::new();
        let exit = shell.exit_flag();
        console.set_handler(shell);
        for command in commands {
            type_text(&mut console, command);
            console.submit();
        }
        (console, exit)
    }

    #[test]
    fn test_echo_prints_below_command() {
        let (console, _) = run(&["echo hello world"]);
        assert_eq!(console.text(), "sh>echo hello world\nhello world\nsh>");
    }

    #[test]
    fn test_prompt_command_renames_prompt() {
        let (console, _) = run(&["prompt db"]);
        assert_eq!(console.text(), "db>prompt db\ndb>");
        assert_eq!(console.prompt(), "db");
    }

    #[test]
    fn test_history_lists_previous_commands() {
        let (console, _) = run(&["echo a", "history"]);
        assert!(console.text().contains("sh>history\n  1  echo a\nsh>"));
    }

    #[test]
    fn test_clear_wipes_screen_after_command() {
        let (console, _) = run(&["echo a", "clear"]);
        assert_eq!(console.text(), "sh>");
        assert_eq!(console.history().len(), 2);
    }

    #[test]
    fn test_unknown_command_reports() {
        let (console, _) = run(&["frobnicate now"]);
        assert!(console.text().contains("unknown command: frobnicate"));
    }

    #[test]
    fn test_exit_sets_flag() {
        let (_, exit) = run(&["quit"]);
        assert!(exit.get());
    }

    #[test]
    fn test_command_stored_trimmed() {
        let (console, _) = run(&["  echo x  "]);
        assert_eq!(console.history().current(), Ok("echo x"));
    }
}
