mod core;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use crate::core::config::{self, CliOverrides, EnvOverrides, StartupNotes};

#[derive(Parser)]
#[command(name = "conch", about = "Terminal REPL console")]
struct Args {
    /// Prompt text shown before the suffix
    #[arg(short, long)]
    prompt: Option<String>,

    /// Prompt suffix (default ">")
    #[arg(short, long)]
    suffix: Option<String>,

    /// Number of commands remembered for recall
    #[arg(long)]
    history_limit: Option<usize>,

    /// Disable Up/Down history recall
    #[arg(long)]
    no_history_cycling: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // The log file is configurable, so messages from loading are held until
    // the logger exists.
    let mut notes = StartupNotes::default();
    let file_config = config::load_config(&mut notes).map_err(std::io::Error::other)?;
    let overrides = CliOverrides {
        prompt: args.prompt,
        prompt_suffix: args.suffix,
        history_limit: args.history_limit,
        no_history_cycling: args.no_history_cycling,
        log_level: args.log_level,
    };
    let resolved = config::resolve(
        &file_config,
        &EnvOverrides::from_env(),
        &overrides,
        &mut notes,
    );

    // Initialize file logger - the terminal belongs to the console
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    notes.replay();
    log::debug!("Resolved config: {:?}", resolved);
    log::info!(
        "Conch starting up with prompt {:?}",
        format!("{}{}", resolved.console.prompt, resolved.console.prompt_suffix)
    );

    tui::run(resolved)
}
