//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.conch/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::console::ConsoleConfig;
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::key::KeyCode;
use crate::core::prompt::DEFAULT_PROMPT_SUFFIX;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConchConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub console: ConsoleSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConsoleSection {
    pub prompt: Option<String>,
    pub prompt_suffix: Option<String>,
    pub history_limit: Option<usize>,
    pub history_cycling: Option<bool>,
    pub strip_trailing_newline: Option<bool>,
    pub navigation_keys: Option<Vec<String>>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub prompt: Option<String>,
    pub prompt_suffix: Option<String>,
    pub history_limit: Option<usize>,
    pub no_history_cycling: bool,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PROMPT: &str = "conch";
pub const DEFAULT_LOG_FILE: &str = "conch.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub console: ConsoleConfig,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

// ============================================================================
// Startup notes
// ============================================================================

/// Messages raised while loading and resolving config. The log file itself
/// comes from the config, so `main` replays these once the logger is up.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StartupNotes {
    pub info: Vec<String>,
    pub warnings: Vec<String>,
}

impl StartupNotes {
    fn info(&mut self, message: String) {
        self.info.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Emit everything collected through the `log` facade.
    pub fn replay(&self) {
        for message in &self.info {
            info!("{}", message);
        }
        for message in &self.warnings {
            warn!("{}", message);
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.conch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".conch").join("config.toml"))
}

/// Load config from `~/.conch/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ConchConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config(notes: &mut StartupNotes) -> Result<ConchConfig, ConfigError> {
    let Some(path) = config_path() else {
        notes.warn("Could not determine home directory, using default config".to_string());
        return Ok(ConchConfig::default());
    };

    if !path.exists() {
        notes.info(format!(
            "No config file found, generating default at {}",
            path.display()
        ));
        generate_default_config(&path, notes);
        return Ok(ConchConfig::default());
    }

    let config = load_config_from(&path)?;
    notes.info(format!("Loaded config from {}", path.display()));
    Ok(config)
}

/// Load and parse a specific config file.
pub fn load_config_from(path: &Path) -> Result<ConchConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path, notes: &mut StartupNotes) {
    let default_content = r#"# Conch Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_file = "conch.log"
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"

# [console]
# prompt = "conch"                   # Or set CONCH_PROMPT env var
# prompt_suffix = ">"
# history_limit = 10                 # At least 1
# history_cycling = true             # Up/Down recall previous commands
# strip_trailing_newline = true
# navigation_keys = ["left", "right", "up", "down", "home", "end"]  # Motion keys only
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        notes.warn(format!("Failed to create config directory: {}", e));
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        notes.warn(format!("Failed to write default config: {}", e));
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Values taken from the environment (None = not set).
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub prompt: Option<String>,
    pub log_level: Option<String>,
}

impl EnvOverrides {
    /// Reads `CONCH_PROMPT` and `CONCH_LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self {
            prompt: std::env::var("CONCH_PROMPT").ok(),
            log_level: std::env::var("CONCH_LOG_LEVEL").ok(),
        }
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(
    config: &ConchConfig,
    env: &EnvOverrides,
    cli: &CliOverrides,
    notes: &mut StartupNotes,
) -> ResolvedConfig {
    let section = &config.console;

    // Prompt: CLI → env → config → default
    let prompt = cli
        .prompt
        .clone()
        .or_else(|| env.prompt.clone())
        .or_else(|| section.prompt.clone())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    let prompt_suffix = cli
        .prompt_suffix
        .clone()
        .or_else(|| section.prompt_suffix.clone())
        .unwrap_or_else(|| DEFAULT_PROMPT_SUFFIX.to_string());

    let mut history_limit = cli
        .history_limit
        .or(section.history_limit)
        .unwrap_or(DEFAULT_HISTORY_LIMIT);
    if history_limit == 0 {
        notes.warn("history_limit must be at least 1, using 1".to_string());
        history_limit = 1;
    }

    // The CLI can only switch cycling off
    let history_cycling = !cli.no_history_cycling && section.history_cycling.unwrap_or(true);

    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| env.log_level.clone())
        .or_else(|| config.general.log_level.clone())
        .map_or(DEFAULT_LOG_LEVEL, |level| parse_log_level(&level, notes));

    let log_file = config
        .general
        .log_file
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        log_file: PathBuf::from(log_file),
        log_level,
        console: ConsoleConfig {
            prompt,
            prompt_suffix,
            history_limit,
            history_cycling,
            navigation_keys: resolve_navigation_keys(section.navigation_keys.as_deref(), notes),
            strip_trailing_newline: section.strip_trailing_newline.unwrap_or(true),
        },
    }
}

fn parse_log_level(level: &str, notes: &mut StartupNotes) -> LevelFilter {
    level.parse().unwrap_or_else(|_| {
        notes.warn(format!("Unknown log level {:?}, using {}", level, DEFAULT_LOG_LEVEL));
        DEFAULT_LOG_LEVEL
    })
}

/// Parses configured key names, skipping unknown names and keys that edit.
fn resolve_navigation_keys(names: Option<&[String]>, notes: &mut StartupNotes) -> Vec<KeyCode> {
    let Some(names) = names else {
        return KeyCode::NAVIGATION.to_vec();
    };

    names
        .iter()
        .filter_map(|name| match name.parse::<KeyCode>() {
            Ok(code) if code.is_motion() => Some(code),
            Ok(code) => {
                notes.warn(format!("Ignoring navigation key {:?}: it edits text", code));
                None
            }
            Err(e) => {
                notes.warn(format!("Ignoring navigation key: {}", e));
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_quietly(
        config: &ConchConfig,
        env: &EnvOverrides,
        cli: &CliOverrides,
    ) -> ResolvedConfig {
        resolve(config, env, cli, &mut StartupNotes::default())
    }

    #[test]
    fn test_default_config_parses() {
        let config = ConchConfig::default();
        assert!(config.console.prompt_suffix.is_none());
        assert!(config.general.log_file.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = ConchConfig::default();
        let resolved =
            resolve_quietly(&config, &EnvOverrides::default(), &CliOverrides::default());
        assert_eq!(resolved.console.prompt_suffix, ">");
        assert_eq!(resolved.console.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(resolved.console.history_cycling);
        assert!(resolved.console.strip_trailing_newline);
        assert_eq!(resolved.console.navigation_keys, KeyCode::NAVIGATION.to_vec());
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ConchConfig {
            general: GeneralConfig {
                log_file: Some("/tmp/c.log".to_string()),
                log_level: Some("trace".to_string()),
            },
            console: ConsoleSection {
                prompt: Some("db".to_string()),
                prompt_suffix: Some("=# ".to_string()),
                history_limit: Some(50),
                history_cycling: Some(false),
                strip_trailing_newline: Some(false),
                navigation_keys: Some(vec!["left".to_string(), "right".to_string()]),
            },
        };
        let cli = CliOverrides {
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        let resolved = resolve_quietly(&config, &EnvOverrides::default(), &cli);
        assert_eq!(resolved.console.prompt_suffix, "=# ");
        assert_eq!(resolved.console.history_limit, 50);
        assert!(!resolved.console.history_cycling);
        assert!(!resolved.console.strip_trailing_newline);
        assert_eq!(
            resolved.console.navigation_keys,
            vec![KeyCode::Left, KeyCode::Right]
        );
        assert_eq!(resolved.log_level, LevelFilter::Trace);
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/c.log"));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = ConchConfig {
            console: ConsoleSection {
                prompt: Some("from-file".to_string()),
                history_limit: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            prompt: Some("from-cli".to_string()),
            prompt_suffix: Some("$".to_string()),
            history_limit: Some(99),
            no_history_cycling: true,
            log_level: None,
        };
        let resolved = resolve_quietly(&config, &EnvOverrides::default(), &cli);
        assert_eq!(resolved.console.prompt, "from-cli");
        assert_eq!(resolved.console.prompt_suffix, "$");
        assert_eq!(resolved.console.history_limit, 99);
        assert!(!resolved.console.history_cycling);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
log_file = "session.log"
log_level = "debug"

[console]
prompt = "py"
prompt_suffix = ">>> "
history_limit = 3
history_cycling = true
navigation_keys = ["home", "end", "page_up"]
"#;
        let config: ConchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_file.as_deref(), Some("session.log"));
        assert_eq!(config.console.prompt.as_deref(), Some("py"));
        assert_eq!(config.console.history_limit, Some(3));
        assert_eq!(
            resolve_navigation_keys(
                config.console.navigation_keys.as_deref(),
                &mut StartupNotes::default()
            ),
            vec![KeyCode::Home, KeyCode::End, KeyCode::PageUp]
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[console]
prompt_suffix = "$"
"#;
        let config: ConchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.console.prompt_suffix.as_deref(), Some("$"));
        assert!(config.console.history_limit.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_unknown_navigation_keys_are_skipped() {
        let names = vec!["left".to_string(), "hyper".to_string()];
        let mut notes = StartupNotes::default();
        assert_eq!(resolve_navigation_keys(Some(&names), &mut notes), vec![KeyCode::Left]);
        assert_eq!(notes.warnings.len(), 1);
    }

    #[test]
    fn test_editing_keys_are_not_navigation_keys() {
        let names: Vec<String> = ["left", "backspace", "delete", "enter", "tab", "end"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut notes = StartupNotes::default();
        assert_eq!(
            resolve_navigation_keys(Some(&names), &mut notes),
            vec![KeyCode::Left, KeyCode::End]
        );
        assert_eq!(notes.warnings.len(), 4);
    }

    #[test]
    fn test_bad_log_level_falls_back() {
        let mut notes = StartupNotes::default();
        assert_eq!(parse_log_level("loud", &mut notes), DEFAULT_LOG_LEVEL);
        assert_eq!(parse_log_level("warn", &mut notes), LevelFilter::Warn);
        assert_eq!(notes.warnings.len(), 1);
        assert!(notes.warnings[0].contains("loud"));
    }

    #[test]
    fn test_resolve_collects_warnings_instead_of_logging() {
        let config = ConchConfig {
            general: GeneralConfig {
                log_level: Some("shouty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut notes = StartupNotes::default();
        let resolved = resolve(
            &config,
            &EnvOverrides::default(),
            &CliOverrides::default(),
            &mut notes,
        );
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(notes.warnings.len(), 1);
        assert!(notes.warnings[0].contains("shouty"));
        assert!(notes.info.is_empty());
    }

    #[test]
    fn test_zero_history_limit_is_raised_to_one() {
        let config = ConchConfig {
            console: ConsoleSection {
                history_limit: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut notes = StartupNotes::default();
        let resolved = resolve(
            &config,
            &EnvOverrides::default(),
            &CliOverrides::default(),
            &mut notes,
        );
        assert_eq!(resolved.console.history_limit, 1);
        assert!(notes.warnings[0].contains("history_limit"));

        let cli = CliOverrides {
            history_limit: Some(0),
            ..Default::default()
        };
        let resolved = resolve_quietly(&ConchConfig::default(), &EnvOverrides::default(), &cli);
        assert_eq!(resolved.console.history_limit, 1);
    }

    #[test]
    fn test_env_sits_between_file_and_cli() {
        let config = ConchConfig {
            general: GeneralConfig {
                log_level: Some("error".to_string()),
                ..Default::default()
            },
            console: ConsoleSection {
                prompt: Some("from-file".to_string()),
                ..Default::default()
            },
        };
        let env = EnvOverrides {
            prompt: Some("from-env".to_string()),
            log_level: Some("debug".to_string()),
        };

        let resolved = resolve_quietly(&config, &env, &CliOverrides::default());
        assert_eq!(resolved.console.prompt, "from-env");
        assert_eq!(resolved.log_level, LevelFilter::Debug);

        let cli = CliOverrides {
            prompt: Some("from-cli".to_string()),
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        let resolved = resolve_quietly(&config, &env, &cli);
        assert_eq!(resolved.console.prompt, "from-cli");
        assert_eq!(resolved.log_level, LevelFilter::Trace);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("conch-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[console\nprompt = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        fs::remove_dir_all(&dir).unwrap();
    }
}
