use crate::cli::Cli;
use crate::logging::LogTarget;
use crate::storage::{data_file_path, default_store_path};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RESET_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOADING_DELAY_MS: u64 = 2500;
const LOG_FILE: &str = "word-hangman.log";

/// Where scores are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChoice {
    Memory,
    File(PathBuf),
    /// The platform data directory, falling back to memory when there is none.
    Default,
}

impl StoreChoice {
    /// The file to use, or `None` for in-memory scores.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            Self::Memory => None,
            Self::File(path) => Some(path.clone()),
            Self::Default => default_store_path(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub wordbank_path: Option<PathBuf>,
    pub store: StoreChoice,
    pub seed: Option<u64>,
    pub plain: bool,
    /// Pause after a round ends before the next word appears.
    pub reset_delay: Duration,
    /// Pause between loading scores and showing the first word.
    pub loading_delay: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wordbank_path: None,
            store: StoreChoice::Default,
            seed: None,
            plain: false,
            reset_delay: Duration::from_millis(DEFAULT_RESET_DELAY_MS),
            loading_delay: Duration::from_millis(DEFAULT_LOADING_DELAY_MS),
            log_file: None,
        }
    }
}

impl GameConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let store = if cli.no_persist {
            StoreChoice::Memory
        } else if let Some(path) = &cli.store {
            StoreChoice::File(path.clone())
        } else {
            StoreChoice::Default
        };

        Self {
            wordbank_path: cli.wordbank_path.clone(),
            store,
            seed: cli.seed,
            plain: cli.plain,
            reset_delay: Duration::from_millis(cli.reset_delay_ms),
            loading_delay: Duration::from_millis(cli.loading_delay_ms),
            log_file: cli.log_file.clone(),
        }
    }

    /// No pauses, in-memory scores. Used by tests and scripted play.
    pub fn instant() -> Self {
        Self {
            store: StoreChoice::Memory,
            reset_delay: Duration::ZERO,
            loading_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Log destination. The TUI owns the terminal, so it logs to a file by
    /// default and never to stderr; plain mode logs to stderr unless a file
    /// was given.
    pub fn log_target(&self) -> LogTarget {
        match &self.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None if self.plain => LogTarget::Stderr,
            None => data_file_path(LOG_FILE).map_or(LogTarget::Off, LogTarget::File),
        }
    }

    /// Used when `log_target` could not be opened.
    pub fn fallback_log_target(&self) -> LogTarget {
        if self.plain {
            LogTarget::Stderr
        } else {
            LogTarget::Off
        }
    }
}
