//! Persisted scores.
//!
//! Two string-valued keys, `streak` and `highScore`, each holding a decimal
//! integer. The file store keeps them as one JSON object and replaces the
//! file atomically on every write.

use crate::error::HangmanError;
use crate::session::SessionState;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const STREAK_KEY: &str = "streak";
pub const HIGH_SCORE_KEY: &str = "highScore";

const APP_DIR: &str = "word-hangman";
const SCORE_FILE: &str = "scores.json";

pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<String>, HangmanError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), HangmanError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, HangmanError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HangmanError> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, HangmanError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HangmanError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object of string values on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, HangmanError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), HangmanError> {
        let parent_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, values)?;
            writer.flush()?;
        }
        temp_file.persist(&self.path)?;
        Ok(())
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, HangmanError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), HangmanError> {
        // An unreadable file is replaced rather than blocking every later save.
        let mut values = self.read_all().unwrap_or_else(|e| {
            log::warn!("Overwriting unreadable score file {}: {e}", self.path.display());
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

/// `<data dir>/word-hangman/<file>`, if the platform has a data directory.
pub fn data_file_path(file: &str) -> Option<PathBuf> {
    let mut path = dirs::data_local_dir().or_else(dirs::home_dir)?;
    path.push(APP_DIR);
    path.push(file);
    Some(path)
}

pub fn default_store_path() -> Option<PathBuf> {
    data_file_path(SCORE_FILE)
}

fn read_counter<S: ScoreStore + ?Sized>(store: &S, key: &str) -> u32 {
    match store.get(key) {
        Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable {key} value {value:?}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Failed to load {key} from storage: {e}");
            0
        }
    }
}

/// Reads both counters, substituting 0 for anything absent or unreadable.
pub fn load_scores<S: ScoreStore + ?Sized>(store: &S) -> SessionState {
    let streak = read_counter(store, STREAK_KEY);
    let high_score = read_counter(store, HIGH_SCORE_KEY).max(streak);
    SessionState { streak, high_score }
}

pub fn save_streak<S: ScoreStore + ?Sized>(store: &mut S, streak: u32) -> Result<(), HangmanError> {
    store.set(STREAK_KEY, &streak.to_string())
}

pub fn save_high_score<S: ScoreStore + ?Sized>(
    store: &mut S,
    high_score: u32,
) -> Result<(), HangmanError> {
    store.set(HIGH_SCORE_KEY, &high_score.to_string())
}
