use crate::debug_log;
use crate::error::HangmanError;
use crate::keyboard::is_guess_key;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/categories.txt");

/// A word to guess. An empty hint marks the easy tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub hint: String,
}

impl WordEntry {
    /// Builds an entry, normalising the word. Returns `None` if the word is
    /// empty or holds a character that can never be guessed.
    pub fn new(word: &str, hint: &str) -> Option<Self> {
        normalize_word(word).map(|word| Self {
            word,
            hint: hint.trim().to_string(),
        })
    }

    pub fn is_easy(&self) -> bool {
        self.hint.is_empty()
    }

    pub fn contains(&self, key: char) -> bool {
        self.word.contains(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub entries: Vec<WordEntry>,
}

/// Category name to word entries. Never empty, and no category in it is empty.
#[derive(Debug, Clone)]
pub struct WordBank {
    categories: Vec<Category>,
}

impl WordBank {
    pub fn embedded() -> Result<Self, HangmanError> {
        load_wordbank_from_str(EMBEDDED_WORDBANK)
    }

    fn from_entries<I>(entries: I) -> Result<Self, HangmanError>
    where
        I: IntoIterator<Item = (String, WordEntry)>,
    {
        let mut categories: Vec<Category> = Vec::new();
        for (name, entry) in entries {
            match categories.iter_mut().find(|c| c.name == name) {
                Some(category) => category.entries.push(entry),
                None => categories.push(Category {
                    name,
                    entries: vec![entry],
                }),
            }
        }

        if categories.is_empty() {
            return Err(HangmanError::EmptyWordBank);
        }
        Ok(Self { categories })
    }

    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn entries_for(&self, category: &str) -> &[WordEntry] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize_word(raw: &str) -> Option<String> {
    let word = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if word.is_empty() || !word.chars().all(|c| c == ' ' || is_guess_key(c)) {
        return None;
    }
    Some(word)
}

fn normalize_category(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Parses `category | word | hint` lines. The hint column may be omitted.
pub fn load_wordbank_from_str(data: &str) -> Result<WordBank, HangmanError> {
    let entries = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut columns = line.splitn(3, '|');
            let category = columns.next().and_then(normalize_category);
            let word = columns.next().unwrap_or("");
            let hint = columns.next().unwrap_or("");
            let parsed = category.zip(WordEntry::new(word, hint));
            if parsed.is_none() {
                debug_log!("Skipping malformed word bank line: {:?}", line);
            }
            parsed
        });
    WordBank::from_entries(entries)
}

#[derive(Deserialize)]
struct RawEntry {
    word: String,
    #[serde(default)]
    hint: Option<String>,
}

/// Parses `{ "category": [ { "word": "...", "hint": "..." } ] }`.
pub fn load_wordbank_from_json(data: &str) -> Result<WordBank, HangmanError> {
    let raw: BTreeMap<String, Vec<RawEntry>> = serde_json::from_str(data)?;
    let mut entries = Vec::new();
    for (name, raw_entries) in raw {
        let Some(name) = normalize_category(&name) else {
            log::warn!("Skipping unnamed category");
            continue;
        };
        let before = entries.len();
        entries.extend(
            raw_entries
                .iter()
                .filter_map(|e| WordEntry::new(&e.word, e.hint.as_deref().unwrap_or("")))
                .map(|e| (name.clone(), e)),
        );
        if entries.len() == before {
            log::warn!("Dropping category '{name}': no usable words");
        }
    }
    WordBank::from_entries(entries)
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<WordBank, HangmanError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_wordbank_from_json(&data)
    } else {
        load_wordbank_from_str(&data)
    }
}
