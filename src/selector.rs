//! Round selection: a random category, then a random word from the tier the
//! current streak has unlocked.

use crate::debug_log;
use crate::wordbank::{Category, WordBank, WordEntry};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;

/// Highest streak that still only draws easy (hint-less) words.
pub const EASY_ONLY_MAX_STREAK: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    EasyOnly,
    All,
}

impl Tier {
    pub fn for_streak(streak: u32) -> Self {
        if streak > EASY_ONLY_MAX_STREAK {
            Self::All
        } else {
            Self::EasyOnly
        }
    }

    pub fn admits(self, entry: &WordEntry) -> bool {
        match self {
            Self::EasyOnly => entry.is_easy(),
            Self::All => true,
        }
    }
}

/// Informational label shown next to the streak. Does not gate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0..=3 => Self::Easy,
            4..=7 => Self::Moderate,
            _ => Self::Hard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPick {
    pub category: String,
    pub entry: WordEntry,
}

pub fn random_category<'a, R: Rng + ?Sized>(bank: &'a WordBank, rng: &mut R) -> &'a Category {
    let categories = bank.categories();
    &categories[rng.random_range(0..categories.len())]
}

/// Picks a word from `category` for the given streak. If the tier filter
/// leaves nothing, the whole category is used instead.
pub fn random_entry<'a, R: Rng + ?Sized>(
    category: &'a Category,
    streak: u32,
    rng: &mut R,
) -> &'a WordEntry {
    let tier = Tier::for_streak(streak);
    let candidates: Vec<&WordEntry> = category
        .entries
        .iter()
        .filter(|e| tier.admits(e))
        .collect();

    if let Some(entry) = candidates.choose(rng).copied() {
        return entry;
    }

    debug_log!(
        "No {:?} words in '{}', widening to all {} entries",
        tier,
        category.name,
        category.entries.len()
    );
    &category.entries[rng.random_range(0..category.entries.len())]
}

pub fn select_round<R: Rng + ?Sized>(bank: &WordBank, streak: u32, rng: &mut R) -> RoundPick {
    let category = random_category(bank, rng);
    let entry = random_entry(category, streak, rng);
    RoundPick {
        category: category.name.clone(),
        entry: entry.clone(),
    }
}
