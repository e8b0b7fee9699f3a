//! The game session state machine.
//!
//! `Loading → Active → RoundWon | RoundLost → Active → ...`
//!
//! There is no global terminal state; a session plays rounds until the
//! caller stops asking for them.

use crate::error::HangmanError;
use crate::keyboard::normalize_key;
use crate::selector::{Difficulty, RoundPick, select_round};
use crate::storage::{ScoreStore, load_scores, save_high_score, save_streak};
use crate::wordbank::{WordBank, WordEntry};
use crate::{debug_log, info_log};
use rand::Rng;
use std::collections::BTreeSet;

pub const MAX_WRONG_GUESSES: u32 = 6;

/// Shown in place of a letter that has not been guessed yet.
pub const HIDDEN_KEY: char = '_';

/// Long-lived scores. `high_score >= streak` after every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub streak: u32,
    pub high_score: u32,
}

impl SessionState {
    /// Returns true when the win set a new high score.
    pub fn record_win(&mut self) -> bool {
        self.streak += 1;
        if self.streak > self.high_score {
            self.high_score = self.streak;
            return true;
        }
        false
    }

    pub fn record_loss(&mut self) {
        self.streak = 0;
    }
}

#[derive(Debug, Clone)]
pub struct RoundState {
    category: String,
    entry: WordEntry,
    guessed: BTreeSet<char>,
    guess_order: Vec<char>,
    wrong_guesses: u32,
}

impl RoundState {
    pub fn new(pick: RoundPick) -> Self {
        Self {
            category: pick.category,
            entry: pick.entry,
            guessed: BTreeSet::new(),
            guess_order: Vec::new(),
            wrong_guesses: 0,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn entry(&self) -> &WordEntry {
        &self.entry
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    pub fn has_guessed(&self, key: char) -> bool {
        self.guessed.contains(&key)
    }

    /// Guessed keys in the order they were entered.
    pub fn guesses(&self) -> &[char] {
        &self.guess_order
    }

    /// Records a key. Returns `None` for a repeat, otherwise whether the word
    /// contains it.
    fn record(&mut self, key: char) -> Option<bool> {
        if !self.guessed.insert(key) {
            return None;
        }
        self.guess_order.push(key);
        let hit = self.entry.contains(key);
        if !hit {
            self.wrong_guesses += 1;
        }
        Some(hit)
    }

    pub fn is_lost(&self) -> bool {
        self.wrong_guesses >= MAX_WRONG_GUESSES
    }

    /// Whitespace never needs guessing.
    pub fn is_won(&self) -> bool {
        self.entry
            .word
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| self.guessed.contains(&c))
    }

    pub fn masked_word(&self) -> String {
        self.entry
            .word
            .chars()
            .map(|c| {
                if c.is_whitespace() || self.guessed.contains(&c) {
                    c
                } else {
                    HIDDEN_KEY
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    RoundWon,
    RoundLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong {
        remaining: u32,
    },
    /// The key was already guessed this round. Nothing changed.
    Repeated,
    /// No round is in progress.
    Ignored,
    /// Produced exactly once per won round.
    RoundWon {
        streak: u32,
        high_score: u32,
        new_high_score: bool,
    },
    RoundLost {
        solution: String,
    },
}

/// Everything the presentation layer needs to draw one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub category: String,
    pub hint: String,
    pub masked_word: String,
    pub guesses: Vec<char>,
    pub wrong_guesses: u32,
    pub max_wrong_guesses: u32,
    pub streak: u32,
    pub high_score: u32,
    pub difficulty: Difficulty,
    pub result: Option<RoundResult>,
    /// Set once the round is lost.
    pub solution: Option<String>,
}

impl Snapshot {
    pub fn has_guessed(&self, key: char) -> bool {
        self.guesses.contains(&key)
    }

    /// Wrong guesses as a fraction of the allowance, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        f64::from(self.wrong_guesses.min(self.max_wrong_guesses))
            / f64::from(self.max_wrong_guesses)
    }
}

pub struct GameSession<S: ScoreStore, R: Rng> {
    bank: WordBank,
    store: S,
    rng: R,
    scores: SessionState,
    round: Option<RoundState>,
    phase: Phase,
}

impl<S: ScoreStore, R: Rng> GameSession<S, R> {
    pub fn new(bank: WordBank, store: S, rng: R) -> Self {
        Self {
            bank,
            store,
            rng,
            scores: SessionState::default(),
            round: None,
            phase: Phase::Loading,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scores(&self) -> SessionState {
        self.scores
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads persisted scores and starts the first round. A no-op after the
    /// first call.
    pub fn load(&mut self) -> SessionState {
        if self.phase == Phase::Loading {
            self.scores = load_scores(&self.store);
            log::info!(
                "Loaded scores: streak {} high score {}",
                self.scores.streak,
                self.scores.high_score
            );
            self.start_round();
        }
        self.scores
    }

    fn start_round(&mut self) {
        let pick = select_round(&self.bank, self.scores.streak, &mut self.rng);
        info_log!(
            "New round: category '{}' ({} tier)",
            pick.category,
            Difficulty::for_streak(self.scores.streak)
        );
        self.round = Some(RoundState::new(pick));
        self.phase = Phase::Active;
    }

    /// Starts the next round after a win or loss. Returns false in any other
    /// phase.
    pub fn next_round(&mut self) -> bool {
        match self.phase {
            Phase::RoundWon | Phase::RoundLost => {
                self.start_round();
                true
            }
            Phase::Loading | Phase::Active => {
                debug_log!("next_round() ignored in {:?}", self.phase);
                false
            }
        }
    }

    pub fn guess(&mut self, input: char) -> Result<GuessOutcome, HangmanError> {
        let key = normalize_key(input).ok_or(HangmanError::InvalidGuess(input))?;
        if self.phase != Phase::Active {
            return Ok(GuessOutcome::Ignored);
        }
        let Some(round) = self.round.as_mut() else {
            return Ok(GuessOutcome::Ignored);
        };

        let Some(hit) = round.record(key) else {
            debug_log!("Repeated guess '{}'", key);
            return Ok(GuessOutcome::Repeated);
        };

        if round.is_lost() {
            let solution = round.entry.word.clone();
            self.finish_lost();
            return Ok(GuessOutcome::RoundLost { solution });
        }
        if round.is_won() {
            let new_high_score = self.finish_won();
            return Ok(GuessOutcome::RoundWon {
                streak: self.scores.streak,
                high_score: self.scores.high_score,
                new_high_score,
            });
        }

        if hit {
            Ok(GuessOutcome::Correct)
        } else {
            Ok(GuessOutcome::Wrong {
                remaining: MAX_WRONG_GUESSES - round.wrong_guesses,
            })
        }
    }

    fn finish_lost(&mut self) {
        self.phase = Phase::RoundLost;
        log::info!("Round lost; streak was {}", self.scores.streak);
        self.scores.record_loss();
        if let Err(e) = save_streak(&mut self.store, self.scores.streak) {
            log::warn!("Failed to save streak: {e}");
        }
    }

    fn finish_won(&mut self) -> bool {
        self.phase = Phase::RoundWon;
        let new_high_score = self.scores.record_win();
        log::info!("Round won; streak now {}", self.scores.streak);
        if new_high_score {
            if let Err(e) = save_high_score(&mut self.store, self.scores.high_score) {
                log::warn!("Failed to save high score: {e}");
            }
        }
        if let Err(e) = save_streak(&mut self.store, self.scores.streak) {
            log::warn!("Failed to save streak: {e}");
        }
        new_high_score
    }

    /// `None` while loading.
    pub fn snapshot(&self) -> Option<Snapshot> {
        let round = self.round.as_ref()?;
        let result = match self.phase {
            Phase::RoundWon => Some(RoundResult::Won),
            Phase::RoundLost => Some(RoundResult::Lost),
            Phase::Loading | Phase::Active => None,
        };
        Some(Snapshot {
            category: round.category.clone(),
            hint: round.entry.hint.clone(),
            masked_word: round.masked_word(),
            guesses: round.guess_order.clone(),
            wrong_guesses: round.wrong_guesses,
            max_wrong_guesses: MAX_WRONG_GUESSES,
            streak: self.scores.streak,
            high_score: self.scores.high_score,
            difficulty: Difficulty::for_streak(self.scores.streak),
            result,
            solution: (result == Some(RoundResult::Lost)).then(|| round.entry.word.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{HIGH_SCORE_KEY, MemoryStore, STREAK_KEY};
    use crate::wordbank::load_wordbank_from_str;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    struct ReadOnlyStore;

    impl ScoreStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, HangmanError> {
            Ok(Some("2".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), HangmanError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    fn single_word_session(word: &str, store: MemoryStore) -> GameSession<MemoryStore, Pcg64> {
        let bank = load_wordbank_from_str(&format!("test | {word} |\n")).unwrap();
        let mut session = GameSession::new(bank, store, Pcg64::seed_from_u64(1));
        session.load();
        session
    }

    fn stored(session: &GameSession<MemoryStore, Pcg64>, key: &str) -> Option<String> {
        session.store().get(key).unwrap()
    }

    #[test]
    fn test_starts_loading_without_snapshot() {
        let bank = load_wordbank_from_str("test | cat |\n").unwrap();
        let session = GameSession::new(bank, MemoryStore::new(), Pcg64::seed_from_u64(1));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_guess_while_loading_is_ignored() {
        let bank = load_wordbank_from_str("test | cat |\n").unwrap();
        let mut session = GameSession::new(bank, MemoryStore::new(), Pcg64::seed_from_u64(1));
        assert_eq!(session.guess('c').unwrap(), GuessOutcome::Ignored);
    }

    #[test]
    fn test_load_with_empty_storage() {
        let session = single_word_session("cat", MemoryStore::new());
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.scores(), SessionState::default());
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.masked_word, "___");
        assert_eq!(snapshot.category, "test");
        assert_eq!(snapshot.result, None);
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut session = single_word_session("cat", MemoryStore::new());
        session.guess('c').unwrap();
        session.load();
        assert_eq!(session.round().unwrap().guesses(), &['c']);
    }

    #[test]
    fn test_win_scenario() {
        let mut session = single_word_session("cat", MemoryStore::new());
        assert_eq!(session.guess('c').unwrap(), GuessOutcome::Correct);
        assert_eq!(session.guess('a').unwrap(), GuessOutcome::Correct);
        assert_eq!(
            session.guess('t').unwrap(),
            GuessOutcome::RoundWon {
                streak: 1,
                high_score: 1,
                new_high_score: true
            }
        );
        assert_eq!(session.phase(), Phase::RoundWon);
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.wrong_guesses, 0);
        assert_eq!(snapshot.masked_word, "cat");
        assert_eq!(snapshot.result, Some(RoundResult::Won));
        assert_eq!(snapshot.solution, None);
        assert_eq!(stored(&session, STREAK_KEY).as_deref(), Some("1"));
        assert_eq!(stored(&session, HIGH_SCORE_KEY).as_deref(), Some("1"));
    }

    #[test]
    fn test_loss_scenario() {
        let store = MemoryStore::with_values([(STREAK_KEY, "4"), (HIGH_SCORE_KEY, "4")]);
        let mut session = single_word_session("cat", store);
        for (i, key) in ['x', 'y', 'z', 'q', 'w'].into_iter().enumerate() {
            assert_eq!(
                session.guess(key).unwrap(),
                GuessOutcome::Wrong {
                    remaining: MAX_WRONG_GUESSES - 1 - i as u32
                }
            );
        }
        assert_eq!(
            session.guess('e').unwrap(),
            GuessOutcome::RoundLost {
                solution: "cat".to_string()
            }
        );
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.wrong_guesses, 6);
        assert_eq!(snapshot.result, Some(RoundResult::Lost));
        assert_eq!(snapshot.solution.as_deref(), Some("cat"));
        assert_eq!(session.scores().streak, 0);
        assert_eq!(session.scores().high_score, 4);
        assert_eq!(stored(&session, STREAK_KEY).as_deref(), Some("0"));
        assert_eq!(stored(&session, HIGH_SCORE_KEY).as_deref(), Some("4"));
    }

    #[test]
    fn test_repeated_guess_is_idempotent() {
        let mut session = single_word_session("cat", MemoryStore::new());
        assert!(matches!(session.guess('x').unwrap(), GuessOutcome::Wrong { .. }));
        let before = session.snapshot().unwrap();
        assert_eq!(session.guess('x').unwrap(), GuessOutcome::Repeated);
        assert_eq!(session.guess('X').unwrap(), GuessOutcome::Repeated);
        assert_eq!(session.snapshot().unwrap(), before);
        assert_eq!(before.wrong_guesses, 1);

        session.guess('c').unwrap();
        assert_eq!(session.guess('c').unwrap(), GuessOutcome::Repeated);
        assert_eq!(session.round().unwrap().guesses(), &['x', 'c']);
    }

    #[test]
    fn test_guesses_after_round_end_are_ignored() {
        let mut session = single_word_session("cat", MemoryStore::new());
        for key in ['x', 'y', 'z', 'q', 'w', 'e'] {
            session.guess(key).unwrap();
        }
        assert_eq!(session.guess('r').unwrap(), GuessOutcome::Ignored);
        assert_eq!(session.guess('c').unwrap(), GuessOutcome::Ignored);
        assert_eq!(session.snapshot().unwrap().wrong_guesses, MAX_WRONG_GUESSES);
    }

    #[test]
    fn test_invalid_guess_is_rejected() {
        let mut session = single_word_session("cat", MemoryStore::new());
        assert!(matches!(
            session.guess('!'),
            Err(HangmanError::InvalidGuess('!'))
        ));
        assert!(matches!(
            session.guess(' '),
            Err(HangmanError::InvalidGuess(' '))
        ));
        assert!(session.round().unwrap().guesses().is_empty());
    }

    #[test]
    fn test_uppercase_guess_is_normalised() {
        let mut session = single_word_session("cat", MemoryStore::new());
        assert_eq!(session.guess('C').unwrap(), GuessOutcome::Correct);
        assert!(session.round().unwrap().has_guessed('c'));
    }

    #[test]
    fn test_spaces_never_need_guessing() {
        let mut session = single_word_session("new zealand", MemoryStore::new());
        assert_eq!(session.snapshot().unwrap().masked_word, "___ _______");
        for key in ['n', 'e', 'w', 'z', 'a', 'l'] {
            session.guess(key).unwrap();
        }
        assert_eq!(session.snapshot().unwrap().masked_word, "new zealan_");
        assert!(matches!(
            session.guess('d').unwrap(),
            GuessOutcome::RoundWon { .. }
        ));
    }

    #[test]
    fn test_alt_keys_in_word() {
        let mut session = single_word_session("apollo 11", MemoryStore::new());
        for key in ['a', 'p', 'o', 'l'] {
            session.guess(key).unwrap();
        }
        assert_eq!(session.snapshot().unwrap().masked_word, "apollo __");
        assert!(matches!(
            session.guess('1').unwrap(),
            GuessOutcome::RoundWon { .. }
        ));
    }

    #[test]
    fn test_high_score_updates_past_previous_best() {
        let store = MemoryStore::with_values([(STREAK_KEY, "10"), (HIGH_SCORE_KEY, "5")]);
        let mut session = single_word_session("cat", store);
        assert_eq!(session.scores().high_score, 10);
        for key in ['c', 'a', 't'] {
            session.guess(key).unwrap();
        }
        assert_eq!(session.scores().streak, 11);
        assert_eq!(session.scores().high_score, 11);
        assert_eq!(stored(&session, HIGH_SCORE_KEY).as_deref(), Some("11"));
    }

    #[test]
    fn test_win_below_high_score_keeps_it() {
        let store = MemoryStore::with_values([(STREAK_KEY, "1"), (HIGH_SCORE_KEY, "9")]);
        let mut session = single_word_session("cat", store);
        for key in ['c', 'a'] {
            session.guess(key).unwrap();
        }
        assert_eq!(
            session.guess('t').unwrap(),
            GuessOutcome::RoundWon {
                streak: 2,
                high_score: 9,
                new_high_score: false
            }
        );
        assert_eq!(stored(&session, HIGH_SCORE_KEY).as_deref(), Some("9"));
    }

    #[test]
    fn test_next_round_resets_round_state() {
        let mut session = single_word_session("cat", MemoryStore::new());
        assert!(!session.next_round());
        session.guess('z').unwrap();
        for key in ['c', 'a', 't'] {
            session.guess(key).unwrap();
        }
        assert!(session.next_round());
        assert_eq!(session.phase(), Phase::Active);
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.wrong_guesses, 0);
        assert!(snapshot.guesses.is_empty());
        assert_eq!(snapshot.streak, 1);
        assert!(!session.next_round());
    }

    #[test]
    fn test_streak_carries_across_rounds() {
        let mut session = single_word_session("cat", MemoryStore::new());
        for _ in 0..3 {
            for key in ['c', 'a', 't'] {
                session.guess(key).unwrap();
            }
            session.next_round();
        }
        assert_eq!(session.scores().streak, 3);
        for key in ['x', 'y', 'z', 'q', 'w', 'e'] {
            session.guess(key).unwrap();
        }
        assert_eq!(session.scores(), SessionState { streak: 0, high_score: 3 });
    }

    #[test]
    fn test_write_failures_do_not_stop_play() {
        let bank = load_wordbank_from_str("test | cat |\n").unwrap();
        let mut session = GameSession::new(bank, ReadOnlyStore, Pcg64::seed_from_u64(1));
        session.load();
        assert_eq!(session.scores().streak, 2);
        for key in ['c', 'a', 't'] {
            session.guess(key).unwrap();
        }
        assert_eq!(session.phase(), Phase::RoundWon);
        assert_eq!(session.scores(), SessionState { streak: 3, high_score: 3 });
        assert!(session.next_round());
    }

    #[test]
    fn test_snapshot_progress() {
        let mut session = single_word_session("cat", MemoryStore::new());
        assert_eq!(session.snapshot().unwrap().progress(), 0.0);
        for key in ['x', 'y', 'z'] {
            session.guess(key).unwrap();
        }
        assert!((session.snapshot().unwrap().progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_win_and_loss() {
        let mut scores = SessionState { streak: 2, high_score: 2 };
        assert!(scores.record_win());
        assert_eq!(scores, SessionState { streak: 3, high_score: 3 });
        scores.record_loss();
        assert!(!scores.record_win());
        assert_eq!(scores, SessionState { streak: 1, high_score: 3 });
    }
}
