use crate::config::{DEFAULT_LOADING_DELAY_MS, DEFAULT_RESET_DELAY_MS};
use crate::game_state::{GameInterface, UserAction};
use crate::session::{RoundResult, Snapshot};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Guess the hidden word one letter at a time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a word bank file (`category | word | hint` lines, or .json)
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Where to keep the streak and high score
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep scores in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Seed for word selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Line-oriented interface instead of the full-screen one
    #[arg(long)]
    pub plain: bool,

    /// Pause after a round ends, in milliseconds
    #[arg(long, default_value_t = DEFAULT_RESET_DELAY_MS)]
    pub reset_delay_ms: u64,

    /// Pause before the first word, in milliseconds
    #[arg(long, default_value_t = DEFAULT_LOADING_DELAY_MS)]
    pub loading_delay_ms: u64,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub enum GuessInput {
    Valid(char),
    Invalid,
    Exit,
}

const WRONG_BAR_WIDTH: usize = 6;

fn parse_guess(input: &str) -> GuessInput {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "exit" | "quit" => GuessInput::Exit,
        _ => {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => GuessInput::Valid(c),
                _ => GuessInput::Invalid,
            }
        }
    }
}

/// `c _ t  _ _` style rendering: keys separated by spaces, word gaps widened.
pub fn spaced_word(masked: &str) -> String {
    masked
        .split(' ')
        .map(|word| {
            word.chars()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("   ")
}

pub fn wrong_guess_bar(snapshot: &Snapshot) -> String {
    let filled = (snapshot.progress() * WRONG_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(WRONG_BAR_WIDTH - filled),
        snapshot.wrong_guesses,
        snapshot.max_wrong_guesses
    )
}

/// Line-oriented implementation of `GameInterface` over any reader/writer.
pub struct CliInterface<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead> CliInterface<R, std::io::Stdout> {
    pub fn new(reader: R) -> Self {
        Self::with_writer(reader, std::io::stdout())
    }
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn with_writer(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    // Output errors are not actionable mid-game.
    fn say(&mut self, text: &str) {
        let _ = writeln!(self.writer, "{text}");
    }

    fn read_guess(&mut self) -> GuessInput {
        self.say("\nGuess a key (or 'exit' to quit):");
        let _ = self.writer.flush();
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) | Err(_) => GuessInput::Exit,
            Ok(_) => match parse_guess(&input) {
                GuessInput::Invalid => {
                    self.say("Please enter exactly one key.");
                    GuessInput::Invalid
                }
                other => other,
            },
        }
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn display_loading(&mut self) {
        self.say("Loading scores...");
    }

    fn display_round(&mut self, snapshot: &Snapshot) {
        self.say(&format!(
            "\n{} ({})    streak {} | high score {}",
            snapshot.category.to_uppercase(),
            snapshot.difficulty,
            snapshot.streak,
            snapshot.high_score
        ));
        if !snapshot.hint.is_empty() {
            self.say(&format!("hint: {}", snapshot.hint));
        }
        self.say(&format!("  {}", spaced_word(&snapshot.masked_word)));
        self.say(&format!("wrong: {}", wrong_guess_bar(snapshot)));
        if !snapshot.guesses.is_empty() {
            let guessed: String = snapshot.guesses.iter().collect();
            self.say(&format!("guessed: {guessed}"));
        }
    }

    fn read_action(&mut self) -> Option<UserAction> {
        match self.read_guess() {
            GuessInput::Valid(c) => Some(UserAction::Guess(c)),
            GuessInput::Exit => Some(UserAction::Exit),
            GuessInput::Invalid => None,
        }
    }

    fn display_invalid_guess(&mut self, input: char) {
        self.say(&format!("'{input}' is not on the keyboard."));
    }

    fn display_repeated_guess(&mut self, key: char) {
        self.say(&format!("You already guessed '{key}'."));
    }

    fn celebrate(&mut self, _snapshot: &Snapshot) {
        self.say("* * * * * * * * * *");
    }

    fn display_round_won(&mut self, snapshot: &Snapshot) {
        debug_assert_eq!(snapshot.result, Some(RoundResult::Won));
        self.say(&format!("  {}", spaced_word(&snapshot.masked_word)));
        self.say(&format!("Great Job! Streak: {}", snapshot.streak));
    }

    fn display_round_lost(&mut self, snapshot: &Snapshot, solution: &str) {
        self.say(&format!("wrong: {}", wrong_guess_bar(snapshot)));
        self.say(&format!("Nice try! The word was: {solution}"));
    }

    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            let _ = self.writer.flush();
            std::thread::sleep(delay);
        }
    }

    fn display_exit_message(&mut self) {
        self.say("Exiting.");
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Difficulty;
    use std::io::Cursor;

    fn snapshot(masked: &str, wrong: u32) -> Snapshot {
        Snapshot {
            category: "animals".to_string(),
            hint: String::new(),
            masked_word: masked.to_string(),
            guesses: vec!['c'],
            wrong_guesses: wrong,
            max_wrong_guesses: 6,
            streak: 2,
            high_score: 5,
            difficulty: Difficulty::Easy,
            result: None,
            solution: None,
        }
    }

    fn output(interface: CliInterface<Cursor<&str>, Vec<u8>>) -> String {
        String::from_utf8(interface.into_writer()).unwrap()
    }

    #[test]
    fn test_parse_cli_with_path() {
        let cli = Cli::parse_from(["word-hangman", "-i", "custom.txt"]);
        assert_eq!(cli.wordbank_path, Some(PathBuf::from("custom.txt")));
        assert!(!cli.plain);
    }

    #[test]
    fn test_parse_guess() {
        assert!(matches!(parse_guess("c\n"), GuessInput::Valid('c')));
        assert!(matches!(parse_guess("  Q  "), GuessInput::Valid('q')));
        assert!(matches!(parse_guess("'"), GuessInput::Valid('\'')));
        assert!(matches!(parse_guess("EXIT"), GuessInput::Exit));
        assert!(matches!(parse_guess("quit"), GuessInput::Exit));
        assert!(matches!(parse_guess("ab"), GuessInput::Invalid));
        assert!(matches!(parse_guess("   "), GuessInput::Invalid));
    }

    #[test]
    fn test_read_action_sequence() {
        let mut interface = CliInterface::with_writer(Cursor::new("a\nxy\nexit\n"), Vec::new());
        assert_eq!(interface.read_action(), Some(UserAction::Guess('a')));
        assert_eq!(interface.read_action(), None);
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
        assert!(output(interface).contains("Please enter exactly one key."));
    }

    #[test]
    fn test_read_action_eof_exits() {
        let mut interface = CliInterface::with_writer(Cursor::new(""), Vec::new());
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_spaced_word() {
        assert_eq!(spaced_word("c_t"), "c _ t");
        assert_eq!(spaced_word("new ___"), "n e w   _ _ _");
        assert_eq!(spaced_word(""), "");
    }

    #[test]
    fn test_wrong_guess_bar() {
        assert_eq!(wrong_guess_bar(&snapshot("___", 0)), "[------] 0/6");
        assert_eq!(wrong_guess_bar(&snapshot("___", 2)), "[##----] 2/6");
        assert_eq!(wrong_guess_bar(&snapshot("___", 6)), "[######] 6/6");
    }

    #[test]
    fn test_display_round_shows_scores_and_hint() {
        let mut interface = CliInterface::with_writer(Cursor::new(""), Vec::new());
        let mut snap = snapshot("c__", 1);
        snap.hint = "purrs".to_string();
        interface.display_round(&snap);
        let text = output(interface);
        assert!(text.contains("ANIMALS (easy)    streak 2 | high score 5"));
        assert!(text.contains("hint: purrs"));
        assert!(text.contains("c _ _"));
        assert!(text.contains("guessed: c"));
    }

    #[test]
    fn test_display_round_lost_reveals_solution() {
        let mut interface = CliInterface::with_writer(Cursor::new(""), Vec::new());
        let mut snap = snapshot("c__", 6);
        snap.result = Some(RoundResult::Lost);
        interface.display_round_lost(&snap, "cat");
        assert!(output(interface).contains("Nice try! The word was: cat"));
    }
}
