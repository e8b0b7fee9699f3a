// Library interface for word-hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod config;
pub mod error;
pub mod game_state;
pub mod keyboard;
pub mod logging;
pub mod selector;
pub mod session;
pub mod storage;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use config::GameConfig;
pub use error::HangmanError;
pub use game_state::{GameInterface, UserAction, game_loop};
pub use session::{GameSession, GuessOutcome, Phase, SessionState, Snapshot};
pub use storage::{FileStore, MemoryStore, ScoreStore};
pub use wordbank::{WordBank, load_wordbank_from_file, load_wordbank_from_str};
