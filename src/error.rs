use thiserror::Error;

#[derive(Error, Debug)]
pub enum HangmanError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Could not replace score file: {source}")]
    Persist {
        #[from]
        source: tempfile::PersistError,
    },
    #[error("Could not install logger: {source}")]
    Logger {
        #[from]
        source: log::SetLoggerError,
    },
    #[error("The word bank has no usable entries")]
    EmptyWordBank,
    #[error("'{0}' is not a guessable key")]
    InvalidGuess(char),
}
