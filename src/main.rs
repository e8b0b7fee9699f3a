use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::io;
use std::process::ExitCode;
use word_hangman::cli::{CliInterface, parse_cli};
use word_hangman::logging::init_logging;
use word_hangman::tui::TuiInterface;
use word_hangman::{
    FileStore, GameConfig, GameInterface, GameSession, MemoryStore, ScoreStore, WordBank,
    game_loop, info_log, load_wordbank_from_file,
};

fn main() -> ExitCode {
    let cli = parse_cli();
    let config = GameConfig::from_cli(&cli);

    if let Err(e) = init_logging(&config.log_target()) {
        eprintln!("Failed to set up logging: {e}");
        if let Err(e) = init_logging(&config.fallback_log_target()) {
            eprintln!("Continuing without logs: {e}");
        }
    }

    let bank = match &config.wordbank_path {
        Some(path) => load_wordbank_from_file(path),
        None => WordBank::embedded(),
    };
    let bank = match bank {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("Failed to load word bank: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Loaded {} words in {} categories",
        bank.len(),
        bank.list_categories().len()
    );

    let seed = config.seed.unwrap_or_else(rand::random);
    info_log!("Word selection seed: {}", seed);
    let rng = Pcg64::seed_from_u64(seed);

    let mut store: Box<dyn ScoreStore> = match config.store.resolve() {
        Some(path) => {
            log::info!("Keeping scores in {}", path.display());
            Box::new(FileStore::new(path))
        }
        None => {
            log::info!("Keeping scores in memory");
            Box::new(MemoryStore::new())
        }
    };
    let mut session = GameSession::new(bank, store.as_mut(), rng);

    let stdin = io::stdin();
    let mut interface: Box<dyn GameInterface> = if config.plain {
        Box::new(CliInterface::new(stdin.lock()))
    } else {
        match TuiInterface::new() {
            Ok(tui) => Box::new(tui),
            Err(e) => {
                log::warn!("Falling back to plain mode, terminal setup failed: {e}");
                Box::new(CliInterface::new(stdin.lock()))
            }
        }
    };

    let scores = game_loop(&mut session, interface.as_mut(), &config);
    // Restore the terminal before printing anything else.
    drop(interface);
    log::info!(
        "Session over: streak {}, high score {}",
        scores.streak,
        scores.high_score
    );
    ExitCode::SUCCESS
}
