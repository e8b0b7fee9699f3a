use crate::config::GameConfig;
use crate::error::HangmanError;
use crate::session::{GameSession, GuessOutcome, SessionState, Snapshot};
use crate::storage::ScoreStore;
use crate::{debug_log, info_log};
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Guess(char),
    Exit,
}

/// Presentation side of the game. The game loop calls into this after every
/// state change; implementations own all rendering and effects.
pub trait GameInterface {
    fn display_loading(&mut self);
    fn display_round(&mut self, snapshot: &Snapshot);
    /// `None` means nothing actionable was entered.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_invalid_guess(&mut self, input: char);
    fn display_repeated_guess(&mut self, key: char);
    /// One-shot celebratory effect, called exactly once per won round.
    fn celebrate(&mut self, snapshot: &Snapshot);
    fn display_round_won(&mut self, snapshot: &Snapshot);
    fn display_round_lost(&mut self, snapshot: &Snapshot, solution: &str);
    /// Cosmetic pause between states.
    fn pause(&mut self, delay: Duration);
    fn display_exit_message(&mut self);
}

/// Plays rounds until the interface asks to exit. Returns the final scores.
pub fn game_loop<S, R, I>(
    session: &mut GameSession<S, R>,
    interface: &mut I,
    config: &GameConfig,
) -> SessionState
where
    S: ScoreStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    interface.display_loading();
    session.load();
    interface.pause(config.loading_delay);
    show_round(session, interface);

    loop {
        let key = match interface.read_action() {
            Some(UserAction::Guess(key)) => key,
            Some(UserAction::Exit) => {
                info_log!("game_loop() - Exit requested");
                interface.display_exit_message();
                return session.scores();
            }
            None => continue,
        };

        match session.guess(key) {
            Err(HangmanError::InvalidGuess(input)) => interface.display_invalid_guess(input),
            Err(_e) => {
                debug_log!("game_loop() - Unexpected guess error: {}", _e);
            }
            Ok(GuessOutcome::Ignored) => {}
            Ok(GuessOutcome::Repeated) => interface.display_repeated_guess(key),
            Ok(GuessOutcome::Correct | GuessOutcome::Wrong { .. }) => {
                show_round(session, interface);
            }
            Ok(GuessOutcome::RoundWon { .. }) => {
                if let Some(snapshot) = session.snapshot() {
                    interface.celebrate(&snapshot);
                    interface.display_round_won(&snapshot);
                }
                finish_round(session, interface, config);
            }
            Ok(GuessOutcome::RoundLost { solution }) => {
                if let Some(snapshot) = session.snapshot() {
                    interface.display_round_lost(&snapshot, &solution);
                }
                finish_round(session, interface, config);
            }
        }
    }
}

fn show_round<S, R, I>(session: &GameSession<S, R>, interface: &mut I)
where
    S: ScoreStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    if let Some(snapshot) = session.snapshot() {
        interface.display_round(&snapshot);
    }
}

fn finish_round<S, R, I>(session: &mut GameSession<S, R>, interface: &mut I, config: &GameConfig)
where
    S: ScoreStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    interface.pause(config.reset_delay);
    session.next_round();
    show_round(session, interface);
}
