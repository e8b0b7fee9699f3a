//! TUI (Terminal User Interface) for the hangman game
//!
//! This module provides a full-screen terminal interface using Ratatui.
//!
//! # Layout
//! Streak and high score header, the category and hint, the masked word, a
//! gauge of wrong guesses, the on-screen keyboard, then message and
//! instruction lines. Confetti is drawn over everything after a win.
//!
//! # State Machine
//! - `Loading` → `Guessing` → `RoundWon` | `RoundLost` → back to `Guessing`
//! - `Esc` from any state exits

use crate::game_state::{GameInterface, UserAction};
use crate::keyboard;
use crate::session::{HIDDEN_KEY, RoundResult, Snapshot};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::io;
use std::time::{Duration, Instant};

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const FRAME_MS: u64 = 50;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const CONFETTI_COUNT: usize = 200;
const CONFETTI_GRAVITY: f32 = 0.08;
const CONFETTI_GLYPHS: [char; 6] = ['*', '+', 'o', '.', '~', '\''];
const CONFETTI_COLORS: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::LightBlue,
];

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const HINT_STYLE: Style = Style::new().fg(Color::Gray).add_modifier(Modifier::ITALIC);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_STYLE: Style = Style::new().fg(Color::Black).bg(Color::White);
const KEY_HIT_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Green);
const KEY_MISS_STYLE: Style = Style::new().fg(Color::DarkGray).bg(Color::Black);
const TILE_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
const MISSED_TILE_STYLE: Style = Style::new().fg(Color::Red).bg(Color::DarkGray);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    Loading,
    Guessing,
    RoundWon,
    RoundLost,
    Exiting,
}

#[derive(Debug, Clone, Copy)]
struct Confetti {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    glyph: char,
    color: Color,
}

impl Confetti {
    /// Bursts from just off the top-left corner.
    fn launch<R: Rng + ?Sized>(rng: &mut R, area: Rect) -> Self {
        let width = f32::from(area.width.max(1));
        Self {
            x: -1.0,
            y: 0.0,
            vx: rng.random_range(0.3..1.0) * width / 25.0,
            vy: rng.random_range(-1.2..0.4),
            glyph: CONFETTI_GLYPHS[rng.random_range(0..CONFETTI_GLYPHS.len())],
            color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
        }
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= 0.96;
        self.vy += CONFETTI_GRAVITY;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cell(&self, area: Rect) -> Option<(u16, u16)> {
        if self.x < 0.0 || self.y < 0.0 {
            return None;
        }
        let (x, y) = (self.x as u16, self.y as u16);
        (x < area.width && y < area.height).then_some((area.x + x, area.y + y))
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    snapshot: Option<&'a Snapshot>,
    state: TuiState,
    confetti: &'a [Confetti],
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and the celebration effect.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    snapshot: Option<Snapshot>,
    state: TuiState,
    confetti: Vec<Confetti>,
    message: String,
    error_message: String,
    status: String,
    exit_requested: bool,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            snapshot: None,
            state: TuiState::Loading,
            confetti: Vec::new(),
            message: String::new(),
            error_message: String::new(),
            status: "Starting".to_string(),
            exit_requested: false,
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            snapshot: self.snapshot.as_ref(),
            state: self.state,
            confetti: &self.confetti,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title, streak, high score
                Constraint::Length(4), // Category and hint
                Constraint::Length(3), // Word
                Constraint::Length(3), // Wrong guesses
                Constraint::Length(6), // Keyboard
                Constraint::Min(3),    // Messages
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_header(f, chunks[0], ctx.snapshot);
        Self::render_category(f, chunks[1], ctx.snapshot, ctx.state);
        Self::render_word(f, chunks[2], ctx.snapshot);
        Self::render_gauge(f, chunks[3], ctx.snapshot, ctx.state);
        Self::render_keyboard(f, chunks[4], ctx.snapshot);
        Self::render_messages(f, chunks[5], ctx);
        Self::render_instructions(f, chunks[6], ctx.state);
        Self::render_confetti(f, ctx.confetti);
    }

    fn render_header(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(area);

        let (streak, high_score) = snapshot.map_or((String::from("-"), String::from("-")), |s| {
            (s.streak.to_string(), s.high_score.to_string())
        });

        let streak = Paragraph::new(streak)
            .style(SUCCESS_STYLE)
            .block(Block::default().title("streak").borders(Borders::ALL));
        let title = Paragraph::new("WORD HANGMAN")
            .style(HEADER_STYLE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        let high_score = Paragraph::new(high_score)
            .style(SUCCESS_STYLE)
            .alignment(Alignment::Right)
            .block(Block::default().title("highscore").borders(Borders::ALL));

        f.render_widget(streak, columns[0]);
        f.render_widget(title, columns[1]);
        f.render_widget(high_score, columns[2]);
    }

    fn render_category(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, state: TuiState) {
        let lines = match snapshot {
            Some(s) if state != TuiState::Loading => vec![
                Line::from(Span::styled(capitalize(&s.category), HEADER_STYLE)),
                Line::from(Span::styled(s.hint.clone(), HINT_STYLE)),
            ],
            _ => vec![Line::from("Loading...")],
        };
        let title = snapshot.map_or(String::from("Category"), |s| {
            format!("Category ({})", s.difficulty)
        });
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_word(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
        let mut spans = Vec::new();
        if let Some(s) = snapshot {
            let solution: Vec<char> = s
                .solution
                .as_deref()
                .map(|w| w.chars().collect())
                .unwrap_or_default();
            for (i, c) in s.masked_word.chars().enumerate() {
                if c.is_whitespace() {
                    spans.push(Span::raw("   "));
                    continue;
                }
                let span = match solution.get(i) {
                    Some(&missed) if c == HIDDEN_KEY => Span::styled(
                        format!(" {} ", missed.to_ascii_uppercase()),
                        MISSED_TILE_STYLE,
                    ),
                    _ if c == HIDDEN_KEY => Span::styled("   ", TILE_STYLE),
                    _ => Span::styled(format!(" {} ", c.to_ascii_uppercase()), TILE_STYLE),
                };
                spans.push(span);
                spans.push(Span::raw(" "));
            }
        }
        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().title("Word").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_gauge(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, state: TuiState) {
        let (ratio, label) = match snapshot {
            Some(s) if state != TuiState::Loading => (
                s.progress(),
                format!("{}/{} wrong", s.wrong_guesses, s.max_wrong_guesses),
            ),
            _ => (0.0, String::from("...")),
        };
        let gauge = Gauge::default()
            .block(Block::default().title("Wrong guesses").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Red).bg(Color::Black))
            .ratio(ratio)
            .label(label);
        f.render_widget(gauge, area);
    }

    fn render_keyboard(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
        let lines: Vec<Line> = keyboard::rows()
            .map(|row| {
                let mut spans = Vec::new();
                for key in row.chars() {
                    let style = match snapshot {
                        Some(s) if s.has_guessed(key) && s.masked_word.contains(key) => {
                            KEY_HIT_STYLE
                        }
                        Some(s) if s.has_guessed(key) => KEY_MISS_STYLE,
                        _ => KEY_STYLE,
                    };
                    spans.push(Span::styled(format!(" {key} "), style));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Keyboard").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_messages(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();
        if !ctx.message.is_empty() {
            let style = match ctx.state {
                TuiState::RoundWon => SUCCESS_STYLE,
                TuiState::RoundLost => ERROR_STYLE,
                _ => MESSAGE_STYLE,
            };
            lines.push(Line::from(Span::styled(ctx.message, style)));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(ctx.error_message, ERROR_STYLE)));
        }
        let status = if ctx.status.is_empty() { "Ready" } else { ctx.status };
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title(status).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Loading => "Loading your scores...",
            TuiState::Guessing => "Type a key to guess | ESC: Quit",
            TuiState::RoundWon | TuiState::RoundLost => "Next word coming up... | ESC: Quit",
            TuiState::Exiting => "Goodbye!",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_confetti(f: &mut Frame, confetti: &[Confetti]) {
        let area = f.area();
        let buffer = f.buffer_mut();
        for piece in confetti {
            let Some(position) = piece.cell(area) else {
                continue;
            };
            if let Some(cell) = buffer.cell_mut(position) {
                cell.set_char(piece.glyph).set_fg(piece.color);
            }
        }
    }

    fn launch_confetti(&mut self) {
        let area = match self.terminal.size() {
            Ok(size) => Rect::new(0, 0, size.width, size.height),
            Err(_) => Rect::new(0, 0, 80, 24),
        };
        let mut rng = rand::rng();
        self.confetti = (0..CONFETTI_COUNT)
            .map(|_| Confetti::launch(&mut rng, area))
            .collect();
    }

    fn step_confetti(&mut self) {
        for piece in &mut self.confetti {
            piece.step();
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    /// Waits up to `timeout` for one key press and maps it to an action.
    fn handle_input(&mut self, timeout: Duration) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            debug_log!("handle_input() - Ignoring non-key event");
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            info_log!("handle_input() - Exit key pressed");
            return Ok(Some(UserAction::Exit));
        }

        match key.code {
            KeyCode::Char(c)
                if c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD =>
            {
                debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
                Ok(None)
            }
            KeyCode::Char(_) if Self::has_modifier_keys(&key) => {
                debug_log!("handle_input() - Ignoring key with modifier: {:?}", key.modifiers);
                Ok(None)
            }
            KeyCode::Char(c) if self.state == TuiState::Guessing => {
                self.error_message.clear();
                Ok(Some(UserAction::Guess(c)))
            }
            _ => {
                debug_log!("handle_input() - Ignoring key: {:?}", key.code);
                Ok(None)
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl GameInterface for TuiInterface {
    fn display_loading(&mut self) {
        self.state = TuiState::Loading;
        self.status = "Loading".to_string();
        self.draw_or_log();
    }

    fn display_round(&mut self, snapshot: &Snapshot) {
        if snapshot.result.is_none() && self.state != TuiState::Guessing {
            // A fresh round: clear the previous round's effects.
            self.confetti.clear();
            self.message.clear();
            self.error_message.clear();
        }
        self.state = match snapshot.result {
            None => TuiState::Guessing,
            Some(RoundResult::Won) => TuiState::RoundWon,
            Some(RoundResult::Lost) => TuiState::RoundLost,
        };
        self.status = format!(
            "{} left",
            snapshot.max_wrong_guesses - snapshot.wrong_guesses.min(snapshot.max_wrong_guesses)
        );
        self.snapshot = Some(snapshot.clone());
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        if self.exit_requested {
            return Some(UserAction::Exit);
        }
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input(Duration::from_millis(EVENT_POLL_TIMEOUT_MS)) {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(_e) => {
                    info_log!("read_action() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_invalid_guess(&mut self, input: char) {
        self.error_message = format!("'{input}' is not on the keyboard");
        self.draw_or_log();
    }

    fn display_repeated_guess(&mut self, key: char) {
        self.error_message = format!("Already guessed '{key}'");
        self.draw_or_log();
    }

    fn celebrate(&mut self, _snapshot: &Snapshot) {
        self.launch_confetti();
    }

    fn display_round_won(&mut self, snapshot: &Snapshot) {
        self.message = "Great Job!".to_string();
        self.display_round(snapshot);
    }

    fn display_round_lost(&mut self, snapshot: &Snapshot, solution: &str) {
        self.message = format!("Nice try! The word was: {solution}");
        self.display_round(snapshot);
    }

    /// Animates until `delay` has passed. Esc during the pause exits at the
    /// next read.
    fn pause(&mut self, delay: Duration) {
        let deadline = Instant::now() + delay;
        let frame = Duration::from_millis(FRAME_MS);
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.step_confetti();
            self.draw_or_log();
            if let Ok(Some(UserAction::Exit)) = self.handle_input(frame.min(deadline - now)) {
                self.exit_requested = true;
                break;
            }
        }
    }

    fn display_exit_message(&mut self) {
        self.state = TuiState::Exiting;
        self.message = "Exiting...".to_string();
        self.status = "Exiting application".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
