mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use sky_shooter::compute::{
    advance, continue_after_win, drain_cues, end_run, fire_weapon, init_state, initialize_run,
    rescale, start_run,
};
use sky_shooter::config::GameConfig;
use sky_shooter::entities::{Cue, GameStatus, Input, RunState};
use sky_shooter::highscore::{FileStore, HighScoreStore};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Largest logical play field, in canvas pixels.
const MAX_CANVAS: f32 = 500.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Square play field that fits the terminal, assuming cells roughly twice as
/// tall as they are wide.
fn canvas_size(cols: u16, rows: u16) -> f32 {
    let by_cols = cols.saturating_sub(2) as f32 * 6.0;
    let by_rows = rows.saturating_sub(4) as f32 * 12.0;
    by_cols.min(by_rows).clamp(100.0, MAX_CANVAS)
}

// ── Logging & config ──────────────────────────────────────────────────────────

/// The terminal is in raw mode while playing, so log lines go to a file.
fn init_logging() {
    let path = std::env::temp_dir().join("sky_shooter.log");
    let Ok(file) = std::fs::File::create(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn load_config() -> std::io::Result<GameConfig> {
    match std::env::var("SKY_SHOOTER_CONFIG") {
        Ok(path) => GameConfig::load(&path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        Err(_) => Ok(GameConfig::default()),
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Sound playback is outside this program; cues are logged, and a player hit
/// rings the terminal bell.
fn play_cues<W: Write>(out: &mut W, cues: Vec<Cue>) -> std::io::Result<()> {
    for cue in cues {
        log::debug!("cue {cue:?}");
        if cue == Cue::PlayerHit {
            out.queue(Print("\x07"))?;
        }
    }
    Ok(())
}

// ── High score ────────────────────────────────────────────────────────────────

struct Scores {
    store: FileStore,
    saved: u32,
}

impl Scores {
    fn open() -> Self {
        let store = FileStore::in_home();
        let saved = store.load().unwrap_or_else(|e| {
            log::warn!("could not read high score: {e}");
            0
        });
        Scores { store, saved }
    }

    /// Persist the run's high score once it beats the stored one.
    fn sync(&mut self, state: &RunState) {
        if state.high_score <= self.saved {
            return;
        }
        match self.store.save(state.high_score) {
            Ok(()) => self.saved = state.high_score,
            Err(e) => log::warn!("could not save high score: {e}"),
        }
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SKY  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let hs_str = format!("High Score: {}", high_score);
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hs_str.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&hs_str))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("[ENTER] Start    [Q] Quit"))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups (catch falling items):"))?;

    let bonus_info: &[(&str, Color, &str)] = &[
        ("◈", Color::Blue, " Shield    : absorbs one hit"),
        ("!", Color::Cyan, " RapidFire : fast shots for 10s"),
        ("★", Color::Red, " Boss Gun  : 5x damage, boss fights only"),
    ];
    for (i, (sym, color, desc)) in bonus_info.iter().enumerate() {
        let row = cy + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit); // input thread gone
        };
        let Event::Key(KeyEvent { code, kind, .. }) = ev else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key. Each frame the keys that are still fresh are turned
/// into an `Input` and a fire request, so moving and shooting combine freely.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut RunState,
    scores: &mut Scores,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let (mut cols, mut rows) = terminal::size()?;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Resize(c, r) => {
                    cols = c;
                    rows = r;
                    let size = canvas_size(cols, rows);
                    *state = rescale(state, size, size);
                }
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                *state = end_run(state);
                                scores.sync(state);
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                *state = end_run(state);
                                scores.sync(state);
                                return Ok(true);
                            }
                            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter
                                if state.status == GameStatus::Won =>
                            {
                                *state = continue_after_win(state);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if matches!(state.status, GameStatus::GameOver | GameStatus::Ready) =>
                            {
                                *state = start_run(&initialize_run(state));
                            }
                            KeyCode::Char('m') | KeyCode::Char('M')
                                if matches!(state.status, GameStatus::GameOver | GameStatus::Ready) =>
                            {
                                return Ok(false);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                _ => {}
            }
        }

        // ── Draw, then step ───────────────────────────────────────────────────
        display::render(out, state, cols, rows)?;

        if state.is_active() {
            let input = Input {
                left: any_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
                right: any_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
                up: any_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
                down: any_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
            };
            if is_held(&key_frame, &KeyCode::Char(' '), frame) {
                *state = fire_weapon(state);
            }
            *state = advance(state, &input, FRAME.as_millis() as u64, &mut rng);
        }

        play_cues(out, drain_cues(state))?;
        scores.sync(state);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let config = load_config()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
) -> std::io::Result<()> {
    let mut scores = Scores::open();

    loop {
        match show_menu(out, rx, scores.saved)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let (cols, rows) = terminal::size()?;
                let size = canvas_size(cols, rows);
                let ready = init_state(size, size, scores.saved, config.clone());
                let mut state = start_run(&ready);
                if game_loop(out, &mut state, &mut scores, rx)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
