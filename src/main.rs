mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use space_impact::compute::{init_state, reset, tick};
use space_impact::entities::{GameStatus, InputSnapshot};
use space_impact::spawner::{spawn_enemy, Spawner};
use space_impact::store::{open_store, StoreWorker};
use space_impact::{Config, Scoreboard};

use display::Viewport;

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so at 60 FPS a window of 8 frames
/// (≈133 ms) is always refreshed before expiry.
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

/// How long quitting waits for a pending score submission.
const STORE_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Command {
    Quit,
    Reset,
}

/// Apply one key event to the held-key map.  Space fires once per press or
/// repeat, like a keyboard's own auto-fire.
fn handle_key(
    key_frame: &mut HashMap<KeyCode, u64>,
    key: KeyEvent,
    frame: u64,
    status: GameStatus,
    fire: &mut bool,
) -> Option<Command> {
    let KeyEvent {
        code,
        kind,
        modifiers,
        ..
    } = key;
    match kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            key_frame.insert(code, frame);
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Command::Quit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(Command::Quit);
                }
                KeyCode::Char('r') | KeyCode::Char('R') if status == GameStatus::Over => {
                    return Some(Command::Reset);
                }
                KeyCode::Char(' ') => *fire = true,
                _ => {}
            }
        }
        // Release: remove key immediately (keyboard-enhancement path)
        KeyEventKind::Release => {
            key_frame.remove(&code);
        }
    }
    None
}

/// Runs sessions back to back until the player quits.
///
/// Input model: a `key_frame` map records the frame of the last press or
/// repeat for every key; each frame the still-fresh keys become one
/// `InputSnapshot`.  Terminals with keyboard enhancement also send releases,
/// which drop keys immediately.
fn game_loop<W: Write>(
    out: &mut W,
    config: &Config,
    rx: &mpsc::Receiver<Event>,
    worker: &StoreWorker,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let frame_budget = config.frame_budget();

    let mut state = init_state(config.width, config.height);
    let mut board = Scoreboard::new();
    let mut spawner = Spawner::new(config.spawn_interval(), Instant::now());

    worker.fetch_high_score();
    worker.fetch_leaderboard();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut fire = false;
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(key) = ev else { continue };
            match handle_key(&mut key_frame, key, frame, state.status, &mut fire) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Reset) => {
                    state = reset(&state);
                    board.clear_final();
                    spawner.restart(frame_start);
                    key_frame.clear();
                    fire = false;
                    log::info!("session reset");
                }
                None => {}
            }
        }

        let input = InputSnapshot {
            left: any_held(&key_frame, &LEFT_KEYS, frame),
            right: any_held(&key_frame, &RIGHT_KEYS, frame),
            fire,
        };

        // ── Simulate ──────────────────────────────────────────────────────────
        if state.status == GameStatus::Running {
            for _ in 0..spawner.poll(frame_start) {
                state = spawn_enemy(&state, &mut rng);
            }
            let next = tick(&state, &input);
            board.observe_frame(&state, &next, worker);
            state = next;
        }

        for reply in worker.drain() {
            board.apply(reply);
        }

        // ── Draw ──────────────────────────────────────────────────────────────
        let (cols, rows) = terminal::size()?;
        display::render(out, &Viewport::new(cols, rows, &state), &state, &board)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    config.validate().map_err(anyhow::Error::msg)?;
    init_logging(&config.log_file)?;

    let backend = config.backend();
    log::info!("score store: {backend:?}");
    let store = open_store(&backend).context("failed to open score store")?;
    let worker = StoreWorker::spawn(store);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
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

    let result = game_loop(&mut out, &config, &rx, &worker);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let unread = worker.shutdown_within(STORE_DRAIN_TIMEOUT);
    log::debug!("{} store replies unread at exit", unread.len());

    result.context("terminal I/O failed")?;
    log::info!("bye");
    Ok(())
}
