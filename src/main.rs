//! Terminal runner (default binary).
//!
//! Reads the configuration, optionally sets up file logging and lock recording,
//! takes over the terminal and feeds key events to the session. Gravity runs on
//! its own thread; this loop only blocks on input.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event};
use tracing::info;
use tracing_subscriber::EnvFilter;

use termtris::config::GameConfig;
use termtris::core::Session;
use termtris::input::handle_key_event;
use termtris::record::Recorder;
use termtris::term::{restore_terminal, GameView, TermRenderer};

fn main() -> Result<()> {
    let mut config = GameConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    config.apply_args(&args)?;
    let dims = config.dimensions()?;

    init_logging(&config)?;

    let recorder = match config.record_path.as_deref() {
        Some(path) => Some(Recorder::spawn(path)?),
        None => None,
    };
    let seed = config.seed.unwrap_or_else(clock_seed);

    let mut screen = TermRenderer::new(GameView::default());
    screen.enter()?;

    let session = Session::with_renderer(dims, seed, Box::new(screen));
    if let Some(recorder) = &recorder {
        session.set_event_sink(recorder.sender());
    }

    let result = run(&session);

    session.stop();
    // Always try to restore terminal state.
    let _ = restore_terminal();

    let score = session.score();
    let game_over = session.is_game_over();
    drop(session);

    if let Some(recorder) = recorder {
        let recorded = recorder.finish()?;
        println!("[termtris] recorded {} lock events", recorded);
    }
    result?;

    info!(score, game_over, "exiting");
    if game_over {
        println!("[termtris] game over, final score {}", score);
    } else {
        println!("[termtris] final score {}", score);
    }
    Ok(())
}

fn run(session: &Session) -> Result<()> {
    session.start();

    loop {
        match event::read()? {
            Event::Key(key) => {
                let Some(action) = handle_key_event(key) else {
                    continue;
                };
                if !session.apply_action(action) {
                    return Ok(());
                }
            }
            Event::Resize(_, _) => session.redraw(),
            _ => {}
        }
    }
}

/// Install a file subscriber when a log path is configured. The terminal
/// belongs to the game view, so there is no stderr fallback.
fn init_logging(config: &GameConfig) -> Result<()> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("log: open {} failed: {}", path, e))?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| anyhow!("log: invalid filter {:?}: {}", config.log_filter, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow!("log: {}", e))?;
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
