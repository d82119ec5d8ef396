//! Terminal sumstack runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `sumstack-term`.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sumstack::core::{GameSnapshot, GridConfig, Session, SimpleRng};
use sumstack::input::{handle_key_event, should_quit, InputHandler};
use sumstack::settings::RunSettings;
use sumstack::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use sumstack::types::TICK_MS;

fn main() -> Result<()> {
    let settings = RunSettings::from_env();
    init_logging(&settings)?;

    let mut session = Session::new(GridConfig::default(), SimpleRng::new(settings.seed))?;
    tracing::info!(seed = settings.seed, "sumstack starting");
    if let Some(mode) = settings.mode {
        session.start_game(mode);
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to a file: the terminal is in raw alternate-screen mode.
fn init_logging(settings: &RunSettings) -> Result<()> {
    let Some(path) = settings.log_path.as_deref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("cannot create log file {path}"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, session: &mut Session<SimpleRng>) -> Result<()> {
    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        session.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let cursor = input.cursor();
        view.render_into(&snap, Some((cursor.row, cursor.col)), Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        tracing::info!(score = session.score(), "quit");
                        return Ok(());
                    }
                    if let Some(command) =
                        handle_key_event(key).and_then(|action| input.handle(action, &snap))
                    {
                        tracing::debug!(command = command.as_str(), "command");
                        session.apply_command(command);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick with the real elapsed time.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }

        for ev in session.drain_events() {
            tracing::debug!(event = ?ev, "session event");
        }
    }
}
