//! Terminal runner (default binary).
//!
//! Renders a frame, waits for input until the next frame deadline, applies
//! whatever came in, then advances the game clock. The terminal is restored
//! on every exit path.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use tettris::config::AppConfig;
use tettris::core::{GameSnapshot, GameState};
use tettris::input::{handle_key_event, should_exit, InputHandler};
use tettris::logging;
use tettris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tettris::types::GameAction;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    if let Some(path) = config.log_path.as_deref() {
        logging::init_log(config.log_level, path)?;
    }
    info!("starting: {:?}", config);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!("terminal restore failed: {err:#}");
    }
    if let Err(err) = &result {
        warn!("exiting with error: {err:#}");
    }
    result
}

fn run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    let mut game = GameState::new(config.seed);
    game.start();

    let view = GameView::default();
    let mut input = InputHandler::with_repeat_ms(config.repeat_ms)
        .with_key_release_timeout_ms(config.key_release_ms);

    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let frame_duration = Duration::from_millis(config.frame_ms as u64);
    let epoch = Instant::now();
    let mut last_frame = Instant::now();

    loop {
        game.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_exit(key) {
                            info!("exit requested (score {})", game.score());
                            return Ok(());
                        }
                        match handle_key_event(key) {
                            // Held controls: the handler decides when they fire.
                            Some(GameAction::MoveLeft | GameAction::MoveRight | GameAction::SoftDrop) => {
                                if let Some(action) = input.handle_key_press(key.code) {
                                    game.apply_action(action);
                                }
                            }
                            Some(GameAction::Restart) => {
                                input.reset();
                                game.apply_action(GameAction::Restart);
                            }
                            Some(action) => {
                                game.apply_action(action);
                            }
                            None => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Terminal auto-repeat is ignored; the handler repeats held keys itself.
                    }
                    KeyEventKind::Release => {
                        input.handle_key_release(key.code);
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let since_frame = last_frame.elapsed();
        if since_frame >= frame_duration {
            last_frame = Instant::now();

            let elapsed_ms = u32::try_from(since_frame.as_millis()).unwrap_or(u32::MAX);
            for action in input.update(elapsed_ms) {
                game.apply_action(action);
            }

            let now_ms = u64::try_from(epoch.elapsed().as_millis()).unwrap_or(u64::MAX);
            game.frame(now_ms);
        }
    }
}
