use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::game::{GameConfig, GameEngine, GameStatus, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at ~30 FPS, independent of the game speed
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    engine: GameEngine,
    snapshots: watch::Receiver<Snapshot>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config).context("Failed to start game engine")?;
        let snapshots = engine.subscribe();

        Ok(Self {
            engine,
            snapshots,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal; the guard undoes it on every exit path, panics included
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard::new(restore_terminal);

        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        guard.release()?;
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let tick_interval = Duration::from_millis(self.engine.config().tick_interval_ms);
        let mut tick_timer = interval(tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut render_timer = interval(RENDER_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(?tick_interval, "session started");

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if self.handle_event(event) == KeyAction::Restart {
                                // A fresh game gets a full period before its first step
                                tick_timer.reset();
                            }
                        }
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.snapshots.borrow_and_update().clone();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games_played = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session ended"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> KeyAction {
        let Event::Key(key) = event else {
            return KeyAction::None;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return KeyAction::None;
        }

        let action = self.input_handler.handle_key_event(key);

        match action {
            KeyAction::Turn(direction) => {
                self.engine.set_direction(direction);
            }
            KeyAction::TogglePause => match self.engine.toggle_pause() {
                GameStatus::Paused => self.metrics.on_pause(),
                GameStatus::Running => self.metrics.on_resume(),
                GameStatus::GameOver(_) => {}
            },
            KeyAction::Restart => {
                self.reset_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        action
    }

    fn update_game(&mut self) {
        let result = self.engine.tick();

        if result.ended.is_some() {
            self.metrics.on_game_over(self.engine.state().score);
        }
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.metrics.on_game_start();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(stderr(), LeaveAlternateScreen, Show)
        .context("Failed to leave alternate screen")?;
    Ok(())
}

/// Runs a terminal restore exactly once: explicitly through `release`, or on drop.
struct TerminalGuard<F: FnOnce() -> Result<()>> {
    restore: Option<F>,
}

impl<F: FnOnce() -> Result<()>> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    fn release(mut self) -> Result<()> {
        match self.restore.take() {
            Some(restore) => restore(),
            None => Ok(()),
        }
    }
}

impl<F: FnOnce() -> Result<()>> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            if let Err(err) = restore() {
                warn!(error = %err, "terminal restore failed");
            }
        }
    }
}
