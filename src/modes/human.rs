use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction, Keybindings};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::{GameSummary, Session, SessionEvent, Settings};

/// Hot-seat play: every player shares one keyboard
pub struct HumanMode {
    session: Session,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, keybindings: Keybindings) -> Self {
        let tick_interval = Duration::from_millis(config.tick_interval_ms.max(1));

        Self {
            session: Session::new(Settings::new(config)),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(keybindings),
            tick_interval,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut in_progress = self.session.subscribe();

        let mut tick_timer = interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        // Input, ticks and redraws all run on this one task, so a tick never
        // observes a half-applied turn.
        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game()?;
                }

                // Lifecycle notifications from the session
                Ok(()) = in_progress.changed() => {
                    let playing = *in_progress.borrow_and_update();
                    debug!(playing, "game in progress changed");
                    if playing {
                        self.metrics.on_game_start();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.session.is_in_progress() {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &self.session,
                            &self.metrics,
                            self.input_handler.keybindings(),
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(command) => {
                    self.session.turn(command);
                }
                KeyAction::NewGame => {
                    // A rejected start leaves the lobby up for another try
                    if !self.session.is_in_progress() {
                        if let Err(err) = self.session.start() {
                            warn!(%err, "new game not started");
                        }
                    }
                }
                KeyAction::AdjustPlayers(delta) => {
                    if let Some(settings) = self.session.settings_mut() {
                        settings.adjust_player_count(delta);
                    }
                }
                KeyAction::AdjustMapSize(steps) => {
                    if let Some(settings) = self.session.settings_mut() {
                        settings.step_map_size(steps);
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let event = self.session.tick().context("Game tick failed")?;

        if let SessionEvent::GameOver(summary) = event {
            let winner = match &summary {
                GameSummary::Winner { name, .. } => Some(name.as_str()),
                GameSummary::Tie => None,
            };
            self.metrics.on_game_over(winner);
        }

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
