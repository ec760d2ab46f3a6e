//! Game session: pending settings, the running game, and lifecycle notifications
//!
//! The session sits between the terminal front end and the core [`Game`]. It owns
//! the game outright; renderers borrow it read-only. Settings are clamped here
//! and locked while a game is running, whereas the engine itself rejects
//! out-of-range values.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::game::{
    ConfigError, ContractError, Game, GameConfig, MAX_MAP_HEIGHT, MAX_MAP_WIDTH,
    MAX_PLAYER_COUNT, MIN_MAP_HEIGHT, MIN_MAP_WIDTH, MIN_PLAYER_COUNT, Outcome, PlayerColor,
    TickReport, TurnCommand,
};

/// Number of map-size increments between the smallest and largest square map
const MAP_SIZE_INCREMENTS: i32 = 3;

/// Configuration for the next game, edited through clamping setters
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    config: GameConfig,
}

impl Settings {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Smallest and largest square map valid in both dimensions
    pub fn map_size_range() -> (i32, i32) {
        (
            MIN_MAP_WIDTH.max(MIN_MAP_HEIGHT),
            MAX_MAP_WIDTH.min(MAX_MAP_HEIGHT),
        )
    }

    pub fn map_size_step() -> i32 {
        let (min, max) = Self::map_size_range();
        (max - min) / MAP_SIZE_INCREMENTS
    }

    /// Largest player count the roster can seat, never below the minimum
    pub fn max_player_count(&self) -> usize {
        MAX_PLAYER_COUNT
            .min(self.config.players.len())
            .max(MIN_PLAYER_COUNT)
    }

    /// Clamp to [2,4], and to the number of name/color entries on hand
    pub fn set_player_count(&mut self, count: usize) {
        self.config.player_count = count.clamp(MIN_PLAYER_COUNT, self.max_player_count());
    }

    pub fn adjust_player_count(&mut self, delta: i32) {
        let count = self.config.player_count as i64 + i64::from(delta);
        self.set_player_count(count.max(0) as usize);
    }

    /// Set a square map size, clamped to the range valid for both dimensions
    pub fn set_map_size(&mut self, size: i32) {
        let (min, max) = Self::map_size_range();
        let size = size.clamp(min, max);
        self.config.map_width = size;
        self.config.map_height = size;
    }

    /// Move both dimensions by whole increments. Each one is clamped to its
    /// own range, so a rectangular map stays rectangular.
    pub fn step_map_size(&mut self, steps: i32) {
        let delta = steps * Self::map_size_step();
        self.config.map_width = (self.config.map_width + delta).clamp(MIN_MAP_WIDTH, MAX_MAP_WIDTH);
        self.config.map_height =
            (self.config.map_height + delta).clamp(MIN_MAP_HEIGHT, MAX_MAP_HEIGHT);
    }

    /// Rename a roster slot. Out-of-range slots are ignored.
    pub fn set_player_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(slot) = self.config.players.get_mut(index) {
            slot.name = name.into();
        }
    }

    /// Recolor a roster slot. Out-of-range slots are ignored.
    pub fn set_player_color(&mut self, index: usize, color: PlayerColor) {
        if let Some(slot) = self.config.players.get_mut(index) {
            slot.color = color;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Owned copy of a finished game's result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameSummary {
    Winner { name: String, color: PlayerColor },
    Tie,
}

impl From<Outcome<'_>> for GameSummary {
    fn from(outcome: Outcome<'_>) -> Self {
        match outcome {
            Outcome::Winner { player, .. } => GameSummary::Winner {
                name: player.name().to_string(),
                color: player.color(),
            },
            Outcome::Tie => GameSummary::Tie,
        }
    }
}

/// Result of driving the session by one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// No game is running
    Idle,
    /// The game advanced (or waited for players) and is still running
    Ticked(TickReport),
    /// The game just ended
    GameOver(GameSummary),
}

pub struct Session {
    settings: Settings,
    game: Option<Game>,
    running: bool,
    last_outcome: Option<GameSummary>,
    in_progress: watch::Sender<bool>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let (in_progress, _) = watch::channel(false);
        Self {
            settings,
            game: None,
            running: false,
            last_outcome: None,
            in_progress,
        }
    }

    /// Receive `true` when a game starts and `false` when it stops
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.in_progress.subscribe()
    }

    /// Build a new game from the current settings and start it
    pub fn start(&mut self) -> Result<(), ConfigError> {
        let game = Game::new(self.settings.config()).inspect_err(|err| {
            warn!(%err, "refusing to start game");
        })?;

        info!(players = game.player_count(), "game started");
        self.game = Some(game);
        self.running = true;
        self.last_outcome = None;
        self.in_progress.send_replace(true);
        Ok(())
    }

    /// Halt the current game. It stays visible but no longer ticks.
    pub fn stop(&mut self) {
        if self.running {
            info!("game stopped");
        }
        self.running = false;
        self.in_progress.send_replace(false);
    }

    /// Advance the running game by one tick
    pub fn tick(&mut self) -> Result<SessionEvent, ContractError> {
        if !self.running {
            return Ok(SessionEvent::Idle);
        }
        let Some(game) = self.game.as_mut() else {
            return Ok(SessionEvent::Idle);
        };

        let report = game.tick_report();
        if report.in_progress {
            return Ok(SessionEvent::Ticked(report));
        }

        let summary = GameSummary::from(game.winner()?);
        self.stop();
        self.last_outcome = Some(summary.clone());
        Ok(SessionEvent::GameOver(summary))
    }

    /// Forward a turn command to the running game. Commands for slots beyond
    /// the configured player count, or arriving with no game, are dropped.
    pub fn turn(&mut self, command: TurnCommand) -> bool {
        match self.game.as_mut() {
            Some(game) if self.running => game.turn(command.player, command.heading),
            _ => {
                debug!(player = command.player, "no running game, dropping turn");
                false
            }
        }
    }

    /// Edit the pending settings. Returns `None` while a game is running.
    pub fn settings_mut(&mut self) -> Option<&mut Settings> {
        if self.running {
            debug!("settings locked while a game is in progress");
            None
        } else {
            Some(&mut self.settings)
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn is_in_progress(&self) -> bool {
        self.running
    }

    /// Result of the most recently finished game, cleared on start
    pub fn last_outcome(&self) -> Option<&GameSummary> {
        self.last_outcome.as_ref()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
