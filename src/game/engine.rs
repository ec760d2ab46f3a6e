use tracing::{debug, info};

use super::{
    action::Heading,
    config::{GameConfig, MAX_PLAYER_COUNT, validate_player_count},
    error::{ConfigError, ContractError},
    player::Player,
    state::{Board, CollisionType, Position},
};

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<'a> {
    /// Exactly one player is left standing
    Winner { index: usize, player: &'a Player },
    /// Nobody is left standing
    Tie,
}

/// What happened during one call to [`Game::tick_report`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Whether the tick passed the readiness gate and moved anyone
    pub executed: bool,
    /// Players eliminated on this tick, in roster order
    pub eliminated: Vec<(usize, CollisionType)>,
    /// Whether the game is still running after the tick
    pub in_progress: bool,
}

/// A board plus a fixed roster of players
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    ticks: u32,
}

/// Starting cells in roster order: top-left, bottom-right, top-right,
/// bottom-left, each a quarter of the way in from the edges.
fn start_positions(board: &Board) -> [Position; MAX_PLAYER_COUNT] {
    let (w, h) = (board.width(), board.height());
    let (near_x, far_x) = (w / 4, 3 * w / 4);
    let (near_y, far_y) = (h / 4, 3 * h / 4);

    [
        Position::new(near_x, near_y),
        Position::new(far_x, far_y),
        Position::new(far_x, near_y),
        Position::new(near_x, far_y),
    ]
}

/// Starting cell for the player at `index`
pub fn start_position(index: usize, board: &Board) -> Result<Position, ContractError> {
    start_positions(board)
        .get(index)
        .copied()
        .ok_or(ContractError::StartIndexOutOfRange(index))
}

impl Game {
    /// Create a game from a configuration, placing each player on its start cell
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.map_width, config.map_height)?;

        let players: Vec<Player> = config
            .players
            .iter()
            .zip(start_positions(&board))
            .take(config.player_count)
            .map(|(settings, position)| Player::from_settings(settings, position))
            .collect();

        info!(
            width = board.width(),
            height = board.height(),
            players = players.len(),
            "game created"
        );

        Ok(Self {
            board,
            players,
            ticks: 0,
        })
    }

    /// Create a game from explicitly placed players
    pub fn from_parts(board: Board, players: Vec<Player>) -> Result<Self, ConfigError> {
        validate_player_count(players.len())?;
        Ok(Self {
            board,
            players,
            ticks: 0,
        })
    }

    /// Advance the game by one tick. Returns whether it is still in progress.
    pub fn tick(&mut self) -> bool {
        self.tick_report().in_progress
    }

    /// Advance the game by one tick and report who was eliminated.
    ///
    /// Nothing happens until every live player has a heading, or once the
    /// game is over. Everyone moves first; collisions are judged afterwards
    /// against the same post-move board, so simultaneous crashes eliminate
    /// every player involved.
    pub fn tick_report(&mut self) -> TickReport {
        if self.is_over() || !self.all_ready() {
            return TickReport {
                executed: false,
                eliminated: Vec::new(),
                in_progress: !self.is_over(),
            };
        }

        for player in &mut self.players {
            player.step();
        }
        self.ticks += 1;

        let eliminated: Vec<(usize, CollisionType)> = (0..self.players.len())
            .filter(|&index| self.players[index].is_alive())
            .filter_map(|index| self.collision(index).map(|kind| (index, kind)))
            .collect();

        for &(index, kind) in &eliminated {
            let player = &mut self.players[index];
            player.eliminate();
            info!(
                tick = self.ticks,
                player = player.name(),
                x = player.position().x,
                y = player.position().y,
                cause = ?kind,
                "player eliminated"
            );
        }

        let in_progress = !self.is_over();
        if !in_progress {
            match self.winner() {
                Ok(Outcome::Winner { player, .. }) => {
                    info!(tick = self.ticks, winner = player.name(), "game over")
                }
                _ => info!(tick = self.ticks, "game over: tie"),
            }
        }

        TickReport {
            executed: true,
            eliminated,
            in_progress,
        }
    }

    /// Whether at most one player is still alive
    pub fn is_over(&self) -> bool {
        self.alive_count() <= 1
    }

    /// The finished game's result. Calling this before the game is over is
    /// a contract violation.
    pub fn winner(&self) -> Result<Outcome<'_>, ContractError> {
        if !self.is_over() {
            return Err(ContractError::NotOver);
        }

        Ok(self
            .players
            .iter()
            .enumerate()
            .find(|(_, player)| player.is_alive())
            .map_or(Outcome::Tie, |(index, player)| Outcome::Winner {
                index,
                player,
            }))
    }

    /// Steer the player at `index`. Commands for slots outside the roster
    /// are dropped and `false` is returned.
    pub fn turn(&mut self, index: usize, heading: Heading) -> bool {
        match self.players.get_mut(index) {
            Some(player) => {
                player.turn(heading);
                true
            }
            None => {
                debug!(index, ?heading, "dropping turn for absent player");
                false
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Number of ticks that actually moved the players
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Whether every live player has been given a heading
    pub fn all_ready(&self) -> bool {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .all(|p| p.heading().is_set())
    }

    /// Check if the player at `index` is colliding with the board edge or
    /// with any player, itself included
    fn collision(&self, index: usize) -> Option<CollisionType> {
        let player = &self.players[index];
        if !self.board.contains(player.position()) {
            return Some(CollisionType::Wall);
        }

        self.players
            .iter()
            .find(|other| player.collides_with(other))
            .map(|other| {
                if other.trail_contains(player.position()) {
                    CollisionType::Trail
                } else {
                    CollisionType::HeadOn
                }
            })
    }
}
