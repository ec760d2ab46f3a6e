use super::action::Heading;
use super::config::validate_map_size;
use super::error::ConfigError;

/// A cell on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell along a heading
    pub fn moved_in_direction(&self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx, dy)
    }
}

/// Rectangular playing field, fixed for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
}

impl Board {
    /// Create a board, rejecting sizes outside the allowed range
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        validate_map_size(width, height)?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if a position is within `[0, width) x [0, height)`
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }
}

/// Why a player was eliminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Left the board
    Wall,
    /// Shares a cell with another live player's head
    HeadOn,
    /// Entered a cell in some trail, possibly its own
    Trail,
}
