use super::action::Heading;
use super::config::{PlayerColor, PlayerSettings};
use super::state::Position;

/// One participant: a moving head plus the trail it leaves behind
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    name: String,
    color: PlayerColor,
    position: Position,
    heading: Heading,
    /// Every cell the player has left, oldest first. Never holds `position`.
    trail: Vec<Position>,
    alive: bool,
}

impl Player {
    /// Create a live player at `position` with no heading
    pub fn new(name: impl Into<String>, color: PlayerColor, position: Position) -> Self {
        Self {
            name: name.into(),
            color,
            position,
            heading: Heading::None,
            trail: Vec::new(),
            alive: true,
        }
    }

    pub fn from_settings(settings: &PlayerSettings, position: Position) -> Self {
        Self::new(settings.name.clone(), settings.color, position)
    }

    /// Advance one cell along the current heading, leaving the vacated cell
    /// in the trail. Does nothing when eliminated or when no heading is set.
    pub fn step(&mut self) {
        if !self.alive || !self.heading.is_set() {
            return;
        }
        self.trail.push(self.position);
        self.position = self.position.moved_in_direction(self.heading);
    }

    /// Overwrite the heading. Allowed at any time, including after elimination.
    pub fn turn(&mut self, heading: Heading) {
        self.heading = heading;
    }

    /// Check if this player is colliding with `other`.
    ///
    /// Heads only collide when `other` is alive and a different player.
    /// Trails always count, including a dead player's and our own.
    pub fn collides_with(&self, other: &Player) -> bool {
        if other.alive && !std::ptr::eq(self, other) && self.position == other.position {
            return true;
        }
        other.trail_contains(self.position)
    }

    /// Check if this player's trail occupies `position`
    pub fn trail_contains(&self, position: Position) -> bool {
        self.trail.contains(&position)
    }

    pub(crate) fn eliminate(&mut self) {
        self.alive = false;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> PlayerColor {
        self.color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn trail(&self) -> &[Position] {
        &self.trail
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}
