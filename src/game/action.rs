/// Direction a player is committed to moving in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heading {
    /// No move order issued yet
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Returns the delta (dx, dy) for one step in this heading
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Heading::None => (0, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// Whether a move order has been issued
    pub fn is_set(&self) -> bool {
        *self != Heading::None
    }
}

/// A turn command produced by the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnCommand {
    /// Roster index of the player being steered
    pub player: usize,
    pub heading: Heading,
}

impl TurnCommand {
    pub fn new(player: usize, heading: Heading) -> Self {
        Self { player, heading }
    }
}
