use thiserror::Error;

/// Rejected game configuration. No `Game` is produced when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bad map size {width}x{height} (allowed {min_width}..={max_width} x {min_height}..={max_height})")]
    MapSize {
        width: i32,
        height: i32,
        min_width: i32,
        max_width: i32,
        min_height: i32,
        max_height: i32,
    },
    #[error("bad player count {count} (allowed {min}..={max})")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("{count} players configured but only {available} name/color entries given")]
    MissingPlayerSettings { count: usize, available: usize },
}

/// Programming errors: the caller broke an API precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("game has no winner (game not over)")]
    NotOver,
    #[error("no start position for player index {0}")]
    StartIndexOutOfRange(usize),
}
