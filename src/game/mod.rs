//! Core simulation for the light-trail game
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Hosts drive it by calling [`Game::turn`] for player input and [`Game::tick`] on a
//! fixed cadence, then read [`Game::players`] to draw.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod player;
pub mod state;

// Re-export commonly used types
pub use action::{Heading, TurnCommand};
pub use config::{
    GameConfig, MAX_MAP_HEIGHT, MAX_MAP_WIDTH, MAX_PLAYER_COUNT, MIN_MAP_HEIGHT, MIN_MAP_WIDTH,
    MIN_PLAYER_COUNT, PlayerColor, PlayerSettings,
};
pub use engine::{Game, Outcome, TickReport, start_position};
pub use error::{ConfigError, ContractError};
pub use player::Player;
pub use state::{Board, CollisionType, Position};
