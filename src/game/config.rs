use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use super::error::ConfigError;

pub const MIN_PLAYER_COUNT: usize = 2;
pub const MAX_PLAYER_COUNT: usize = 4;

pub const MIN_MAP_WIDTH: i32 = 20;
pub const MAX_MAP_WIDTH: i32 = 50;

pub const MIN_MAP_HEIGHT: i32 = 20;
pub const MAX_MAP_HEIGHT: i32 = 50;

/// Display color of a player. The engine never looks inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    White,
    Rgb(u8, u8, u8),
}

impl FromStr for PlayerColor {
    type Err = String;

    /// Parses a color name (`red`, `cyan`, ...) or a `#rrggbb` hex triple
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "red" => Ok(PlayerColor::Red),
            "green" => Ok(PlayerColor::Green),
            "blue" => Ok(PlayerColor::Blue),
            "yellow" => Ok(PlayerColor::Yellow),
            "magenta" => Ok(PlayerColor::Magenta),
            "cyan" => Ok(PlayerColor::Cyan),
            "white" => Ok(PlayerColor::White),
            hex if hex.len() == 7
                && hex.starts_with('#')
                && hex[1..].chars().all(|c| c.is_ascii_hexdigit()) =>
            {
                let channel = |range: std::ops::Range<usize>| {
                    u8::from_str_radix(&hex[range], 16)
                        .map_err(|e| format!("bad color {s:?}: {e}"))
                };
                Ok(PlayerColor::Rgb(channel(1..3)?, channel(3..5)?, channel(5..7)?))
            }
            _ => Err(format!("unknown color {s:?}")),
        }
    }
}

/// Name and color for one roster slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub name: String,
    pub color: PlayerColor,
}

impl PlayerSettings {
    pub fn new(name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    /// The four default roster slots
    pub fn defaults() -> Vec<PlayerSettings> {
        vec![
            PlayerSettings::new("Player One", PlayerColor::Red),
            PlayerSettings::new("Player Two", PlayerColor::Green),
            PlayerSettings::new("Player Three", PlayerColor::Blue),
            PlayerSettings::new("Player Four", PlayerColor::Yellow),
        ]
    }
}

/// Configuration for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the map in tiles
    pub map_width: i32,
    /// Height of the map in tiles
    pub map_height: i32,
    /// Number of players taking part
    pub player_count: usize,
    /// Per-slot names and colors; at least `player_count` entries
    pub players: Vec<PlayerSettings>,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: MIN_MAP_WIDTH,
            map_height: MIN_MAP_HEIGHT,
            player_count: MIN_PLAYER_COUNT,
            players: PlayerSettings::defaults(),
            tick_interval_ms: 80,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom map size and player count
    pub fn new(width: i32, height: i32, player_count: usize) -> Self {
        Self {
            map_width: width,
            map_height: height,
            player_count,
            ..Default::default()
        }
    }

    /// Largest map with a full roster
    pub fn large() -> Self {
        Self::new(MAX_MAP_WIDTH, MAX_MAP_HEIGHT, MAX_PLAYER_COUNT)
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Check every constraint a `Game` relies on. Out-of-range values are
    /// rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_map_size(self.map_width, self.map_height)?;
        validate_player_count(self.player_count)?;
        if self.players.len() < self.player_count {
            return Err(ConfigError::MissingPlayerSettings {
                count: self.player_count,
                available: self.players.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_map_size(width: i32, height: i32) -> Result<(), ConfigError> {
    if !(MIN_MAP_WIDTH..=MAX_MAP_WIDTH).contains(&width)
        || !(MIN_MAP_HEIGHT..=MAX_MAP_HEIGHT).contains(&height)
    {
        return Err(ConfigError::MapSize {
            width,
            height,
            min_width: MIN_MAP_WIDTH,
            max_width: MAX_MAP_WIDTH,
            min_height: MIN_MAP_HEIGHT,
            max_height: MAX_MAP_HEIGHT,
        });
    }
    Ok(())
}

pub(crate) fn validate_player_count(count: usize) -> Result<(), ConfigError> {
    if !(MIN_PLAYER_COUNT..=MAX_PLAYER_COUNT).contains(&count) {
        return Err(ConfigError::PlayerCount {
            count,
            min: MIN_PLAYER_COUNT,
            max: MAX_PLAYER_COUNT,
        });
    }
    Ok(())
}
