//! Tron Grid - a turn-synchronized light-trail game for two to four players
//!
//! This library provides:
//! - Core simulation: board, players, trails and collision rules (game module)
//! - Game session with clamped settings and lifecycle notifications (session module)
//! - Keyboard input with per-session keybindings (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
