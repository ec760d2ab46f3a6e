use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub ties: u32,
    /// Wins per player name
    pub wins: BTreeMap<String, u32>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            ties: 0,
            wins: BTreeMap::new(),
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Record a finished game; `None` is a tie
    pub fn on_game_over(&mut self, winner: Option<&str>) {
        self.games_played += 1;
        match winner {
            Some(name) => *self.wins.entry(name.to_string()).or_insert(0) += 1,
            None => self.ties += 1,
        }
    }

    pub fn wins_for(&self, name: &str) -> u32 {
        self.wins.get(name).copied().unwrap_or(0)
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
