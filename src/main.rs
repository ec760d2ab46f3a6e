use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tron_grid::game::{GameConfig, PlayerColor};
use tron_grid::input::Keybindings;
use tron_grid::modes::HumanMode;

#[derive(Parser)]
#[command(name = "tron_grid")]
#[command(version, about = "Light-trail game for two to four players on one keyboard")]
struct Cli {
    /// JSON file with game settings; command-line options override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map width in tiles (20-50)
    #[arg(long)]
    width: Option<i32>,

    /// Map height in tiles (20-50)
    #[arg(long)]
    height: Option<i32>,

    /// Number of players (2-4)
    #[arg(long)]
    players: Option<usize>,

    /// Player name, repeat once per player in roster order
    #[arg(long = "name")]
    names: Vec<String>,

    /// Player color (red, green, blue, yellow, magenta, cyan, white or #rrggbb),
    /// repeat once per player in roster order
    #[arg(long = "color")]
    colors: Vec<PlayerColor>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Where to write the log; the terminal itself is taken by the game
    #[arg(long, default_value = "tron_grid.log")]
    log_file: PathBuf,
}

impl Cli {
    /// Start from the config file (or defaults) and apply command-line overrides
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.map_width = width;
        }
        if let Some(height) = self.height {
            config.map_height = height;
        }
        if let Some(players) = self.players {
            config.player_count = players;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        for (slot, name) in config.players.iter_mut().zip(&self.names) {
            slot.name = name.clone();
        }
        for (slot, color) in config.players.iter_mut().zip(&self.colors) {
            slot.color = *color;
        }

        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    let config = cli.game_config()?;
    config.validate().context("Invalid game configuration")?;
    info!(?config, "configuration loaded");

    let mut human_mode = HumanMode::new(config, Keybindings::default());
    human_mode.run().await?;

    Ok(())
}
