use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::entities::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, ENEMY_SIZE, SHIP_SIZE};
use crate::spawner::DEFAULT_SPAWN_INTERVAL;
use crate::store::local::default_scores_path;
use crate::store::StoreBackend;

// Runtime settings.  Every flag can also come from the environment (or a
// `.env` file loaded before parsing).
#[derive(Parser, Debug, Clone)]
#[command(name = "space_impact")]
#[command(about = "Terminal arcade shooter with a shared leaderboard")]
pub struct Config {
    /// Base URL of the leaderboard service (serves save_score.php etc.)
    #[arg(long, env = "SPACE_IMPACT_STORE_URL")]
    pub store_url: Option<String>,

    /// Request timeout for the leaderboard service; unbounded when unset
    #[arg(long, env = "SPACE_IMPACT_STORE_TIMEOUT_MS")]
    pub store_timeout_ms: Option<u64>,

    /// Score file used when no store URL is given
    #[arg(long, env = "SPACE_IMPACT_SCORES_FILE")]
    pub scores_file: Option<PathBuf>,

    /// Keep scores in memory only
    #[arg(long, env = "SPACE_IMPACT_OFFLINE")]
    pub offline: bool,

    /// Target frames per second
    #[arg(long, env = "SPACE_IMPACT_FPS", default_value_t = 60)]
    pub fps: u32,

    /// Logical playfield width
    #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub width: f32,

    /// Logical playfield height
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub height: f32,

    /// Milliseconds between enemy spawns
    #[arg(long, env = "SPACE_IMPACT_SPAWN_MS", default_value_t = DEFAULT_SPAWN_INTERVAL.as_millis() as u64)]
    pub spawn_interval_ms: u64,

    /// Where log output goes (the terminal is busy drawing the game)
    #[arg(long, env = "SPACE_IMPACT_LOG_FILE", default_value = "space_impact.log")]
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: None,
            store_timeout_ms: None,
            scores_file: None,
            offline: false,
            fps: 60,
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL.as_millis() as u64,
            log_file: PathBuf::from("space_impact.log"),
        }
    }
}

impl Config {
    /// Offline wins over a URL; with neither, scores go to a local file.
    pub fn backend(&self) -> StoreBackend {
        if self.offline {
            return StoreBackend::Memory;
        }
        match &self.store_url {
            Some(url) if !url.trim().is_empty() => StoreBackend::Http {
                url: url.trim().to_string(),
                timeout: self.store_timeout_ms.map(Duration::from_millis),
            },
            _ => StoreBackend::Local {
                path: self.scores_file.clone().unwrap_or_else(default_scores_path),
            },
        }
    }

    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("fps must be at least 1".to_string());
        }
        let min_width = SHIP_SIZE.0.max(ENEMY_SIZE.0);
        if !(self.width > min_width) {
            return Err(format!("width must exceed {min_width}"));
        }
        let min_height = SHIP_SIZE.1.max(ENEMY_SIZE.1);
        if !(self.height > min_height) {
            return Err(format!("height must exceed {min_height}"));
        }
        if self.spawn_interval_ms == 0 {
            return Err("spawn interval must be positive".to_string());
        }
        Ok(())
    }
}
