use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use archery_core::GameConfig;
use serde::Serialize;

pub const CONFIG_PATH_ENV: &str = "ARCHERY_CONFIG";

#[derive(Clone, Debug, Serialize)]
pub struct HostConfig {
    /// JSON file the game config was loaded from, if any.
    pub config_path: Option<PathBuf>,
    pub game: GameConfig,
}

/// Per-run overrides taken from CLI flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameOverrides {
    pub seed: Option<u32>,
    pub calibration_frames: Option<u32>,
    pub arrow_speed_px: Option<f32>,
}

impl HostConfig {
    /// Defaults, then an optional JSON file named by `ARCHERY_CONFIG`, then
    /// individual `ARCHERY_*` variables.
    pub fn from_env() -> Result<Self> {
        let config_path = env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|path| path.trim().to_owned())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let base = match &config_path {
            Some(path) => load_game_config(path)?,
            None => GameConfig::default(),
        };

        Ok(Self {
            config_path,
            game: apply_env_overrides(base),
        })
    }

    pub fn with_overrides(mut self, overrides: GameOverrides) -> Result<Self> {
        if let Some(seed) = overrides.seed {
            self.game.seed = seed;
        }
        if let Some(frames) = overrides.calibration_frames {
            self.game.calibration_frames = frames;
        }
        if let Some(speed) = overrides.arrow_speed_px {
            self.game.arrow_speed_px = speed;
        }
        self.game
            .validate()
            .context("invalid game configuration after CLI overrides")?;
        Ok(self)
    }
}

pub fn load_game_config(path: &Path) -> Result<GameConfig> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read game config: {}", path.display()))?;
    let config: GameConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse game config: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid game config: {}", path.display()))?;
    Ok(config)
}

fn apply_env_overrides(base: GameConfig) -> GameConfig {
    let config = GameConfig {
        seed: read_env_seed("ARCHERY_SEED", base.seed),
        calibration_frames: read_env_u32("ARCHERY_CALIBRATION_FRAMES", base.calibration_frames),
        default_threshold_px: read_env_f32("ARCHERY_THRESHOLD_PX", base.default_threshold_px),
        arrow_speed_px: read_env_f32("ARCHERY_ARROW_SPEED_PX", base.arrow_speed_px),
        target_radius_px: read_env_u32("ARCHERY_TARGET_RADIUS_PX", base.target_radius_px),
        target_move_interval_ms: read_env_u64(
            "ARCHERY_TARGET_INTERVAL_MS",
            base.target_move_interval_ms,
        ),
        ..base.clone()
    };

    if let Err(err) = config.validate() {
        tracing::warn!("ARCHERY_* overrides rejected ({err}). Falling back to base config.");
        return base;
    }
    config
}

fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_env_seed(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| parse_u32_maybe_hex(value.trim()))
        .unwrap_or(default)
}

fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(default)
}

pub fn parse_u32_maybe_hex(value: &str) -> Option<u32> {
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        value.parse::<u32>().ok()
    }
}
