//! Host configuration.
//!
//! Everything is optional in the JSON file; missing fields keep their
//! defaults. Command-line flags are applied on top by `main`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cadence_pool::PoolConfig;
use cadence_tick::TickConfig;

/// Configuration for the host frame loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Physics step, in scaled seconds.
    pub fixed_step: f32,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
    /// Physics steps allowed per frame before the backlog is dropped.
    pub max_fixed_steps_per_frame: u32,
    /// Initial time scale.
    pub time_scale: f32,
    /// Sleep to hold the frame rate instead of running as fast as possible.
    pub realtime: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            fixed_step: 0.02,
            max_frames: 600,
            max_fixed_steps_per_frame: 8,
            time_scale: 1.0,
            realtime: false,
        }
    }
}

impl LoopConfig {
    /// Real seconds per frame.
    #[must_use]
    pub fn frame_delta(&self) -> f32 {
        (1.0 / self.frame_rate) as f32
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick: TickConfig,
    pub pool: PoolConfig,
    #[serde(rename = "loop")]
    pub looping: LoopConfig,
}

impl AppConfig {
    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.looping.max_frames, 600);
        assert_eq!(config.pool.default_pool_size, 3);
    }

    #[test]
    fn test_nested_sections_override() {
        let config = AppConfig::from_json(
            r#"{
                "tick": { "debug": true },
                "pool": { "default_return_time": 1.5 },
                "loop": { "frame_rate": 30.0, "realtime": true }
            }"#,
        )
        .unwrap();
        assert!(config.tick.debug);
        assert_eq!(config.pool.default_return_time, 1.5);
        assert_eq!(config.pool.default_pool_size, 3);
        assert_eq!(config.looping.frame_rate, 30.0);
        assert!(config.looping.realtime);
        assert_eq!(config.looping.fixed_step, 0.02);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(AppConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = AppConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_frame_delta() {
        let config = LoopConfig {
            frame_rate: 50.0,
            ..LoopConfig::default()
        };
        assert!((config.frame_delta() - 0.02).abs() < 1e-6);
    }
}
