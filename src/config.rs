//! Configuration management for threshold tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling threshold adjustment without recompilation. Sampling rate,
//! visibility gating, and the per-exercise state-machine thresholds can all
//! be tuned via the config file.
//!
//! Scoring boundaries are deliberately not configurable: identical input must
//! produce byte-identical reports, so those constants live with the scoring
//! rules.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub sampling: SamplingConfig,
    pub squat: SquatConfig,
    pub lunge: LungeConfig,
    pub pushup: PushupConfig,
    pub plank: PlankConfig,
}

/// Frame sampling parameters for offline analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Target processing rate; frames are kept at round(native/target) intervals
    pub target_fps: u32,
    /// Minimum per-joint confidence for a landmark to count as detected
    pub visibility_threshold: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            target_fps: 10,
            visibility_threshold: 0.5,
        }
    }
}

/// Squat state-machine thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquatConfig {
    /// Knee angle below which the rep enters the down phase
    pub down_angle: f32,
    /// Knee angle above which the rep completes (hysteresis upper bound)
    pub up_angle: f32,
    /// Back angle below which straightness feedback fires
    pub back_straight_angle: f32,
}

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            down_angle: 90.0,
            up_angle: 160.0,
            back_straight_angle: 150.0,
        }
    }
}

/// Lunge state-machine thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LungeConfig {
    pub down_angle: f32,
    pub up_angle: f32,
    /// Max horizontal knee/ankle offset, as a fraction of frame width
    pub knee_alignment_limit: f32,
}

impl Default for LungeConfig {
    fn default() -> Self {
        Self {
            down_angle: 95.0,
            up_angle: 150.0,
            knee_alignment_limit: 0.04,
        }
    }
}

/// Push-up state-machine thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushupConfig {
    /// Single extended-elbow threshold driving both the down and up transitions
    pub elbow_extended_angle: f32,
    /// Back angle required to enter the ready state
    pub back_straight_angle: f32,
    /// Hip-shoulder-elbow angle above which tuck feedback fires
    pub elbow_tuck_angle: f32,
    /// Per-joint confidence required for the body-visible check
    pub visibility_threshold: f32,
}

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            elbow_extended_angle: 155.0,
            back_straight_angle: 145.0,
            elbow_tuck_angle: 65.0,
            visibility_threshold: 0.8,
        }
    }
}

/// Plank hold thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlankConfig {
    /// Shoulder-hip-ankle angle above which the hold counts
    pub back_straight_min_angle: f32,
}

impl Default for PlankConfig {
    fn default() -> Self {
        Self {
            back_straight_min_angle: 145.0,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            squat: SquatConfig::default(),
            lunge: LungeConfig::default(),
            pushup: PushupConfig::default(),
            plank: PlankConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or the defaults if the file is missing or
    /// malformed (logged as a warning, never fatal).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sampling.target_fps, 10);
        assert_eq!(config.squat.down_angle, 90.0);
        assert_eq!(config.squat.up_angle, 160.0);
        assert_eq!(config.lunge.down_angle, 95.0);
        assert_eq!(config.pushup.elbow_extended_angle, 155.0);
        assert_eq!(config.plank.back_straight_min_angle, 145.0);
    }

    #[test]
    fn test_hysteresis_band_is_open_by_default() {
        let config = AppConfig::default();
        assert!(config.squat.up_angle > config.squat.down_angle);
        assert!(config.lunge.up_angle > config.lunge.down_angle);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.sampling.target_fps, config.sampling.target_fps);
        assert_eq!(parsed.squat.up_angle, config.squat.up_angle);
        assert_eq!(
            parsed.pushup.visibility_threshold,
            config.pushup.visibility_threshold
        );
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("does/not/exist.json");
        assert_eq!(config.sampling.target_fps, 10);
    }
}
