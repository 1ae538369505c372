//! # Simulation Configuration
//!
//! Deployment-level knobs for a match. Model constants stay in
//! `engine::constants`; anything here can be overridden from JSON.
//!
//! ## Usage
//! ```rust
//! use afl_core::engine::config::SimConfig;
//!
//! let config = SimConfig::from_json(r#"{ "seed": 7, "humidity": 0.8 }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.umpire_count, 3);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};
use validator::Validate;

use super::constants::{clock, environment, field, umpire};
use crate::error::{Result, SimError};

pub const SIM_CONFIG_PATH_ENV: &str = "AFL_SIM_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    /// Real seconds represented by one tick.
    #[validate(range(min = 0.001, max = 1.0))]
    pub real_delta_secs: f32,
    /// Simulated seconds per real second.
    #[validate(range(min = 0.1, max = 100.0))]
    pub time_scale: f32,
    #[validate(range(min = 16.0, max = 200.0))]
    pub field_width: f32,
    #[validate(range(min = 12.0, max = 200.0))]
    pub field_height: f32,
    #[validate(range(min = 1, max = 8))]
    pub umpire_count: u8,
    #[validate(range(min = 1.0, max = 100.0))]
    pub umpire_vision_range: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub umpire_base_accuracy: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub humidity: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub wind_speed: f32,
    pub wind_angle_deg: f32,
    /// Factor applied by the fast-forward command.
    #[validate(range(min = 1.0, max = 16.0))]
    pub fast_forward_factor: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            real_delta_secs: 0.1,
            time_scale: clock::TIME_SCALE,
            field_width: field::DEFAULT_WIDTH,
            field_height: field::DEFAULT_HEIGHT,
            umpire_count: umpire::DEFAULT_COUNT,
            umpire_vision_range: umpire::DEFAULT_VISION_RANGE,
            umpire_base_accuracy: umpire::BASE_ACCURACY,
            humidity: environment::DEFAULT_HUMIDITY,
            wind_speed: environment::DEFAULT_WIND_SPEED,
            wind_angle_deg: 0.0,
            fast_forward_factor: 4.0,
        }
    }
}

impl SimConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Replace `self` with the file named by `AFL_SIM_CONFIG_PATH`, if set.
    /// The seed already chosen by the caller is kept.
    pub fn from_env_override(self) -> Result<Self> {
        let Ok(path) = env::var(SIM_CONFIG_PATH_ENV) else {
            return Ok(self);
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(self);
        }

        let loaded = Self::load_from_path(path).map_err(|e| {
            SimError::InvalidConfig(format!("{SIM_CONFIG_PATH_ENV}='{path}': {e}"))
        })?;
        log::info!("loaded simulation config from {SIM_CONFIG_PATH_ENV}='{path}'");
        Ok(loaded.with_seed(self.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_constants() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.time_scale, 10.0);
        assert_eq!(cfg.umpire_count, 3);
        assert!((cfg.umpire_base_accuracy - 0.85).abs() < 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = SimConfig::from_json(r#"{ "seed": 42, "wind_speed": 0.9 }"#).unwrap();
        assert_eq!(cfg.seed, 42);
        assert!((cfg.wind_speed - 0.9).abs() < 1e-6);
        assert_eq!(cfg.field_width, 48.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = SimConfig::from_json(r#"{ "humidity": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        let err = SimConfig::from_json(r#"{ "umpire_count": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        let err = SimConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, SimError::Serialization(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 3, "humidity": 0.75, "umpire_count": 5 }}"#).unwrap();

        let cfg = SimConfig::load_from_path(file.path()).unwrap();
        assert_eq!(cfg.umpire_count, 5);
        assert!((cfg.humidity - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::load_from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }

    #[test]
    fn test_env_override_keeps_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 99, "fast_forward_factor": 8.0 }}"#).unwrap();

        env::set_var(SIM_CONFIG_PATH_ENV, file.path());
        let cfg = SimConfig::default().with_seed(11).from_env_override();
        env::remove_var(SIM_CONFIG_PATH_ENV);

        let cfg = cfg.unwrap();
        assert_eq!(cfg.seed, 11);
        assert_eq!(cfg.fast_forward_factor, 8.0);
    }
}
