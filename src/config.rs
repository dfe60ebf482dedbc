use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calibration::CalibrationSettings;
use crate::deload::DeloadSettings;
use crate::error::LiftRsError;
use crate::kinematics::{KinematicsTracker, VelocityThresholds};
use crate::logging::LogConfig;
use crate::progression::ProgressionSettings;
use crate::warmup::WarmupSettings;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Reference object used to calibrate the camera
    pub calibration: CalibrationSettings,

    /// Velocity feedback zones
    pub velocity: VelocityThresholds,

    /// Load progression table
    pub progression: ProgressionSettings,

    /// Periodization and deload rules
    pub deload: DeloadSettings,

    /// Warm-up ramp
    pub warmup: WarmupSettings,

    /// Logging output
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for LiftConfig {
    fn default() -> Self {
        let now = Utc::now();

        LiftConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            calibration: CalibrationSettings::default(),
            velocity: VelocityThresholds::default(),
            progression: ProgressionSettings::default(),
            deload: DeloadSettings::default(),
            warmup: WarmupSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl LiftConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: LiftConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(
                    path = %config_path.display(),
                    error = %e,
                    "Config file not usable, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Check that the domain constants make sense together
    pub fn validate(&self) -> std::result::Result<(), LiftRsError> {
        let invalid = |msg: String| Err(LiftRsError::Configuration(msg));

        let reference = self.calibration.reference_object_height_cm;
        if !(reference.is_finite() && reference > 0.0) {
            return invalid(format!(
                "calibration.reference_object_height_cm must be positive, got {}",
                reference
            ));
        }

        if self.velocity.moderate_above_m_per_s > self.velocity.fast_above_m_per_s {
            return invalid(format!(
                "velocity.moderate_above_m_per_s ({}) exceeds fast_above_m_per_s ({})",
                self.velocity.moderate_above_m_per_s, self.velocity.fast_above_m_per_s
            ));
        }

        if self.deload.comparison_window == 0 {
            return invalid("deload.comparison_window must be at least 1".to_string());
        }

        for (name, value) in [
            ("deload.regression_threshold", self.deload.regression_threshold),
            ("deload.deload_factor", self.deload.deload_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return invalid(format!("{} must be within (0, 1], got {}", name, value));
            }
        }

        if !(0.0..=10.0).contains(&self.progression.assumed_rpe) {
            return invalid(format!(
                "progression.assumed_rpe must be within 0-10, got {}",
                self.progression.assumed_rpe
            ));
        }

        if self.warmup.bar_weight_kg < 0.0 {
            return invalid("warmup.bar_weight_kg must not be negative".to_string());
        }

        Ok(())
    }

    /// Tracker configured with this file's calibration and velocity zones
    pub fn tracker(&self) -> KinematicsTracker {
        KinematicsTracker::new(&self.calibration, self.velocity)
    }
}
