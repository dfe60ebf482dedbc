//! Barbell kinematics
//!
//! Turns a stream of tracked bar positions into calibrated bar speed and range
//! of motion. The upstream object tracker is not part of this crate; it hands us
//! the normalized centre of the tracked plate plus a monotonic timestamp for
//! every frame.
//!
//! Coordinates are normalized to the image (`0.0..=1.0` on both axes). Only the
//! vertical axis feeds velocity and ROM.

use serde::{Deserialize, Serialize};

mod shared;
mod tracker;

pub use shared::{
    spawn_ingestion, FrameObservation, IngestionSummary, SessionEpoch, SharedTracker,
    TrackingSnapshot,
};
pub use tracker::{IngestOutcome, KinematicsTracker, TrackerState};

/// Normalized bounding box of the tracked object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.mid_x(), self.mid_y())
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width_px: f64,
    pub height_px: f64,
}

impl ImageSize {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self { width_px, height_px }
    }
}

/// Normalized centre of the tracked object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Accepted vertical position observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Monotonic seconds
    pub timestamp: f64,
    pub normalized_y: f64,
}

/// Speed between two consecutive accepted samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocitySample {
    pub timestamp: f64,
    /// Magnitude only, always >= 0
    pub velocity_m_per_s: f64,
}

/// Aggregate statistics for the active (or frozen) session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSessionStats {
    pub current_velocity: f64,
    pub avg_velocity: f64,
    pub peak_velocity: f64,
    pub rom_cm: f64,
    /// Number of accepted position samples
    pub sample_count: usize,
}

/// Velocity-based training feedback category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityZone {
    Fast,
    Moderate,
    Slow,
}

impl VelocityZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            VelocityZone::Fast => "fast",
            VelocityZone::Moderate => "moderate",
            VelocityZone::Slow => "slow",
        }
    }

    /// Display colour (RGB hex, no leading '#')
    pub fn hex_color(&self) -> &'static str {
        match self {
            VelocityZone::Fast => "00d4aa",
            VelocityZone::Moderate => "d4ff00",
            VelocityZone::Slow => "ff6b6b",
        }
    }
}

impl std::fmt::Display for VelocityZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Zone boundaries in m/s
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityThresholds {
    /// Strictly above this is `Fast`
    pub fast_above_m_per_s: f64,
    /// Strictly above this (and not fast) is `Moderate`
    pub moderate_above_m_per_s: f64,
}

impl Default for VelocityThresholds {
    fn default() -> Self {
        Self {
            fast_above_m_per_s: 1.0,
            moderate_above_m_per_s: 0.5,
        }
    }
}

impl VelocityThresholds {
    pub fn classify(&self, velocity_m_per_s: f64) -> VelocityZone {
        if velocity_m_per_s > self.fast_above_m_per_s {
            VelocityZone::Fast
        } else if velocity_m_per_s > self.moderate_above_m_per_s {
            VelocityZone::Moderate
        } else {
            VelocityZone::Slow
        }
    }
}
