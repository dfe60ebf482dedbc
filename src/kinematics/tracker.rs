use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::{
    ImageSize, NormalizedPoint, NormalizedRect, PositionSample, TrackingSessionStats,
    VelocitySample, VelocityThresholds, VelocityZone,
};
use crate::calibration::{CalibrationReference, CalibrationSettings};
use crate::error::CalibrationError;

/// Session lifecycle. `Stopped` holds the frozen statistics until `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerState {
    Idle,
    Tracking,
    Stopped,
}

/// What happened to an observation handed to the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IngestOutcome {
    /// Sample accepted; `velocity` is `None` for the first sample of a session
    Accepted { velocity: Option<f64> },
    /// Duplicate, reordered or non-finite observation
    Dropped,
    /// Tracker is not in the `Tracking` state
    Ignored,
    /// Observation belongs to an earlier session epoch
    Stale,
}

/// Single-session bar tracker
///
/// Not thread-safe on its own; `SharedTracker` wraps it for concurrent use.
#[derive(Debug, Clone)]
pub struct KinematicsTracker {
    reference_object_height_cm: f64,
    thresholds: VelocityThresholds,

    state: TrackerState,
    calibration: Option<CalibrationReference>,
    initial_y: Option<f64>,
    last_sample: Option<PositionSample>,

    samples: Vec<PositionSample>,
    bar_path: Vec<NormalizedPoint>,
    velocities: Vec<VelocitySample>,
    velocity_sum: f64,

    current_velocity: f64,
    avg_velocity: f64,
    peak_velocity: f64,
    rom_cm: f64,
}

impl Default for KinematicsTracker {
    fn default() -> Self {
        Self::new(&CalibrationSettings::default(), VelocityThresholds::default())
    }
}

impl KinematicsTracker {
    pub fn new(calibration: &CalibrationSettings, thresholds: VelocityThresholds) -> Self {
        Self {
            reference_object_height_cm: calibration.reference_object_height_cm,
            thresholds,
            state: TrackerState::Idle,
            calibration: None,
            initial_y: None,
            last_sample: None,
            samples: Vec::new(),
            bar_path: Vec::new(),
            velocities: Vec::new(),
            velocity_sum: 0.0,
            current_velocity: 0.0,
            avg_velocity: 0.0,
            peak_velocity: 0.0,
            rom_cm: 0.0,
        }
    }

    /// Begin a new session, discarding whatever the previous one held
    ///
    /// The initial region's height calibrates the session and its vertical
    /// centre becomes the ROM reference point. On calibration failure the
    /// tracker is left `Idle`.
    pub fn start(
        &mut self,
        initial_region: NormalizedRect,
        image_size: ImageSize,
    ) -> Result<(), CalibrationError> {
        self.reset();

        if !image_size.height_px.is_finite() || image_size.height_px <= 0.0 {
            warn!(
                width = image_size.width_px,
                height = image_size.height_px,
                "Rejecting session with invalid image size"
            );
            return Err(CalibrationError::InvalidImageSize {
                width_px: image_size.width_px,
                height_px: image_size.height_px,
            });
        }

        let calibration = CalibrationReference::establish(
            initial_region.height,
            image_size.height_px,
            self.reference_object_height_cm,
        )
        .map_err(|e| {
            warn!(error = %e, "Calibration failed");
            e
        })?;

        self.calibration = Some(calibration);
        self.initial_y = Some(initial_region.mid_y());
        self.state = TrackerState::Tracking;

        info!(
            pixels_per_cm = calibration.pixels_per_cm,
            initial_y = initial_region.mid_y(),
            "Tracking session started"
        );
        Ok(())
    }

    /// Feed one tracked position. Never fails; see `IngestOutcome`.
    pub fn ingest(&mut self, position: NormalizedPoint, timestamp: f64) -> IngestOutcome {
        if self.state != TrackerState::Tracking {
            return IngestOutcome::Ignored;
        }
        let (Some(calibration), Some(initial_y)) = (self.calibration, self.initial_y) else {
            return IngestOutcome::Ignored;
        };

        if !timestamp.is_finite() || !position.x.is_finite() || !position.y.is_finite() {
            debug!(timestamp, x = position.x, y = position.y, "Dropping non-finite observation");
            return IngestOutcome::Dropped;
        }

        let mut velocity = None;
        if let Some(last) = self.last_sample {
            let delta_time = timestamp - last.timestamp;
            if delta_time <= 0.0 {
                trace!(timestamp, last = last.timestamp, "Dropping out-of-order sample");
                return IngestOutcome::Dropped;
            }

            let delta_cm = calibration.to_cm(position.y - last.normalized_y);
            let velocity_m_per_s = (delta_cm / delta_time).abs() / 100.0;

            self.velocities.push(VelocitySample {
                timestamp,
                velocity_m_per_s,
            });
            self.velocity_sum += velocity_m_per_s;
            self.current_velocity = velocity_m_per_s;
            self.avg_velocity = self.velocity_sum / self.velocities.len() as f64;
            self.peak_velocity = self.peak_velocity.max(velocity_m_per_s);
            velocity = Some(velocity_m_per_s);
        }

        // Displacement from the start point, not path length
        self.rom_cm = calibration.to_cm(position.y - initial_y).abs();

        let sample = PositionSample {
            timestamp,
            normalized_y: position.y,
        };
        self.samples.push(sample);
        self.bar_path.push(position);
        self.last_sample = Some(sample);

        IngestOutcome::Accepted { velocity }
    }

    /// Freeze the session. No-op unless currently tracking.
    pub fn stop(&mut self) {
        if self.state == TrackerState::Tracking {
            self.state = TrackerState::Stopped;
            info!(
                samples = self.samples.len(),
                avg_velocity = self.avg_velocity,
                peak_velocity = self.peak_velocity,
                rom_cm = self.rom_cm,
                "Tracking session stopped"
            );
        }
    }

    /// Clear everything, including calibration, and return to `Idle`
    pub fn reset(&mut self) {
        self.state = TrackerState::Idle;
        self.calibration = None;
        self.initial_y = None;
        self.last_sample = None;
        self.samples.clear();
        self.bar_path.clear();
        self.velocities.clear();
        self.velocity_sum = 0.0;
        self.current_velocity = 0.0;
        self.avg_velocity = 0.0;
        self.peak_velocity = 0.0;
        self.rom_cm = 0.0;
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn calibration(&self) -> Option<&CalibrationReference> {
        self.calibration.as_ref()
    }

    pub fn stats(&self) -> TrackingSessionStats {
        TrackingSessionStats {
            current_velocity: self.current_velocity,
            avg_velocity: self.avg_velocity,
            peak_velocity: self.peak_velocity,
            rom_cm: self.rom_cm,
            sample_count: self.samples.len(),
        }
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn velocities(&self) -> &[VelocitySample] {
        &self.velocities
    }

    /// Accepted positions in order, for drawing the bar path
    pub fn bar_path(&self) -> &[NormalizedPoint] {
        &self.bar_path
    }

    pub fn thresholds(&self) -> &VelocityThresholds {
        &self.thresholds
    }

    pub fn color_for_velocity(&self, velocity_m_per_s: f64) -> VelocityZone {
        self.thresholds.classify(velocity_m_per_s)
    }
}
