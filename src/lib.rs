// Library interface for LiftRS modules
// Barbell velocity tracking and autoregulated load progression

pub mod calibration;
pub mod config;
pub mod deload;
pub mod error;
pub mod history;
pub mod import;
pub mod kinematics;
pub mod logging;
pub mod models;
pub mod one_rep_max;
pub mod progression;
pub mod training_plan;
pub mod warmup;

// Re-export commonly used types for convenience
pub use models::*;
pub use calibration::{CalibrationReference, CalibrationSettings};
pub use config::LiftConfig;
pub use deload::{DeloadDecision, DeloadPolicy, DeloadReason, DeloadSettings};
pub use history::PersonalRecords;
pub use kinematics::{
    ImageSize, IngestOutcome, KinematicsTracker, NormalizedPoint, NormalizedRect,
    SharedTracker, TrackerState, TrackingSessionStats, TrackingSnapshot, VelocityZone,
};
pub use one_rep_max::{EstimatedOneRepMax, OneRepMaxEstimator, OneRepMaxFormula};
pub use progression::{ProgressionEngine, ProgressionRecommendation, ProgressionSettings};
pub use training_plan::{PlannedSet, SetLoad, TrainingPhase, WorkoutPlan};
pub use warmup::{WarmupPlan, WarmupPlanner, WarmupSet, WarmupSettings};
pub use error::{LiftRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
