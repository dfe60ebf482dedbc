//! Autoregulated load progression
//!
//! The next prescribed weight is the last weight plus a level/exercise step
//! size, scaled up for easy or high-rep sets and scaled down to nothing for
//! grinders:
//!
//! `next = current + base_increment(level, exercise) × rpe_multiplier × reps_multiplier`

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InputError;
use crate::models::{AthleteContext, AthleteLevel, ExerciseType, WorkingSet};

/// Step sizes for one athlete level, in kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelIncrement {
    pub bench_kg: f64,
    /// Squat and deadlift
    pub other_kg: f64,
}

impl LevelIncrement {
    pub const fn new(bench_kg: f64, other_kg: f64) -> Self {
        Self { bench_kg, other_kg }
    }
}

/// Base increments by athlete level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementTable {
    pub beginner: LevelIncrement,
    pub intermediate: LevelIncrement,
    pub advanced: LevelIncrement,
    pub elite: LevelIncrement,
}

impl Default for IncrementTable {
    fn default() -> Self {
        Self {
            beginner: LevelIncrement::new(2.5, 5.0),
            intermediate: LevelIncrement::new(1.25, 2.5),
            advanced: LevelIncrement::new(0.5, 1.25),
            elite: LevelIncrement::new(0.25, 0.5),
        }
    }
}

impl IncrementTable {
    pub fn lookup(&self, level: AthleteLevel, exercise: ExerciseType) -> f64 {
        let row = match level {
            AthleteLevel::Beginner => &self.beginner,
            AthleteLevel::Intermediate => &self.intermediate,
            AthleteLevel::Advanced => &self.advanced,
            AthleteLevel::Elite => &self.elite,
        };
        match exercise {
            ExerciseType::Bench => row.bench_kg,
            ExerciseType::Squat | ExerciseType::Deadlift => row.other_kg,
        }
    }
}

/// Progression engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSettings {
    pub increments: IncrementTable,

    /// RPE assumed for sets logged without one
    pub assumed_rpe: f64,

    /// Jump applied to the last top set when no RPE feedback is used
    pub top_set_step_kg: f64,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            increments: IncrementTable::default(),
            assumed_rpe: 8.0,
            top_set_step_kg: 2.5,
        }
    }
}

/// Next prescribed load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecommendation {
    pub next_weight_kg: f64,
}

/// Sets and rep range for a training block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecommendation {
    pub sets: u32,
    pub reps_range: RangeInclusive<u32>,
}

/// Load progression calculator
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    settings: ProgressionSettings,
}

impl ProgressionEngine {
    pub fn new(settings: ProgressionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    pub fn base_increment(&self, level: AthleteLevel, exercise: ExerciseType) -> f64 {
        self.settings.increments.lookup(level, exercise)
    }

    /// Lower effort earns a bigger jump; RPE 9.5 and above (and anything
    /// the table does not cover) earns none.
    pub fn rpe_multiplier(rpe: f64) -> f64 {
        if (0.0..7.0).contains(&rpe) {
            1.5
        } else if (7.0..8.0).contains(&rpe) {
            1.2
        } else if (8.0..9.0).contains(&rpe) {
            1.0
        } else if (9.0..9.5).contains(&rpe) {
            0.5
        } else {
            0.0
        }
    }

    /// Higher-rep sets tolerate larger increments. Everything above 10 reps
    /// (and zero) falls into the 2.0 catch-all.
    pub fn reps_multiplier(reps: u32) -> f64 {
        match reps {
            1..=3 => 1.0,
            4..=6 => 1.2,
            7..=10 => 1.5,
            _ => 2.0,
        }
    }

    /// Compute the next working weight after a set of `reps` at `current_weight` and `rpe`
    pub fn next_weight(
        &self,
        current_weight: f64,
        reps: u32,
        rpe: f64,
        level: AthleteLevel,
        exercise: ExerciseType,
    ) -> Result<f64, InputError> {
        if !current_weight.is_finite() || current_weight < 0.0 {
            return Err(InputError::InvalidWeight {
                weight: current_weight,
            });
        }
        if reps == 0 {
            return Err(InputError::ZeroReps);
        }
        if !(0.0..=10.0).contains(&rpe) {
            return Err(InputError::RpeOutOfRange { rpe });
        }

        let increment = self.base_increment(level, exercise)
            * Self::rpe_multiplier(rpe)
            * Self::reps_multiplier(reps);

        debug!(
            current_weight,
            reps,
            rpe,
            ?level,
            ?exercise,
            increment,
            "Computed progression increment"
        );

        Ok(current_weight + increment.max(0.0))
    }

    /// Recommendation for a logged set; missing RPE uses the configured default
    pub fn recommend(
        &self,
        set: &WorkingSet,
        context: &AthleteContext,
    ) -> Result<ProgressionRecommendation, InputError> {
        let rpe = set.rpe.unwrap_or(self.settings.assumed_rpe);
        let next_weight_kg =
            self.next_weight(set.weight_kg, set.reps, rpe, context.level, context.exercise)?;
        Ok(ProgressionRecommendation { next_weight_kg })
    }

    /// Target for the next top set: last top set plus a fixed step, or `fallback_kg` if none
    pub fn target_top_set_weight(&self, last_top_set: Option<&WorkingSet>, fallback_kg: f64) -> f64 {
        match last_top_set {
            Some(set) => set.weight_kg + self.settings.top_set_step_kg,
            None => fallback_kg,
        }
    }

    /// Working sets and reps per session
    pub fn recommended_volume(level: AthleteLevel, exercise: ExerciseType) -> VolumeRecommendation {
        let (sets, reps_range) = match (level, exercise == ExerciseType::Deadlift) {
            (AthleteLevel::Beginner, true) => (3, 3..=5),
            (AthleteLevel::Beginner, false) => (3, 5..=8),
            (AthleteLevel::Intermediate, true) => (4, 3..=5),
            (AthleteLevel::Intermediate, false) => (4, 4..=6),
            (AthleteLevel::Advanced, true) => (5, 2..=4),
            (AthleteLevel::Advanced, false) => (5, 3..=5),
            (AthleteLevel::Elite, true) => (6, 1..=3),
            (AthleteLevel::Elite, false) => (6, 2..=4),
        };
        VolumeRecommendation { sets, reps_range }
    }

    /// Sessions per week for the lift
    pub fn recommended_frequency(level: AthleteLevel, exercise: ExerciseType) -> u32 {
        match (level, exercise == ExerciseType::Deadlift) {
            (AthleteLevel::Beginner, true) => 1,
            (AthleteLevel::Beginner, false) => 2,
            (AthleteLevel::Intermediate, true) => 2,
            (AthleteLevel::Intermediate, false) => 3,
            (AthleteLevel::Advanced, _) => 3,
            (AthleteLevel::Elite, true) => 3,
            (AthleteLevel::Elite, false) => 4,
        }
    }
}
