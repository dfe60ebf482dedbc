//! Deload scheduling
//!
//! A deload is due every `cycle_weeks` weeks regardless of performance, or
//! earlier when the estimated 1RM of the most recent sets has regressed by
//! more than the allowed margin against the sets before them.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::info;

use crate::models::WorkingSet;

/// Deload policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadSettings {
    /// Fixed periodization cycle length in weeks (0 disables the fixed cycle)
    pub cycle_weeks: u32,

    /// Sets averaged on each side of the trend comparison
    pub comparison_window: usize,

    /// Deload when recent average < previous average × this
    pub regression_threshold: f64,

    /// Deload load as a fraction of the current working weight
    pub deload_factor: f64,
}

impl Default for DeloadSettings {
    fn default() -> Self {
        Self {
            cycle_weeks: 4,
            comparison_window: 3,
            regression_threshold: 0.95,
            deload_factor: 0.7,
        }
    }
}

/// Why a deload was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeloadReason {
    /// Scheduled end of a periodization cycle
    ScheduledCycle,
    /// Estimated 1RM is trending down
    PerformanceRegression,
}

/// Deload verdict handed to the workout screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeloadDecision {
    pub should_deload: bool,
    /// Deload weight when a deload is due, otherwise the current weight
    pub suggested_weight_kg: f64,
    pub reason: Option<DeloadReason>,
}

#[derive(Debug, Clone, Default)]
pub struct DeloadPolicy {
    settings: DeloadSettings,
}

impl DeloadPolicy {
    pub fn new(settings: DeloadSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DeloadSettings {
        &self.settings
    }

    /// `recent_sets` must be ordered newest first
    pub fn should_deload(&self, recent_sets: &[WorkingSet], weeks_of_training: u32) -> bool {
        self.evaluate(recent_sets, weeks_of_training).is_some()
    }

    pub fn deload_weight(&self, current_weight: f64) -> f64 {
        current_weight * self.settings.deload_factor
    }

    /// Full decision with a suggested load
    pub fn decide(
        &self,
        recent_sets: &[WorkingSet],
        weeks_of_training: u32,
        current_weight: f64,
    ) -> DeloadDecision {
        let reason = self.evaluate(recent_sets, weeks_of_training);
        if let Some(reason) = reason {
            info!(?reason, weeks_of_training, current_weight, "Deload recommended");
        }

        DeloadDecision {
            should_deload: reason.is_some(),
            suggested_weight_kg: match reason {
                Some(_) => self.deload_weight(current_weight),
                None => current_weight,
            },
            reason,
        }
    }

    fn evaluate(&self, recent_sets: &[WorkingSet], weeks_of_training: u32) -> Option<DeloadReason> {
        if weeks_of_training.checked_rem(self.settings.cycle_weeks) == Some(0) {
            return Some(DeloadReason::ScheduledCycle);
        }

        let window = self.settings.comparison_window;
        let needed = window.checked_mul(2)?;
        if window == 0 || recent_sets.len() < needed {
            return None;
        }

        let recent_avg = recent_sets[..window]
            .iter()
            .map(WorkingSet::estimated_one_rep_max)
            .mean();
        let previous_avg = recent_sets[window..window * 2]
            .iter()
            .map(WorkingSet::estimated_one_rep_max)
            .mean();

        if recent_avg < previous_avg * self.settings.regression_threshold {
            Some(DeloadReason::PerformanceRegression)
        } else {
            None
        }
    }
}
