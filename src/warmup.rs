//! Warm-up ramp generation
//!
//! Empty bar first, then a fixed percentage ramp of the working weight. Heavy
//! working weights get one extra single close to the top set.

use serde::{Deserialize, Serialize};

/// One percentage step of the ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupStep {
    /// Percent of the working weight
    pub percentage: u8,
    pub reps: u32,
}

impl WarmupStep {
    pub const fn new(percentage: u8, reps: u32) -> Self {
        Self { percentage, reps }
    }
}

/// Warm-up settings; bar weight and threshold vary by federation and equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupSettings {
    /// Empty bar weight in kg
    pub bar_weight_kg: f64,

    /// Reps with the empty bar
    pub bar_reps: u32,

    /// Working weights strictly above this get `heavy_step`
    pub heavy_threshold_kg: f64,

    pub ramp: Vec<WarmupStep>,

    pub heavy_step: WarmupStep,
}

impl Default for WarmupSettings {
    fn default() -> Self {
        Self {
            bar_weight_kg: 20.0,
            bar_reps: 10,
            heavy_threshold_kg: 80.0,
            ramp: vec![
                WarmupStep::new(50, 5),
                WarmupStep::new(70, 3),
                WarmupStep::new(85, 2),
            ],
            heavy_step: WarmupStep::new(95, 1),
        }
    }
}

/// A single warm-up set. `percentage` is 0 for the empty bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
    pub weight_kg: f64,
    pub reps: u32,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupPlan {
    pub working_weight_kg: f64,
    pub sets: Vec<WarmupSet>,
}

impl WarmupPlan {
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WarmupPlanner {
    settings: WarmupSettings,
}

impl WarmupPlanner {
    pub fn new(settings: WarmupSettings) -> Self {
        Self { settings }
    }

    /// Build the ramp for `working_weight` (negative or NaN is treated as 0)
    pub fn generate(&self, working_weight: f64) -> WarmupPlan {
        let working = working_weight.max(0.0);
        let settings = &self.settings;

        let mut sets = Vec::with_capacity(settings.ramp.len() + 2);
        sets.push(WarmupSet {
            weight_kg: settings.bar_weight_kg,
            reps: settings.bar_reps,
            percentage: 0,
        });

        let mut steps: Vec<WarmupStep> = settings.ramp.clone();
        if working > settings.heavy_threshold_kg {
            steps.push(settings.heavy_step);
        }

        sets.extend(steps.into_iter().map(|step| WarmupSet {
            weight_kg: working * step.percentage as f64 / 100.0,
            reps: step.reps,
            percentage: step.percentage,
        }));

        WarmupPlan {
            working_weight_kg: working,
            sets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heavy_working_weight_gets_single() {
        let plan = WarmupPlanner::default().generate(90.0);

        assert_eq!(plan.len(), 5);
        let last = plan.sets.last().unwrap();
        assert_eq!(last.percentage, 95);
        assert_eq!(last.reps, 1);
        assert!((last.weight_kg - 85.5).abs() < 1e-9);
    }

    #[test]
    fn test_light_working_weight_has_no_single() {
        let plan = WarmupPlanner::default().generate(60.0);

        assert_eq!(plan.len(), 4);
        assert!(plan.sets.iter().all(|s| s.percentage != 95));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(WarmupPlanner::default().generate(80.0).len(), 4);
        assert_eq!(WarmupPlanner::default().generate(80.5).len(), 5);
    }

    #[test]
    fn test_ramp_values() {
        let plan = WarmupPlanner::default().generate(100.0);
        let expected = [(20.0, 10, 0), (50.0, 5, 50), (70.0, 3, 70), (85.0, 2, 85), (95.0, 1, 95)];

        for (set, (weight, reps, pct)) in plan.sets.iter().zip(expected.iter()) {
            assert!((set.weight_kg - weight).abs() < 1e-9);
            assert_eq!(set.reps, *reps);
            assert_eq!(set.percentage, *pct);
        }
    }

    #[test]
    fn test_custom_bar_and_threshold() {
        let planner = WarmupPlanner::new(WarmupSettings {
            bar_weight_kg: 15.0,
            heavy_threshold_kg: 50.0,
            ..WarmupSettings::default()
        });
        let plan = planner.generate(60.0);

        assert_eq!(plan.sets[0].weight_kg, 15.0);
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn test_negative_weight_is_clamped() {
        let plan = WarmupPlanner::default().generate(-40.0);
        assert_eq!(plan.working_weight_kg, 0.0);
        assert!(plan.sets[1..].iter().all(|s| s.weight_kg == 0.0));
    }
}
