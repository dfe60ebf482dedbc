use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

use crate::models::{ExerciseType, WorkingSet};

/// Training block focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingPhase {
    Hypertrophy,
    Strength,
    Power,
    Peaking,
}

impl TrainingPhase {
    /// Typical reps per set
    pub fn reps_range(&self) -> RangeInclusive<u32> {
        match self {
            TrainingPhase::Hypertrophy => 8..=12,
            TrainingPhase::Strength => 4..=6,
            TrainingPhase::Power => 2..=4,
            TrainingPhase::Peaking => 1..=3,
        }
    }

    /// Typical load in percent of 1RM
    pub fn intensity_range(&self) -> RangeInclusive<f64> {
        match self {
            TrainingPhase::Hypertrophy => 65.0..=75.0,
            TrainingPhase::Strength => 75.0..=85.0,
            TrainingPhase::Power => 85.0..=92.0,
            TrainingPhase::Peaking => 90.0..=100.0,
        }
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "hypertrophy" => Ok(Self::Hypertrophy),
            "strength" => Ok(Self::Strength),
            "power" => Ok(Self::Power),
            "peaking" | "peak" => Ok(Self::Peaking),
            _ => anyhow::bail!("Unknown training phase: {}", s),
        }
    }
}

/// How a planned set's load is prescribed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetLoad {
    /// Absolute load in kg
    Fixed { weight_kg: f64 },
    /// Percent of the athlete's max
    Percentage { percent: f64 },
}

impl SetLoad {
    /// Concrete load, or `None` for a percentage when no max is known yet
    pub fn resolve(&self, max_weight_kg: Option<f64>) -> Option<f64> {
        match *self {
            SetLoad::Fixed { weight_kg } => Some(weight_kg),
            SetLoad::Percentage { percent } => max_weight_kg.map(|max| max * percent / 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSet {
    pub set_number: u32,
    pub load: SetLoad,
    pub reps: u32,
    pub target_rpe: Option<f64>,
    pub rest_seconds: Option<u32>,
}

impl PlannedSet {
    pub fn new(set_number: u32, load: SetLoad, reps: u32) -> Self {
        Self {
            set_number,
            load,
            reps,
            target_rpe: None,
            rest_seconds: Some(120),
        }
    }

    pub fn with_target_rpe(mut self, rpe: f64) -> Self {
        self.target_rpe = Some(rpe);
        self
    }

    pub fn resolve_weight(&self, max_weight_kg: Option<f64>) -> Option<f64> {
        self.load.resolve(max_weight_kg)
    }
}

/// A planned session for one lift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub date: NaiveDate,
    pub exercise: ExerciseType,
    pub sets: Vec<PlannedSet>,
    pub warmup_required: bool,
    pub notes: Option<String>,
    pub completed: bool,
    pub actual_sets: Option<Vec<WorkingSet>>,
}

impl WorkoutPlan {
    pub fn new(date: NaiveDate, exercise: ExerciseType, sets: Vec<PlannedSet>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            exercise,
            sets,
            warmup_required: true,
            notes: None,
            completed: false,
            actual_sets: None,
        }
    }

    /// Planned tonnage; sets that cannot be resolved count as zero
    pub fn total_volume(&self, max_weight_kg: Option<f64>) -> f64 {
        self.sets
            .iter()
            .map(|set| set.resolve_weight(max_weight_kg).unwrap_or(0.0) * set.reps as f64)
            .sum()
    }

    pub fn total_sets(&self) -> usize {
        self.sets.len()
    }

    /// Record what was actually lifted and mark the plan done
    pub fn complete(&mut self, actual_sets: Vec<WorkingSet>) {
        self.actual_sets = Some(actual_sets);
        self.completed = true;
    }
}
