use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kinematics::TrackingSessionStats;
use crate::one_rep_max::{OneRepMaxEstimator, OneRepMaxFormula};

/// Athlete classification used to pick progression step sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AthleteLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl AthleteLevel {
    /// IPF GL points band associated with each level
    pub fn description(&self) -> &'static str {
        match self {
            AthleteLevel::Beginner => "IPF GL: 70-79 Points",
            AthleteLevel::Intermediate => "IPF GL: 80-89 Points",
            AthleteLevel::Advanced => "IPF GL: 90-99 Points",
            AthleteLevel::Elite => "IPF GL: 100+ Points",
        }
    }
}

impl std::str::FromStr for AthleteLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(AthleteLevel::Beginner),
            "intermediate" => Ok(AthleteLevel::Intermediate),
            "advanced" => Ok(AthleteLevel::Advanced),
            "elite" => Ok(AthleteLevel::Elite),
            _ => Err(format!("Invalid athlete level: {}", s)),
        }
    }
}

impl std::fmt::Display for AthleteLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AthleteLevel::Beginner => write!(f, "Beginner"),
            AthleteLevel::Intermediate => write!(f, "Intermediate"),
            AthleteLevel::Advanced => write!(f, "Advanced"),
            AthleteLevel::Elite => write!(f, "Elite"),
        }
    }
}

/// Competition lifts supported by the progression tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    Squat,
    Bench,
    Deadlift,
}

impl ExerciseType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseType::Squat => "Squat",
            ExerciseType::Bench => "Bench Press",
            ExerciseType::Deadlift => "Deadlift",
        }
    }
}

impl std::str::FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "squat" => Ok(ExerciseType::Squat),
            "bench" | "bench-press" | "bench press" => Ok(ExerciseType::Bench),
            "deadlift" => Ok(ExerciseType::Deadlift),
            _ => Err(format!("Invalid exercise: {}", s)),
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Athlete context consumed by the progression engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteContext {
    pub level: AthleteLevel,
    pub exercise: ExerciseType,
}

impl AthleteContext {
    pub fn new(level: AthleteLevel, exercise: ExerciseType) -> Self {
        Self { level, exercise }
    }
}

/// A completed working set, entered manually or measured by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingSet {
    /// Position of the set within the session (1-based)
    pub set_number: u32,

    /// Load on the bar in kilograms
    pub weight_kg: f64,

    /// Completed repetitions
    pub reps: u32,

    /// Rate of perceived exertion (0-10)
    pub rpe: Option<f64>,

    /// Mean concentric velocity in m/s, when tracked
    pub velocity: Option<f64>,

    /// Range of motion in centimetres, when tracked
    pub rom_cm: Option<f64>,

    /// When the set was performed
    pub date: DateTime<Utc>,
}

impl WorkingSet {
    pub fn new(set_number: u32, weight_kg: f64, reps: u32, rpe: Option<f64>) -> Self {
        Self {
            set_number,
            weight_kg,
            reps,
            rpe,
            velocity: None,
            rom_cm: None,
            date: Utc::now(),
        }
    }

    /// Attach bar-speed measurements from a finished tracking session
    pub fn with_tracking(mut self, stats: &TrackingSessionStats) -> Self {
        self.velocity = Some(stats.avg_velocity);
        self.rom_cm = Some(stats.rom_cm);
        self
    }

    /// Total load moved (weight × reps)
    pub fn volume(&self) -> f64 {
        self.weight_kg * self.reps as f64
    }

    /// Epley estimate used for trend comparisons; a zero-rep set counts as its weight
    pub fn estimated_one_rep_max(&self) -> f64 {
        OneRepMaxEstimator::estimate(self.weight_kg, self.reps, OneRepMaxFormula::Epley)
            .unwrap_or(self.weight_kg)
    }
}

/// A logged training session for one lift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub exercise: ExerciseType,
    pub sets: Vec<WorkingSet>,
    pub notes: Option<String>,
}

impl Workout {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, exercise: ExerciseType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            exercise,
            sets: Vec::new(),
            notes: None,
        }
    }

    pub fn with_sets(mut self, sets: Vec<WorkingSet>) -> Self {
        self.sets = sets;
        self
    }

    pub fn total_volume(&self) -> f64 {
        self.sets.iter().map(WorkingSet::volume).sum()
    }

    pub fn total_sets(&self) -> usize {
        self.sets.len()
    }
}

/// Bar-speed summary for one exercise, as shown after a tracked set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub exercise: ExerciseType,
    pub avg_velocity: f64,
    pub max_velocity: f64,
    pub rom_cm: f64,
    pub total_reps: u32,
}

impl WorkoutStats {
    pub fn from_session(exercise: ExerciseType, stats: &TrackingSessionStats, total_reps: u32) -> Self {
        Self {
            exercise,
            avg_velocity: stats.avg_velocity,
            max_velocity: stats.peak_velocity,
            rom_cm: stats.rom_cm,
            total_reps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_and_estimate() {
        let set = WorkingSet::new(1, 100.0, 5, Some(8.0));
        assert_eq!(set.volume(), 500.0);
        assert!((set.estimated_one_rep_max() - 116.6667).abs() < 0.001);
    }

    #[test]
    fn test_zero_rep_estimate_is_weight() {
        let set = WorkingSet::new(1, 140.0, 0, None);
        assert_eq!(set.estimated_one_rep_max(), 140.0);
    }

    #[test]
    fn test_estimate_matches_epley_estimator() {
        for reps in [1, 3, 5, 8, 12, 40] {
            let set = WorkingSet::new(1, 132.5, reps, None);
            let epley =
                OneRepMaxEstimator::estimate(132.5, reps, OneRepMaxFormula::Epley).unwrap();
            assert_eq!(set.estimated_one_rep_max(), epley);
        }
    }

    #[test]
    fn test_with_tracking() {
        let stats = TrackingSessionStats {
            current_velocity: 0.4,
            avg_velocity: 0.55,
            peak_velocity: 0.9,
            rom_cm: 62.0,
            sample_count: 30,
        };
        let set = WorkingSet::new(2, 120.0, 3, None).with_tracking(&stats);
        assert_eq!(set.velocity, Some(0.55));
        assert_eq!(set.rom_cm, Some(62.0));

        let summary = WorkoutStats::from_session(ExerciseType::Squat, &stats, 3);
        assert_eq!(summary.max_velocity, 0.9);
        assert_eq!(summary.total_reps, 3);
    }

    #[test]
    fn test_workout_totals() {
        let workout = Workout::new("Heavy squat", Utc::now(), ExerciseType::Squat).with_sets(vec![
            WorkingSet::new(1, 100.0, 5, Some(7.0)),
            WorkingSet::new(2, 120.0, 3, Some(8.5)),
        ]);
        assert_eq!(workout.total_sets(), 2);
        assert_eq!(workout.total_volume(), 860.0);

        let empty = Workout::new("Rest", Utc::now(), ExerciseType::Bench);
        assert_eq!(empty.total_volume(), 0.0);
        assert_eq!(empty.total_sets(), 0);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("bench".parse::<ExerciseType>().unwrap(), ExerciseType::Bench);
        assert_eq!("Elite".parse::<AthleteLevel>().unwrap(), AthleteLevel::Elite);
        assert!("curl".parse::<ExerciseType>().is_err());
    }

    #[test]
    fn test_serialization() {
        let set = WorkingSet::new(1, 100.0, 5, Some(7.5));
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains("\"weight_kg\":100.0"));

        let deserialized: WorkingSet = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, set);
    }
}
