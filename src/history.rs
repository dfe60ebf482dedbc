//! Analytics over logged sessions
//!
//! Everything here is a pure function of the workouts handed in; storing
//! them is the caller's business.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::info;

use crate::models::{ExerciseType, WorkingSet, Workout};

/// Keep `best` unless `set` is strictly heavier, so ties go to the earlier set
fn heavier<'a>(best: Option<&'a WorkingSet>, set: &'a WorkingSet) -> Option<&'a WorkingSet> {
    match best {
        Some(b) if set.weight_kg <= b.weight_kg => Some(b),
        _ if set.weight_kg.is_finite() => Some(set),
        _ => best,
    }
}

/// Heaviest set in a session; the first one wins a tie
pub fn heaviest_set(sets: &[WorkingSet]) -> Option<&WorkingSet> {
    sets.iter().fold(None, heavier)
}

/// Most recent session for the lift. On equal dates the later entry wins.
pub fn latest_workout(workouts: &[Workout], exercise: ExerciseType) -> Option<&Workout> {
    workouts
        .iter()
        .filter(|w| w.exercise == exercise)
        .max_by_key(|w| w.date)
}

/// Heaviest set of the most recent session for the lift
pub fn last_top_set(workouts: &[Workout], exercise: ExerciseType) -> Option<&WorkingSet> {
    latest_workout(workouts, exercise).and_then(|w| heaviest_set(&w.sets))
}

/// Heaviest set ever logged for the lift. Unloaded sets never count.
pub fn all_time_top_set(workouts: &[Workout], exercise: ExerciseType) -> Option<&WorkingSet> {
    workouts
        .iter()
        .filter(|w| w.exercise == exercise)
        .flat_map(|w| &w.sets)
        .filter(|s| s.weight_kg > 0.0)
        .fold(None, heavier)
}

/// Mean RPE over the sets that recorded one, 0.0 when none did
pub fn average_rpe<'a>(sets: impl IntoIterator<Item = &'a WorkingSet>) -> f64 {
    let rpes: Vec<f64> = sets.into_iter().filter_map(|s| s.rpe).collect();
    if rpes.is_empty() {
        return 0.0;
    }
    rpes.iter().mean()
}

pub fn volume_by_exercise(workouts: &[Workout], exercise: ExerciseType) -> f64 {
    workouts
        .iter()
        .filter(|w| w.exercise == exercise)
        .map(Workout::total_volume)
        .sum()
}

/// Best lifted weight per competition lift, in kg
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecords {
    pub squat_kg: f64,
    pub bench_kg: f64,
    pub deadlift_kg: f64,
}

impl PersonalRecords {
    pub fn get(&self, exercise: ExerciseType) -> f64 {
        match exercise {
            ExerciseType::Squat => self.squat_kg,
            ExerciseType::Bench => self.bench_kg,
            ExerciseType::Deadlift => self.deadlift_kg,
        }
    }

    /// Max for percentage-based planning, `None` until one is recorded
    pub fn max_for(&self, exercise: ExerciseType) -> Option<f64> {
        Some(self.get(exercise)).filter(|max| *max > 0.0)
    }

    fn slot_mut(&mut self, exercise: ExerciseType) -> &mut f64 {
        match exercise {
            ExerciseType::Squat => &mut self.squat_kg,
            ExerciseType::Bench => &mut self.bench_kg,
            ExerciseType::Deadlift => &mut self.deadlift_kg,
        }
    }

    /// Raise the record when `weight_kg` strictly beats it. Returns whether it did.
    pub fn update(&mut self, exercise: ExerciseType, weight_kg: f64) -> bool {
        let slot = self.slot_mut(exercise);
        if weight_kg.is_finite() && weight_kg > *slot {
            *slot = weight_kg;
            true
        } else {
            false
        }
    }

    /// Apply a finished session; returns the new record if it set one
    pub fn check_workout(&mut self, workout: &Workout) -> Option<f64> {
        let top = heaviest_set(&workout.sets)?.weight_kg;
        let previous = self.get(workout.exercise);
        if !self.update(workout.exercise, top) {
            return None;
        }

        info!(
            exercise = %workout.exercise,
            previous_kg = previous,
            record_kg = top,
            "New personal record"
        );
        Some(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::ProgressionEngine;
    use crate::training_plan::{PlannedSet, SetLoad};
    use chrono::{Duration, Utc};

    fn session(days_ago: i64, exercise: ExerciseType, weights: &[f64]) -> Workout {
        let sets = weights
            .iter()
            .enumerate()
            .map(|(i, w)| WorkingSet::new(i as u32 + 1, *w, 3, Some(8.0)))
            .collect();
        Workout::new("Session", Utc::now() - Duration::days(days_ago), exercise).with_sets(sets)
    }

    fn log() -> Vec<Workout> {
        vec![
            session(14, ExerciseType::Squat, &[150.0, 170.0, 160.0]),
            session(2, ExerciseType::Squat, &[140.0, 155.0, 155.0, 150.0]),
            session(1, ExerciseType::Bench, &[100.0, 105.0]),
            session(7, ExerciseType::Squat, &[145.0, 160.0]),
        ]
    }

    #[test]
    fn test_heaviest_set_keeps_first_of_a_tie() {
        let workout = session(0, ExerciseType::Squat, &[140.0, 155.0, 155.0, 150.0]);
        let top = heaviest_set(&workout.sets).unwrap();
        assert_eq!(top.weight_kg, 155.0);
        assert_eq!(top.set_number, 2);
    }

    #[test]
    fn test_last_top_set_uses_latest_session() {
        let workouts = log();

        let last = last_top_set(&workouts, ExerciseType::Squat).unwrap();
        assert_eq!(last.weight_kg, 155.0);
        assert_eq!(last.set_number, 2);

        let best = all_time_top_set(&workouts, ExerciseType::Squat).unwrap();
        assert_eq!(best.weight_kg, 170.0);

        assert!(last_top_set(&workouts, ExerciseType::Deadlift).is_none());
    }

    #[test]
    fn test_top_set_feeds_progression_target() {
        let workouts = log();
        let engine = ProgressionEngine::default();

        let target =
            engine.target_top_set_weight(last_top_set(&workouts, ExerciseType::Squat), 100.0);
        assert_eq!(target, 157.5);

        let target =
            engine.target_top_set_weight(last_top_set(&workouts, ExerciseType::Deadlift), 100.0);
        assert_eq!(target, 100.0);
    }

    #[test]
    fn test_empty_history() {
        assert!(heaviest_set(&[]).is_none());
        assert!(latest_workout(&[], ExerciseType::Bench).is_none());
        assert!(last_top_set(&[], ExerciseType::Bench).is_none());
        assert!(all_time_top_set(&[], ExerciseType::Bench).is_none());
        assert_eq!(average_rpe(&[]), 0.0);
        assert_eq!(volume_by_exercise(&[], ExerciseType::Bench), 0.0);
    }

    #[test]
    fn test_unloaded_and_nan_sets_never_top() {
        let sets = vec![
            WorkingSet::new(1, f64::NAN, 5, None),
            WorkingSet::new(2, 60.0, 5, None),
        ];
        assert_eq!(heaviest_set(&sets).unwrap().set_number, 2);

        let bodyweight = vec![session(0, ExerciseType::Squat, &[0.0, 0.0])];
        assert!(all_time_top_set(&bodyweight, ExerciseType::Squat).is_none());
    }

    #[test]
    fn test_average_rpe_skips_unrated_sets() {
        let sets = vec![
            WorkingSet::new(1, 100.0, 5, Some(7.0)),
            WorkingSet::new(2, 100.0, 5, None),
            WorkingSet::new(3, 100.0, 5, Some(9.0)),
        ];
        assert!((average_rpe(&sets) - 8.0).abs() < 1e-9);
        assert_eq!(average_rpe(&sets[1..2]), 0.0);

        let workouts = log();
        assert!((average_rpe(workouts.iter().flat_map(|w| &w.sets)) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_by_exercise() {
        let workouts = log();
        // (100 + 105) × 3
        assert_eq!(volume_by_exercise(&workouts, ExerciseType::Bench), 615.0);
    }

    #[test]
    fn test_record_only_on_strictly_heavier() {
        let mut records = PersonalRecords {
            squat_kg: 160.0,
            ..PersonalRecords::default()
        };

        assert!(!records.update(ExerciseType::Squat, 160.0));
        assert!(!records.update(ExerciseType::Squat, 150.0));
        assert!(!records.update(ExerciseType::Squat, f64::NAN));
        assert_eq!(records.squat_kg, 160.0);

        assert!(records.update(ExerciseType::Squat, 162.5));
        assert_eq!(records.get(ExerciseType::Squat), 162.5);
    }

    #[test]
    fn test_check_workout() {
        let mut records = PersonalRecords::default();
        let workouts = log();

        assert_eq!(records.check_workout(&workouts[0]), Some(170.0));
        assert_eq!(records.check_workout(&workouts[1]), None);
        assert_eq!(records.check_workout(&workouts[2]), Some(105.0));
        assert_eq!(records.squat_kg, 170.0);
        assert_eq!(records.bench_kg, 105.0);

        let empty = Workout::new("Skipped", Utc::now(), ExerciseType::Deadlift);
        assert_eq!(records.check_workout(&empty), None);
    }

    #[test]
    fn test_records_resolve_percentage_sets() {
        let mut records = PersonalRecords::default();
        let planned = PlannedSet::new(1, SetLoad::Percentage { percent: 80.0 }, 3);

        assert_eq!(records.max_for(ExerciseType::Deadlift), None);
        assert_eq!(planned.resolve_weight(records.max_for(ExerciseType::Deadlift)), None);

        records.update(ExerciseType::Deadlift, 200.0);
        assert_eq!(
            planned.resolve_weight(records.max_for(ExerciseType::Deadlift)),
            Some(160.0)
        );
    }
}
