//! One-repetition maximum estimation
//!
//! Estimates the heaviest single from a submaximal set using the common
//! regression formulas. Brzycki and Lander both divide by a term that shrinks
//! with reps, so they are only defined up to a rep ceiling; past it an explicit
//! `FormulaError::DomainError` is returned instead of a meaningless number.

use serde::{Deserialize, Serialize};

use crate::error::FormulaError;

/// Fraction of the 1RM used as training max
pub const TRAINING_MAX_FACTOR: f64 = 0.9;

/// 1RM estimation formulas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OneRepMaxFormula {
    /// weight × (1 + reps/30)
    #[default]
    Epley,
    /// weight × 36 / (37 − reps)
    Brzycki,
    /// 100 × weight / (101.3 − 2.67123 × reps)
    Lander,
}

impl std::fmt::Display for OneRepMaxFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OneRepMaxFormula::Epley => write!(f, "Epley"),
            OneRepMaxFormula::Brzycki => write!(f, "Brzycki"),
            OneRepMaxFormula::Lander => write!(f, "Lander"),
        }
    }
}

impl std::str::FromStr for OneRepMaxFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "epley" => Ok(OneRepMaxFormula::Epley),
            "brzycki" => Ok(OneRepMaxFormula::Brzycki),
            "lander" => Ok(OneRepMaxFormula::Lander),
            _ => Err(format!("Unknown 1RM formula: {}", s)),
        }
    }
}

/// Estimated maximum with the formula that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedOneRepMax {
    pub value_kg: f64,
    pub formula: OneRepMaxFormula,
}

/// Pure 1RM calculator
pub struct OneRepMaxEstimator;

impl OneRepMaxEstimator {
    /// Estimate the 1RM for `reps` completed at `weight`
    pub fn estimate(weight: f64, reps: u32, formula: OneRepMaxFormula) -> Result<f64, FormulaError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(FormulaError::InvalidWeight { weight });
        }
        if reps == 0 {
            return Err(FormulaError::ZeroReps);
        }

        let reps_f = reps as f64;
        let denominator = match formula {
            OneRepMaxFormula::Epley => return Ok(weight * (1.0 + reps_f / 30.0)),
            OneRepMaxFormula::Brzycki => 37.0 - reps_f,
            OneRepMaxFormula::Lander => 101.3 - 2.67123 * reps_f,
        };

        if denominator <= 0.0 {
            return Err(FormulaError::DomainError {
                formula: formula.to_string(),
                reps,
            });
        }

        Ok(match formula {
            OneRepMaxFormula::Brzycki => weight * (36.0 / denominator),
            _ => (100.0 * weight) / denominator,
        })
    }

    /// Same as `estimate`, tagged with the formula
    pub fn estimate_detailed(
        weight: f64,
        reps: u32,
        formula: OneRepMaxFormula,
    ) -> Result<EstimatedOneRepMax, FormulaError> {
        Ok(EstimatedOneRepMax {
            value_kg: Self::estimate(weight, reps, formula)?,
            formula,
        })
    }

    /// Training max (90% of the 1RM)
    pub fn training_max(one_rep_max: f64) -> f64 {
        one_rep_max * TRAINING_MAX_FACTOR
    }

    /// Load expected to allow exactly `target_reps` (inverse Epley)
    pub fn weight_for_target_reps(one_rep_max: f64, target_reps: u32) -> f64 {
        one_rep_max / (1.0 + target_reps as f64 / 30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epley() {
        let estimate = OneRepMaxEstimator::estimate(100.0, 5, OneRepMaxFormula::Epley).unwrap();
        assert!((estimate - 116.6667).abs() < 0.001);

        // A single is worth slightly more than the weight under Epley
        let single = OneRepMaxEstimator::estimate(100.0, 1, OneRepMaxFormula::Epley).unwrap();
        assert!((single - 103.3333).abs() < 0.001);
    }

    #[test]
    fn test_brzycki() {
        // 100 × 36 / 32 = 112.5
        let estimate = OneRepMaxEstimator::estimate(100.0, 5, OneRepMaxFormula::Brzycki).unwrap();
        assert!((estimate - 112.5).abs() < 1e-9);

        let single = OneRepMaxEstimator::estimate(100.0, 1, OneRepMaxFormula::Brzycki).unwrap();
        assert!((single - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_lander() {
        // 10000 / (101.3 − 13.35615) ≈ 113.709
        let estimate = OneRepMaxEstimator::estimate(100.0, 5, OneRepMaxFormula::Lander).unwrap();
        assert!((estimate - 113.7089).abs() < 0.001);
    }

    #[test]
    fn test_brzycki_domain() {
        assert!(OneRepMaxEstimator::estimate(100.0, 36, OneRepMaxFormula::Brzycki).is_ok());

        let err = OneRepMaxEstimator::estimate(100.0, 37, OneRepMaxFormula::Brzycki).unwrap_err();
        assert_eq!(
            err,
            FormulaError::DomainError {
                formula: "Brzycki".to_string(),
                reps: 37
            }
        );
        assert!(OneRepMaxEstimator::estimate(100.0, 50, OneRepMaxFormula::Brzycki).is_err());
    }

    #[test]
    fn test_lander_domain() {
        // 2.67123 × 37 = 98.835 still leaves a positive denominator
        assert!(OneRepMaxEstimator::estimate(100.0, 37, OneRepMaxFormula::Lander).is_ok());
        assert!(matches!(
            OneRepMaxEstimator::estimate(100.0, 38, OneRepMaxFormula::Lander),
            Err(FormulaError::DomainError { .. })
        ));
    }

    #[test]
    fn test_epley_has_no_rep_ceiling() {
        let estimate = OneRepMaxEstimator::estimate(50.0, 60, OneRepMaxFormula::Epley).unwrap();
        assert!((estimate - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            OneRepMaxEstimator::estimate(100.0, 0, OneRepMaxFormula::Epley),
            Err(FormulaError::ZeroReps)
        );
        assert!(OneRepMaxEstimator::estimate(-5.0, 5, OneRepMaxFormula::Epley).is_err());
        assert!(OneRepMaxEstimator::estimate(f64::INFINITY, 5, OneRepMaxFormula::Lander).is_err());
    }

    #[test]
    fn test_training_max_and_target_reps() {
        assert!((OneRepMaxEstimator::training_max(200.0) - 180.0).abs() < 1e-9);

        // Inverse of Epley
        let one_rm = OneRepMaxEstimator::estimate(100.0, 5, OneRepMaxFormula::Epley).unwrap();
        let weight = OneRepMaxEstimator::weight_for_target_reps(one_rm, 5);
        assert!((weight - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_detailed_and_parsing() {
        let detailed =
            OneRepMaxEstimator::estimate_detailed(140.0, 3, OneRepMaxFormula::Brzycki).unwrap();
        assert_eq!(detailed.formula, OneRepMaxFormula::Brzycki);
        assert!((detailed.value_kg - 148.2353).abs() < 0.001);

        assert_eq!("lander".parse::<OneRepMaxFormula>().unwrap(), OneRepMaxFormula::Lander);
        assert_eq!(OneRepMaxFormula::default(), OneRepMaxFormula::Epley);
    }
}
