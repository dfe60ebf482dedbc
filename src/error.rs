//! Unified error hierarchy for LiftRS
//!
//! Every failure in the numeric core is a local, recoverable condition returned
//! to the caller as a typed result. Nothing in this crate should bring down the
//! host process because of bad input from a tracker or a user form.

use thiserror::Error;

/// Top-level error type for all LiftRS operations
#[derive(Debug, Error)]
pub enum LiftRsError {
    /// Calibration could not be established for a tracking session
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    /// One-rep-max formula evaluated outside its domain
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Rejected set data (reps, RPE or weight)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Recorded data could not be read
    #[error("Import error: {0}")]
    Import(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Calibration failures. Fatal to starting a session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// Reference object height must be positive
    #[error("Reference object height must be positive, got {height_cm} cm")]
    NonPositiveReference { height_cm: f64 },

    /// Derived pixels-per-centimetre scale must be positive
    #[error("Pixels per cm must be positive, got {pixels_per_cm}")]
    NonPositiveScale { pixels_per_cm: f64 },

    /// Image dimensions are unusable
    #[error("Invalid image size: {width_px}x{height_px}")]
    InvalidImageSize { width_px: f64, height_px: f64 },
}

/// One-rep-max estimation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Denominator of the formula is zero or negative for this rep count
    #[error("{formula} formula is undefined for {reps} reps")]
    DomainError { formula: String, reps: u32 },

    /// Weight is negative or not a finite number
    #[error("Weight must be a finite, non-negative number, got {weight}")]
    InvalidWeight { weight: f64 },

    /// A set of zero reps has no estimated maximum
    #[error("Rep count must be at least 1")]
    ZeroReps,
}

/// Invalid set data handed to the progression engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Rep count must be at least 1")]
    ZeroReps,

    #[error("RPE must be within 0-10, got {rpe}")]
    RpeOutOfRange { rpe: f64 },

    #[error("Weight must be a finite, non-negative number, got {weight}")]
    InvalidWeight { weight: f64 },
}

/// Result type alias for LiftRS operations
pub type Result<T> = std::result::Result<T, LiftRsError>;

impl LiftRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftRsError::Calibration(_) => ErrorSeverity::Error,
            LiftRsError::Formula(FormulaError::DomainError { .. }) => ErrorSeverity::Warning,
            LiftRsError::Formula(_) => ErrorSeverity::Warning,
            LiftRsError::InvalidInput(_) => ErrorSeverity::Warning,
            LiftRsError::Configuration(_) => ErrorSeverity::Error,
            LiftRsError::Import(_) => ErrorSeverity::Error,
            LiftRsError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftRsError::Calibration(_) => {
                "Could not calibrate the camera. Make sure the whole plate is inside the selection."
                    .to_string()
            }
            LiftRsError::Formula(FormulaError::DomainError { formula, reps }) => {
                format!(
                    "The {} formula cannot estimate a max from {} reps. Try the Epley formula.",
                    formula, reps
                )
            }
            LiftRsError::InvalidInput(InputError::RpeOutOfRange { rpe }) => {
                format!("RPE {} is outside the 0-10 scale.", rpe)
            }
            LiftRsError::InvalidInput(InputError::ZeroReps) => {
                "A set needs at least one rep.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = LiftRsError::from(CalibrationError::NonPositiveReference { height_cm: 0.0 });
        assert_eq!(err.severity(), ErrorSeverity::Error);

        let err = LiftRsError::from(InputError::ZeroReps);
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_user_messages() {
        let err = LiftRsError::from(FormulaError::DomainError {
            formula: "Brzycki".to_string(),
            reps: 37,
        });
        assert!(err.user_message().contains("Brzycki"));
        assert!(err.user_message().contains("37"));

        let err = LiftRsError::from(InputError::RpeOutOfRange { rpe: 11.0 });
        assert!(err.user_message().contains("0-10"));
    }

    #[test]
    fn test_display_includes_source() {
        let err = LiftRsError::from(CalibrationError::NonPositiveScale { pixels_per_cm: -1.0 });
        assert!(err.to_string().starts_with("Calibration error"));
    }
}
