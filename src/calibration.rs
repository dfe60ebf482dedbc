//! Pixel to centimetre calibration
//!
//! A plate of known diameter is selected at the start of a lift. Its bounding
//! box height in the image fixes the pixels-per-centimetre scale used for every
//! later displacement measurement in that session.

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Standard competition plate diameter
pub const DEFAULT_REFERENCE_HEIGHT_CM: f64 = 45.0;

/// Calibration settings stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    /// Physical height of the reference object in centimetres
    pub reference_object_height_cm: f64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            reference_object_height_cm: DEFAULT_REFERENCE_HEIGHT_CM,
        }
    }
}

/// Established calibration for one tracking session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReference {
    pub reference_object_height_cm: f64,
    pub pixels_per_cm: f64,
    pub image_height_px: f64,
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl CalibrationReference {
    /// Establish the scale from the reference object's normalized bounding box height
    ///
    /// `pixels_per_cm = (bbox_height_normalized * image_height_px) / reference_object_height_cm`
    pub fn establish(
        initial_bbox_height_normalized: f64,
        image_height_px: f64,
        reference_object_height_cm: f64,
    ) -> Result<Self, CalibrationError> {
        if !is_positive(reference_object_height_cm) {
            return Err(CalibrationError::NonPositiveReference {
                height_cm: reference_object_height_cm,
            });
        }

        let pixels_per_cm =
            (initial_bbox_height_normalized * image_height_px) / reference_object_height_cm;
        if !is_positive(pixels_per_cm) {
            return Err(CalibrationError::NonPositiveScale { pixels_per_cm });
        }

        Ok(Self {
            reference_object_height_cm,
            pixels_per_cm,
            image_height_px,
        })
    }

    /// Convert a normalized vertical displacement into centimetres
    pub fn convert(&self, pixel_delta_normalized: f64, image_height_px: f64) -> f64 {
        (pixel_delta_normalized * image_height_px) / self.pixels_per_cm
    }

    /// Convert using the image height the session was calibrated against
    pub fn to_cm(&self, pixel_delta_normalized: f64) -> f64 {
        self.convert(pixel_delta_normalized, self.image_height_px)
    }
}
