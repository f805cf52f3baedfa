//! Aircraft telemetry as recorded alongside each image, and the guard that
//! turns it into a complete [`ProjectionInput`].
//!
//! Telemetry arrives from the aircraft with gaps. The projection engine
//! assumes complete inputs, so every path into it goes through
//! [`TelemetrySnapshot::to_input`].

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::gps::GpsLocation;
use crate::projection::{FieldOfView, ImageDimensions, ProjectionInput};

/// Gimbal angles in degrees. (0, 0) points straight down.
///
/// Roll is positive towards the left wing, pitch positive towards the tail.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GimbalOrientation {
    pub roll: f64,
    pub pitch: f64,
}

impl GimbalOrientation {
    /// Angles closer than this compare equal
    pub const ACCEPTABLE_ERROR: f64 = 1e-4;

    pub fn new(roll: f64, pitch: f64) -> Self {
        Self { roll, pitch }
    }
}

impl PartialEq for GimbalOrientation {
    fn eq(&self, other: &Self) -> bool {
        (self.roll - other.roll).abs() <= Self::ACCEPTABLE_ERROR
            && (self.pitch - other.pitch).abs() <= Self::ACCEPTABLE_ERROR
    }
}

/// How the camera was pointed when an image was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageMode {
    #[default]
    Fixed,
    Tracking,
    OffAxis,
}

/// A pixel annotation within one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelTag {
    pub x: f64,
    pub y: f64,

    /// Orientation of the object relative to the image top, in radians
    #[serde(default)]
    pub radians_from_top: Option<f64>,
}

/// Telemetry closest in time to an image capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySnapshot {
    pub location: Option<GpsLocation>,

    /// Height above ground in metres
    pub altitude_m: Option<f64>,

    /// Plane yaw in degrees, clockwise from north
    pub plane_yaw_deg: Option<f64>,

    pub gimbal: Option<GimbalOrientation>,

    /// Camera field of view in radians
    pub fov: Option<FieldOfView>,
}

impl TelemetrySnapshot {
    /// Check completeness and build the engine input for one annotation.
    ///
    /// Fails on the first missing or unusable field, on a non-positive
    /// altitude, on an empty image, or when the image is off-axis.
    pub fn to_input(
        &self,
        pixel: &PixelTag,
        image: ImageDimensions,
        mode: ImageMode,
    ) -> Result<ProjectionInput, ProjectionError> {
        if mode == ImageMode::OffAxis {
            return Err(ProjectionError::OffAxisImage);
        }
        if image.width == 0 || image.height == 0 {
            return Err(ProjectionError::EmptyImage);
        }

        let aircraft = self
            .location
            .ok_or(ProjectionError::MissingTelemetry("location"))?;
        let altitude_m = self
            .altitude_m
            .ok_or(ProjectionError::MissingTelemetry("altitude"))?;
        let yaw_deg = self
            .plane_yaw_deg
            .filter(|y| y.is_finite())
            .ok_or(ProjectionError::MissingTelemetry("plane_yaw"))?;
        let fov = self
            .fov
            .filter(|f| f.horizontal.is_finite() && f.vertical.is_finite())
            .ok_or(ProjectionError::MissingTelemetry("fov"))?;

        if !(altitude_m > 0.0) {
            return Err(ProjectionError::NonPositiveAltitude(altitude_m));
        }
        if !pixel.x.is_finite() || !pixel.y.is_finite() {
            return Err(ProjectionError::MissingTelemetry("pixel"));
        }

        Ok(ProjectionInput {
            aircraft,
            altitude_m,
            yaw: yaw_deg.to_radians(),
            pixel_x: pixel.x,
            pixel_y: pixel.y,
            image,
            fov,
            radians_from_top: pixel.radians_from_top,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn complete() -> TelemetrySnapshot {
        TelemetrySnapshot {
            location: Some(GpsLocation::new(38.14, -76.43).unwrap()),
            altitude_m: Some(75.0),
            plane_yaw_deg: Some(90.0),
            gimbal: Some(GimbalOrientation::default()),
            fov: Some(FieldOfView::from_degrees(60.0, 45.0)),
        }
    }

    fn tag() -> PixelTag {
        PixelTag {
            x: 100.0,
            y: 200.0,
            radians_from_top: Some(0.25),
        }
    }

    #[test]
    fn test_complete_snapshot_converts() {
        let input = complete()
            .to_input(&tag(), ImageDimensions::default(), ImageMode::Fixed)
            .unwrap();
        assert_abs_diff_eq!(input.yaw, FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(input.altitude_m, 75.0);
        assert_eq!(input.pixel_x, 100.0);
        assert_eq!(input.radians_from_top, Some(0.25));
    }

    #[test]
    fn test_missing_fields_reported() {
        let image = ImageDimensions::default();

        let mut snap = complete();
        snap.location = None;
        assert_eq!(
            snap.to_input(&tag(), image, ImageMode::Fixed),
            Err(ProjectionError::MissingTelemetry("location"))
        );

        let mut snap = complete();
        snap.altitude_m = None;
        assert_eq!(
            snap.to_input(&tag(), image, ImageMode::Tracking),
            Err(ProjectionError::MissingTelemetry("altitude"))
        );

        let mut snap = complete();
        snap.plane_yaw_deg = Some(f64::NAN);
        assert_eq!(
            snap.to_input(&tag(), image, ImageMode::Fixed),
            Err(ProjectionError::MissingTelemetry("plane_yaw"))
        );

        let mut snap = complete();
        snap.fov = None;
        assert_eq!(
            snap.to_input(&tag(), image, ImageMode::Fixed),
            Err(ProjectionError::MissingTelemetry("fov"))
        );
    }

    #[test]
    fn test_non_positive_altitude_rejected() {
        let mut snap = complete();
        snap.altitude_m = Some(0.0);
        assert_eq!(
            snap.to_input(&tag(), ImageDimensions::default(), ImageMode::Fixed),
            Err(ProjectionError::NonPositiveAltitude(0.0))
        );
    }

    #[test]
    fn test_off_axis_and_empty_image_rejected() {
        let snap = complete();
        assert_eq!(
            snap.to_input(&tag(), ImageDimensions::default(), ImageMode::OffAxis),
            Err(ProjectionError::OffAxisImage)
        );
        assert_eq!(
            snap.to_input(&tag(), ImageDimensions::new(0, 10), ImageMode::Fixed),
            Err(ProjectionError::EmptyImage)
        );
    }

    #[test]
    fn test_gimbal_tolerance() {
        assert_eq!(
            GimbalOrientation::new(1.0, 2.0),
            GimbalOrientation::new(1.00005, 2.0)
        );
        assert_ne!(
            GimbalOrientation::new(1.0, 2.0),
            GimbalOrientation::new(1.001, 2.0)
        );
    }

    #[test]
    fn test_partial_snapshot_deserializes() {
        let snap: TelemetrySnapshot = serde_json::from_str(r#"{"altitude_m": 50.0}"#).unwrap();
        assert_eq!(snap.altitude_m, Some(50.0));
        assert!(snap.location.is_none());

        let mode: ImageMode = serde_json::from_str("\"off-axis\"").unwrap();
        assert_eq!(mode, ImageMode::OffAxis);
    }
}
