//! The "PROJECTION" Engine - pixel → GPS for a nadir-pointing camera
//!
//! Converts a pixel annotation in an aerial image into the ground location
//! it depicts, using the aircraft's position, altitude and yaw at capture
//! time. The pipeline is:
//! 1. Ground footprint of the image from altitude and field of view
//! 2. Pixel offset from the image centre (y flipped so "up" is positive)
//! 3. Metric offset in the aircraft frame
//! 4. Clockwise yaw rotation into an East/North frame
//! 5. Inverse-haversine destination from the aircraft position
//!
//! The earth is treated as locally flat for steps 1-4, which is adequate
//! for the few hundred metres an image covers.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::geotag::Geotag;
use crate::gps::GpsLocation;
use crate::radian;

/// Mean earth radius in metres
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

// ============================================================================
// CAMERA GEOMETRY
// ============================================================================

/// Camera field of view in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// Horizontal (image width) field of view
    pub horizontal: f64,

    /// Vertical (image height) field of view
    pub vertical: f64,
}

impl FieldOfView {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Build from angles given in degrees.
    pub fn from_degrees(horizontal: f64, vertical: f64) -> Self {
        Self::new(horizontal.to_radians(), vertical.to_radians())
    }
}

/// Image size in pixels. A missing side takes the survey camera's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageDimensions {
    fn default() -> Self {
        // Full-resolution frame of the survey camera
        Self {
            width: 5456,
            height: 3632,
        }
    }
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel coordinates of the image centre.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Size of the ground area covered by one image, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width_m: f64,
    pub height_m: f64,
}

impl Footprint {
    /// `2 · altitude · tan(fov / 2)` along each image axis.
    pub fn new(altitude_m: f64, fov: &FieldOfView) -> Self {
        Self {
            width_m: 2.0 * altitude_m * (fov.horizontal / 2.0).tan(),
            height_m: 2.0 * altitude_m * (fov.vertical / 2.0).tan(),
        }
    }

    /// Metres of ground per pixel along (x, y).
    pub fn metres_per_pixel(&self, image: &ImageDimensions) -> (f64, f64) {
        (
            self.width_m / image.width as f64,
            self.height_m / image.height as f64,
        )
    }
}

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

/// Everything the engine needs to project one pixel.
///
/// Callers must supply complete telemetry; see
/// [`TelemetrySnapshot::to_input`](crate::telemetry::TelemetrySnapshot::to_input)
/// for the guarded construction path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Aircraft position at capture time
    pub aircraft: GpsLocation,

    /// Height above ground in metres
    pub altitude_m: f64,

    /// Aircraft yaw in radians, clockwise from north
    pub yaw: f64,

    /// Pixel column of the annotation
    pub pixel_x: f64,

    /// Pixel row of the annotation (0 at the top of the image)
    pub pixel_y: f64,

    pub image: ImageDimensions,

    pub fov: FieldOfView,

    /// Orientation of the object relative to the top of the image, in radians
    pub radians_from_top: Option<f64>,
}

/// Ground offset from the aircraft to the target in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundOffset {
    pub east_m: f64,
    pub north_m: f64,
}

impl GroundOffset {
    /// Straight-line ground distance.
    pub fn distance_m(&self) -> f64 {
        self.east_m.hypot(self.north_m)
    }

    /// Bearing of the offset in radians clockwise from north.
    pub fn bearing(&self) -> f64 {
        radian::normalize(self.east_m.atan2(self.north_m))
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Steps 1-4: the East/North offset of the annotated pixel.
pub fn ground_offset(input: &ProjectionInput) -> GroundOffset {
    let footprint = Footprint::new(input.altitude_m, &input.fov);
    let (mpp_x, mpp_y) = footprint.metres_per_pixel(&input.image);

    let (cx, cy) = input.image.center();
    let delta_x = input.pixel_x - cx;
    let delta_y = cy - input.pixel_y;

    let local = Vector2::new(delta_x * mpp_x, delta_y * mpp_y);

    // Clockwise rotation by yaw: image "up" points along the aircraft heading
    let world = Rotation2::new(-input.yaw) * local;

    GroundOffset {
        east_m: world.x,
        north_m: world.y,
    }
}

/// Inverse haversine: the point `distance_m` away from `origin` along
/// `bearing` (radians clockwise from north), as raw (latitude, longitude)
/// degrees.
///
/// The longitude delta is added to the origin without wrapping, so a
/// destination across the antimeridian or over a pole comes back outside
/// `[-180, 180]`.
pub fn destination(origin: &GpsLocation, bearing: f64, distance_m: f64) -> (f64, f64) {
    let lat1 = origin.latitude().to_radians();
    let lon1 = origin.longitude().to_radians();
    let angular = distance_m / MEAN_EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let delta_lon = (bearing.sin() * angular.sin() * lat1.cos())
        .atan2(angular.cos() - lat1.sin() * lat2.sin());

    (lat2.to_degrees(), (lon1 + delta_lon).to_degrees())
}

/// Steps 1-5: the GPS location of the annotated pixel.
///
/// Fails with [`ProjectionError::InvalidLocation`] when the destination
/// falls outside the valid coordinate range, which happens next to the
/// antimeridian or a pole.
pub fn project_pixel(input: &ProjectionInput) -> Result<GpsLocation, ProjectionError> {
    let offset = ground_offset(input);
    let (latitude, longitude) = destination(&input.aircraft, offset.bearing(), offset.distance_m());
    Ok(GpsLocation::new(latitude, longitude)?)
}

/// Orientation of the object in radians clockwise from north.
pub fn target_bearing(yaw: f64, radians_from_top: f64) -> f64 {
    radian::add(yaw, radians_from_top)
}

/// Project a sighting into a geotag.
///
/// Returns `None` when the projected location is invalid; the failure is
/// logged here and not propagated.
pub fn project(input: &ProjectionInput) -> Option<Geotag> {
    match project_pixel(input) {
        Ok(location) => {
            let bearing = input
                .radians_from_top
                .map(|from_top| target_bearing(input.yaw, from_top));
            Some(Geotag::new(Some(location), bearing))
        }
        Err(e) => {
            tracing::warn!(
                "Projection of pixel ({}, {}) from {:?} failed: {}",
                input.pixel_x,
                input.pixel_y,
                input.aircraft,
                e
            );
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
