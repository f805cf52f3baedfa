//! Validated WGS84 latitude/longitude pairs.

use geo::{EuclideanDistance, Point};
use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::stats;

/// Maximum absolute latitude in degrees
pub const ABS_LATITUDE_BOUND: f64 = 90.0;

/// Maximum absolute longitude in degrees
pub const ABS_LONGITUDE_BOUND: f64 = 180.0;

/// A GPS location in degrees.
///
/// Construction and mutation are validated, so a `GpsLocation` always holds
/// finite, in-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGpsLocation")]
pub struct GpsLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGpsLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGpsLocation> for GpsLocation {
    type Error = GeoError;

    fn try_from(raw: RawGpsLocation) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GpsLocation {
    /// Create a location, rejecting out-of-range or NaN components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        check_latitude(latitude)?;
        check_longitude(longitude)?;
        Ok(Self { latitude, longitude })
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Replace the latitude. The location is unchanged on error.
    pub fn set_latitude(&mut self, latitude: f64) -> Result<(), GeoError> {
        check_latitude(latitude)?;
        self.latitude = latitude;
        Ok(())
    }

    /// Replace the longitude. The location is unchanged on error.
    pub fn set_longitude(&mut self, longitude: f64) -> Result<(), GeoError> {
        check_longitude(longitude)?;
        self.longitude = longitude;
        Ok(())
    }

    /// Planar distance in degrees on the (latitude, longitude) plane.
    ///
    /// This is not a geodesic distance. It ignores meridian convergence and
    /// the antimeridian, and is only meaningful over short baselines such as
    /// the spread of detections of a single object.
    pub fn euclidean_distance(&self, other: &GpsLocation) -> f64 {
        Point::from(*self).euclidean_distance(&Point::from(*other))
    }

    /// Element-wise median: latitudes and longitudes are medianed
    /// independently, averaging the middle pair on even counts.
    ///
    /// Returns `None` for an empty slice.
    pub fn median(locations: &[GpsLocation]) -> Option<GpsLocation> {
        let latitudes: Vec<f64> = locations.iter().map(GpsLocation::latitude).collect();
        let longitudes: Vec<f64> = locations.iter().map(GpsLocation::longitude).collect();

        let latitude = stats::median(&latitudes)?;
        let longitude = stats::median(&longitudes)?;
        Self::new(latitude, longitude).ok()
    }
}

impl From<GpsLocation> for Point<f64> {
    fn from(location: GpsLocation) -> Self {
        Point::new(location.longitude, location.latitude)
    }
}

impl TryFrom<Point<f64>> for GpsLocation {
    type Error = GeoError;

    fn try_from(point: Point<f64>) -> Result<Self, Self::Error> {
        Self::new(point.y(), point.x())
    }
}

fn check_latitude(latitude: f64) -> Result<(), GeoError> {
    if latitude.abs() <= ABS_LATITUDE_BOUND {
        Ok(())
    } else {
        Err(GeoError::InvalidLatitude(latitude))
    }
}

fn check_longitude(longitude: f64) -> Result<(), GeoError> {
    if longitude.abs() <= ABS_LONGITUDE_BOUND {
        Ok(())
    } else {
        Err(GeoError::InvalidLongitude(longitude))
    }
}
