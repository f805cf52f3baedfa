//! Position and orientation of an object on the ground.

use serde::{Deserialize, Serialize};

use crate::direction::CardinalDirection;
use crate::gps::GpsLocation;
use crate::radian;

/// Where an object is and which way it faces.
///
/// Either half may be missing: a sighting can be located without an
/// orientation, and a consensus can fail to produce a location.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Geotag {
    /// GPS location of the object
    pub location: Option<GpsLocation>,

    /// Orientation in radians clockwise from north, not necessarily normalized
    pub bearing: Option<f64>,
}

impl Geotag {
    pub fn new(location: Option<GpsLocation>, bearing: Option<f64>) -> Self {
        Self { location, bearing }
    }

    /// Compass sector of the bearing, if there is one.
    pub fn direction(&self) -> Option<CardinalDirection> {
        self.bearing.map(CardinalDirection::from_radians)
    }

    /// True when both location and bearing are present.
    pub fn is_complete(&self) -> bool {
        self.location.is_some() && self.bearing.is_some()
    }
}

impl PartialEq for Geotag {
    /// Bearings compare after normalization; locations compare exactly.
    fn eq(&self, other: &Self) -> bool {
        radian::equals(self.bearing, other.bearing) && self.location == other.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn loc(lat: f64, lon: f64) -> Option<GpsLocation> {
        Some(GpsLocation::new(lat, lon).unwrap())
    }

    #[test]
    fn test_equality_normalizes_bearing() {
        let a = Geotag::new(loc(1.0, 2.0), Some(PI / 2.0));
        let b = Geotag::new(loc(1.0, 2.0), Some(PI / 2.0 + TAU));
        assert_eq!(a, b);
    }

    #[test]
    fn test_inequality() {
        let a = Geotag::new(loc(1.0, 2.0), Some(0.5));
        assert_ne!(a, Geotag::new(loc(1.0, 2.0), Some(0.6)));
        assert_ne!(a, Geotag::new(loc(1.0, 2.5), Some(0.5)));
        assert_ne!(a, Geotag::new(loc(1.0, 2.0), None));
        assert_ne!(a, Geotag::new(None, Some(0.5)));
    }

    #[test]
    fn test_empty_geotags_equal() {
        assert_eq!(Geotag::default(), Geotag::new(None, None));
    }

    #[test]
    fn test_direction() {
        let tag = Geotag::new(None, Some(PI));
        assert_eq!(tag.direction(), Some(CardinalDirection::South));
        assert_eq!(Geotag::default().direction(), None);
        assert!(!tag.is_complete());
    }
}
