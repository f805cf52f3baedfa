//! Eight-way compass classification of bearings.

use std::f64::consts::{FRAC_PI_4, FRAC_PI_8};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::radian;

/// One of the eight compass sectors, each 45° wide and centred on its
/// direction. North covers `[-π/8, π/8)`, the rest follow clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    Northeast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    Southeast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    Southwest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    Northwest,
}

impl CardinalDirection {
    /// All directions, clockwise from north.
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::North,
        CardinalDirection::Northeast,
        CardinalDirection::East,
        CardinalDirection::Southeast,
        CardinalDirection::South,
        CardinalDirection::Southwest,
        CardinalDirection::West,
        CardinalDirection::Northwest,
    ];

    /// Classify a bearing in radians clockwise from north.
    pub fn from_radians(bearing: f64) -> Self {
        let index = (radian::normalize(bearing + FRAC_PI_8) / FRAC_PI_4).floor() as usize;
        // a value just under 2π can divide out to exactly 8.0
        Self::ALL[index.min(7)]
    }

    /// One or two letter abbreviation ("N", "NE", ...).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            CardinalDirection::North => "N",
            CardinalDirection::Northeast => "NE",
            CardinalDirection::East => "E",
            CardinalDirection::Southeast => "SE",
            CardinalDirection::South => "S",
            CardinalDirection::Southwest => "SW",
            CardinalDirection::West => "W",
            CardinalDirection::Northwest => "NW",
        }
    }

    /// Full lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            CardinalDirection::North => "north",
            CardinalDirection::Northeast => "northeast",
            CardinalDirection::East => "east",
            CardinalDirection::Southeast => "southeast",
            CardinalDirection::South => "south",
            CardinalDirection::Southwest => "southwest",
            CardinalDirection::West => "west",
            CardinalDirection::Northwest => "northwest",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Returned when a string names no compass direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for CardinalDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.abbreviation().eq_ignore_ascii_case(&needle) || d.name() == needle)
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// Convenience wrapper over [`CardinalDirection::from_radians`].
pub fn classify_direction(bearing: f64) -> CardinalDirection {
    CardinalDirection::from_radians(bearing)
}
