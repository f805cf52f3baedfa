//! Error types for the geotagging engine.
//!
//! Only genuine failures are errors. An aggregate over zero usable inputs,
//! or a computed location that fails validation, is reported as `None` by
//! the operation that produced it.

use std::path::PathBuf;

use thiserror::Error;

/// A latitude/longitude pair outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is outside [-90, 90] or not a number
    #[error("Invalid location: latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude is outside [-180, 180] or not a number
    #[error("Invalid location: longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// Reasons a sighting cannot be handed to the projection engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// A telemetry field required for projection is absent or not finite
    #[error("Incomplete telemetry: missing {0}")]
    MissingTelemetry(&'static str),

    /// Aircraft altitude is zero, negative or NaN
    #[error("Non-positive altitude: {0}m")]
    NonPositiveAltitude(f64),

    /// Image has a zero width or height
    #[error("Image has no pixels")]
    EmptyImage,

    /// Off-axis images are not nadir-pointing and cannot be geotagged
    #[error("Off-axis images cannot be geotagged")]
    OffAxisImage,

    /// The projected point is not a valid coordinate
    #[error(transparent)]
    InvalidLocation(#[from] GeoError),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document is not valid JSON for the expected shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Consensus weights are negative, non-finite or both zero
    #[error("Invalid consensus weights: manual={manual}, automatic={automatic}")]
    InvalidWeights { manual: f64, automatic: f64 },

    /// Clustering radius is not a positive finite number
    #[error("Invalid clustering epsilon: {0}")]
    InvalidEpsilon(f64),

    /// Image dimensions contain a zero
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },
}

impl ConfigError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
