//! Geotag Core - Ground-station geolocation for aerial target detection
//!
//! Turns pixel annotations on aerial images into ground locations and
//! reduces many noisy observations into few authoritative ones:
//! 1. **Projection**: pixel + aircraft telemetry → GPS location and bearing
//! 2. **Consensus**: all sightings of one target → one geotag, weighing
//!    human and automatic taggers
//! 3. **Clustering**: duplicate ROI detections → one median point per group
//!
//! Every entry point is a synchronous pure function of its arguments. The
//! record store, transport and relay layers around it own persistence and
//! must serialize recomputation per target or ROI batch.

pub mod error;
pub mod stats;
pub mod radian;
pub mod gps;
pub mod direction;
pub mod geotag;
pub mod projection;
pub mod telemetry;
pub mod consensus;
pub mod cluster;
pub mod config;

// Re-export key types for convenience
pub use cluster::{cluster, label_clusters, refresh_derived, CameraGimbalMode, ClusterConfig, Roi};
pub use config::{GeotagConfig, PolicyKind};
pub use consensus::{
    aggregate_consensus, recompute_target, ClientType, ConsensusPolicy, ConsensusWeights,
    Observation, SightingRecord, TargetConsensus,
};
pub use direction::{classify_direction, CardinalDirection};
pub use error::{ConfigError, GeoError, ProjectionError};
pub use geotag::Geotag;
pub use gps::GpsLocation;
pub use projection::{project, FieldOfView, ImageDimensions, ProjectionInput};
pub use telemetry::{GimbalOrientation, ImageMode, PixelTag, TelemetrySnapshot};
