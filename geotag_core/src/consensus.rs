//! The "CONSENSUS" Engine - one geotag per target from many sightings
//!
//! A target is usually tagged several times, by human (MDLC) taggers and by
//! the automatic (ADLC) detector. Their per-sighting geotags are reduced to
//! a single consensus geotag by one of two policies:
//! - **Weighted average**: median of the manual group and median of the
//!   automatic group, combined with configurable weights
//! - **Median**: element-wise median over every complete geotag
//!
//! Both are pure functions of the current sighting set. Recomputing from the
//! same snapshot always yields the same consensus.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::geotag::Geotag;
use crate::gps::GpsLocation;
use crate::radian;
use crate::stats;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Relative trust in manual vs automatic observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusWeights {
    manual: f64,
    automatic: f64,
}

impl Default for ConsensusWeights {
    fn default() -> Self {
        Self {
            manual: 0.5,
            automatic: 0.5,
        }
    }
}

impl ConsensusWeights {
    /// Weights must be finite, non-negative, and not both zero.
    pub fn new(manual: f64, automatic: f64) -> Result<Self, ConfigError> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(manual) || !valid(automatic) || manual + automatic <= 0.0 {
            return Err(ConfigError::InvalidWeights { manual, automatic });
        }
        Ok(Self { manual, automatic })
    }

    pub fn manual(&self) -> f64 {
        self.manual
    }

    pub fn automatic(&self) -> f64 {
        self.automatic
    }
}

/// Which reduction to apply to a target's sightings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConsensusPolicy {
    WeightedAverage(ConsensusWeights),
    #[default]
    Median,
}

impl ConsensusPolicy {
    /// Reduce the observations under this policy.
    pub fn aggregate(&self, observations: &[Observation]) -> Option<Geotag> {
        match self {
            ConsensusPolicy::WeightedAverage(weights) => weighted_average(observations, weights),
            ConsensusPolicy::Median => median(observations),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConsensusPolicy::WeightedAverage(_) => "weighted_average",
            ConsensusPolicy::Median => "median",
        }
    }
}

// ============================================================================
// INPUTS
// ============================================================================

/// Which client produced a sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Manual detection, localization and classification (human tagger)
    Mdlc,
    /// Automatic detection, localization and classification
    Adlc,
}

impl ClientType {
    pub fn is_manual(&self) -> bool {
        matches!(self, ClientType::Mdlc)
    }
}

/// One sighting's geotag with its trust level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub geotag: Geotag,
    pub is_manual: bool,
}

impl Observation {
    pub fn new(geotag: Geotag, is_manual: bool) -> Self {
        Self { geotag, is_manual }
    }

    pub fn manual(geotag: Geotag) -> Self {
        Self::new(geotag, true)
    }

    pub fn automatic(geotag: Geotag) -> Self {
        Self::new(geotag, false)
    }
}

/// A sighting as held by the record store, reduced to what consensus needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub id: Uuid,
    pub client: ClientType,

    /// `None` when the sighting could not be geotagged
    #[serde(default)]
    pub geotag: Option<Geotag>,
}

impl SightingRecord {
    pub fn observation(&self) -> Option<Observation> {
        self.geotag
            .map(|geotag| Observation::new(geotag, self.client.is_manual()))
    }
}

/// Result of recomputing one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConsensus {
    pub target_id: Uuid,

    /// `None` when no sighting contributed a usable geotag
    pub geotag: Option<Geotag>,

    /// Number of sightings that carried a geotag
    pub contributing: usize,
}

// ============================================================================
// POLICIES
// ============================================================================

/// Weighted average of the manual-group median and automatic-group median.
///
/// Observations without a location are skipped. A group with no members is
/// dropped and the weights renormalized over the groups present. The
/// bearing is the median of any bearings the located observations carry;
/// a missing bearing never excludes an observation.
///
/// Returns `None` for zero located observations, or when the combined point
/// is not a valid coordinate (for example when the only present group has
/// weight zero).
pub fn weighted_average(observations: &[Observation], weights: &ConsensusWeights) -> Option<Geotag> {
    let located: Vec<(&Observation, GpsLocation)> = observations
        .iter()
        .filter_map(|o| o.geotag.location.map(|loc| (o, loc)))
        .collect();

    if located.is_empty() {
        return None;
    }

    let group_median = |manual: bool| -> Option<(f64, f64)> {
        let (lats, lons): (Vec<f64>, Vec<f64>) = located
            .iter()
            .filter(|(o, _)| o.is_manual == manual)
            .map(|(_, loc)| (loc.latitude(), loc.longitude()))
            .unzip();
        Some((stats::median(&lats)?, stats::median(&lons)?))
    };

    let groups = [
        (group_median(true), weights.manual),
        (group_median(false), weights.automatic),
    ];

    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut weight_sum = 0.0;
    for ((lat, lon), weight) in groups.iter().filter_map(|(m, w)| m.map(|m| (m, *w))) {
        lat_sum += lat * weight;
        lon_sum += lon * weight;
        weight_sum += weight;
    }

    let (lat, lon) = (lat_sum / weight_sum, lon_sum / weight_sum);
    let location = match GpsLocation::new(lat, lon) {
        Ok(loc) => loc,
        Err(e) => {
            tracing::warn!(
                "Weighted consensus ({}, {}) over {} observations is not a valid location: {}",
                lat,
                lon,
                located.len(),
                e
            );
            return None;
        }
    };

    let bearings: Vec<f64> = located.iter().filter_map(|(o, _)| o.geotag.bearing).collect();

    tracing::debug!(
        "Weighted consensus from {} located observations ({} with bearing)",
        located.len(),
        bearings.len()
    );

    Some(Geotag::new(Some(location), radian::median(&bearings)))
}

/// Element-wise median over observations that have both a location and a
/// usable (non-NaN) bearing. Trust level is ignored.
///
/// Returns `None` when no observation is complete.
pub fn median(observations: &[Observation]) -> Option<Geotag> {
    let complete: Vec<(GpsLocation, f64)> = observations
        .iter()
        .filter_map(|o| {
            let bearing = o.geotag.bearing.filter(|b| !b.is_nan())?;
            Some((o.geotag.location?, bearing))
        })
        .collect();

    if complete.is_empty() {
        return None;
    }

    let locations: Vec<GpsLocation> = complete.iter().map(|(loc, _)| *loc).collect();
    let bearings: Vec<f64> = complete.iter().map(|(_, b)| *b).collect();

    let location = GpsLocation::median(&locations);
    if location.is_none() {
        tracing::warn!(
            "Median consensus over {} geotags is not a valid location",
            complete.len()
        );
        return None;
    }

    Some(Geotag::new(location, radian::median(&bearings)))
}

/// Reduce observations with an explicitly chosen policy.
pub fn aggregate_consensus(observations: &[Observation], policy: &ConsensusPolicy) -> Option<Geotag> {
    policy.aggregate(observations)
}

/// Recompute a target's consensus from its full current sighting set.
///
/// Call after any change to the set (creation, geometry edit, reassignment,
/// deletion). The caller persists the result and serializes calls per
/// target.
pub fn recompute_target(
    target_id: Uuid,
    sightings: &[SightingRecord],
    policy: &ConsensusPolicy,
) -> TargetConsensus {
    let observations: Vec<Observation> = sightings
        .iter()
        .filter_map(SightingRecord::observation)
        .collect();

    let geotag = policy.aggregate(&observations);

    tracing::debug!(
        "Target {} recomputed with {} policy: {} of {} sightings geotagged, consensus={}",
        target_id,
        policy.name(),
        observations.len(),
        sightings.len(),
        geotag.is_some()
    );

    TargetConsensus {
        target_id,
        geotag,
        contributing: observations.len(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
