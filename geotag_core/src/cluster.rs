//! The "CLUSTER" Engine - ROI deduplication
//!
//! Automatic detectors report the same object many times. This module groups
//! raw ROI points by proximity and keeps one median point per group.
//!
//! Grouping is DBSCAN with `min_pts = 1`. With that setting every point is a
//! core point, so there is no noise label and the clusters are exactly the
//! connected components of the graph linking points at planar distance
//! `<= eps`. Chains are transitive: A-B and B-C within `eps` put A and C in
//! one cluster even when A-C is not.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gps::GpsLocation;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default neighbourhood radius in degrees (roughly 11 m of latitude)
pub const DEFAULT_EPSILON: f64 = 0.0001;

/// Creator recorded on derived ROIs
pub const DEFAULT_CREATOR: &str = "<NO_USER>";

/// Configuration for ROI clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Neighbourhood radius in degrees of planar distance (default: 0.0001)
    pub epsilon: f64,

    /// Attribution for derived ROIs (default: "<NO_USER>")
    pub creator: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            creator: DEFAULT_CREATOR.to_string(),
        }
    }
}

impl ClusterConfig {
    pub fn with_epsilon(epsilon: f64) -> Result<Self, ConfigError> {
        let config = Self {
            epsilon,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epsilon.is_finite() && self.epsilon > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidEpsilon(self.epsilon))
        }
    }
}

/// Camera/gimbal operating mode reported by the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraGimbalMode {
    Idle,
    Fixed,
    Tracking,
}

impl CameraGimbalMode {
    /// ROIs are only re-clustered while the gimbal is tracking.
    pub fn allows_reclustering(&self) -> bool {
        matches!(self, CameraGimbalMode::Tracking)
    }
}

// ============================================================================
// ROI
// ============================================================================

/// A region of interest reduced to its ground location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub location: GpsLocation,

    /// True for a cluster representative, false for a raw detection
    #[serde(default)]
    pub averaged: bool,

    #[serde(default = "default_creator")]
    pub creator: String,
}

fn default_creator() -> String {
    DEFAULT_CREATOR.to_string()
}

impl Roi {
    /// A raw detection.
    pub fn raw(location: GpsLocation, creator: impl Into<String>) -> Self {
        Self {
            location,
            averaged: false,
            creator: creator.into(),
        }
    }

    /// A cluster representative.
    pub fn derived(location: GpsLocation, creator: impl Into<String>) -> Self {
        Self {
            location,
            averaged: true,
            creator: creator.into(),
        }
    }
}

// ============================================================================
// CLUSTERING
// ============================================================================

/// Every point within `eps` of `points[q]`, including `q` itself.
fn range_query(points: &[GpsLocation], q: usize, eps: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.euclidean_distance(&points[q]) <= eps)
        .map(|(i, _)| i)
        .collect()
}

/// Cluster label for each input point, in input order.
///
/// Labels are `0..k`, numbered in order of each cluster's first member.
/// An `eps` that is negative or NaN links nothing, so every point becomes
/// its own cluster.
pub fn label_clusters(points: &[GpsLocation], eps: f64) -> Vec<usize> {
    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut next_label = 0;

    for seed in 0..points.len() {
        if labels[seed].is_some() {
            continue;
        }

        // min_pts = 1: every unlabelled point seeds a new cluster
        let label = next_label;
        next_label += 1;
        labels[seed] = Some(label);

        // Points are labelled as they are queued, so each enters the queue once
        let mut frontier: VecDeque<usize> = VecDeque::from([seed]);
        while let Some(q) = frontier.pop_front() {
            for n in range_query(points, q, eps) {
                if labels[n].is_none() {
                    labels[n] = Some(label);
                    frontier.push_back(n);
                }
            }
        }
    }

    labels.into_iter().map(|l| l.unwrap_or_default()).collect()
}

/// Group points by proximity and return one median point per group.
///
/// Output order follows the first member of each cluster in the input.
pub fn cluster(points: &[GpsLocation], eps: f64) -> Vec<GpsLocation> {
    let labels = label_clusters(points, eps);
    let cluster_count = labels.iter().max().map_or(0, |m| m + 1);

    let mut members: Vec<Vec<GpsLocation>> = vec![Vec::new(); cluster_count];
    for (point, label) in points.iter().zip(labels) {
        members[label].push(*point);
    }

    let representatives: Vec<GpsLocation> = members
        .iter()
        .filter_map(|group| {
            let median = GpsLocation::median(group);
            if median.is_none() {
                tracing::warn!("Cluster of {} points has no valid median", group.len());
            }
            median
        })
        .collect();

    tracing::debug!(
        "Clustered {} points into {} representatives (eps={})",
        points.len(),
        representatives.len(),
        eps
    );

    representatives
}

/// Cluster ROI locations into derived ROIs attributed to the configured creator.
pub fn cluster_rois(points: &[GpsLocation], config: &ClusterConfig) -> Vec<Roi> {
    cluster(points, config.epsilon)
        .into_iter()
        .map(|location| Roi::derived(location, config.creator.as_str()))
        .collect()
}

/// Replace the derived ROIs of a batch with a fresh clustering of its raw ROIs.
///
/// Previously derived ROIs are discarded and never fed back into the
/// clustering. Returns the raw ROIs unchanged followed by the new
/// representatives. The caller stores the result as one atomic replacement.
pub fn refresh_derived(rois: &[Roi], config: &ClusterConfig) -> Vec<Roi> {
    let raw: Vec<Roi> = rois.iter().filter(|r| !r.averaged).cloned().collect();
    let points: Vec<GpsLocation> = raw.iter().map(|r| r.location).collect();

    let derived = cluster_rois(&points, config);

    tracing::debug!(
        "Refreshed ROI batch: {} raw, {} stale derived dropped, {} derived",
        raw.len(),
        rois.len() - raw.len(),
        derived.len()
    );

    raw.into_iter().chain(derived).collect()
}

// ============================================================================
// TESTS
// ============================================================================
