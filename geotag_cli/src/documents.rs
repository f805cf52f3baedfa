//! JSON documents read and written by the CLI.

use std::fs;
use std::path::Path;

use anyhow::Context;
use geotag_core::{
    CardinalDirection, Geotag, GpsLocation, ImageDimensions, ImageMode, PixelTag, Roi,
    SightingRecord, TelemetrySnapshot,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pixel annotation to project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default)]
    pub telemetry: TelemetrySnapshot,

    pub pixel: PixelTag,

    #[serde(default)]
    pub mode: ImageMode,

    /// Overrides the configured image size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageDimensions>,
}

/// Result of projecting one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geotag: Option<Geotag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<CardinalDirection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectionReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// All current sightings of one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDocument {
    #[serde(default = "Uuid::new_v4")]
    pub target_id: Uuid,

    pub sightings: Vec<SightingRecord>,
}

/// A clustering input entry: a full ROI or a bare point (treated as raw).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoiEntry {
    Roi(Roi),
    Point(GpsLocation),
}

impl RoiEntry {
    pub fn into_roi(self, creator: &str) -> Roi {
        match self {
            RoiEntry::Roi(roi) => roi,
            RoiEntry::Point(location) => Roi::raw(location, creator),
        }
    }
}

/// Read and parse a JSON document from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_json<T: DeserializeOwned>(json: &str) -> anyhow::Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Pretty-print a result to stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
