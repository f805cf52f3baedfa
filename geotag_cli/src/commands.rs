//! Subcommand handlers. Each takes parsed documents and returns the value
//! to print, so the logic is testable without touching the filesystem.

use geotag_core::{
    projection, recompute_target, refresh_derived, CameraGimbalMode, ClusterConfig,
    ConsensusPolicy, GeotagConfig, Roi, TargetConsensus,
};
use tracing::{debug, info, warn};

use crate::documents::{ProjectionReport, ProjectionRequest, RoiEntry, TargetDocument};

/// Project every request, reporting failures per request.
pub fn run_project(requests: &[ProjectionRequest], config: &GeotagConfig) -> Vec<ProjectionReport> {
    let reports: Vec<ProjectionReport> = requests
        .iter()
        .enumerate()
        .map(|(i, request)| {
            let image = request.image.unwrap_or(config.image);
            let input = match request.telemetry.to_input(&request.pixel, image, request.mode) {
                Ok(input) => input,
                Err(e) => {
                    warn!("Request {} cannot be geotagged: {}", i, e);
                    return ProjectionReport::failed(e.to_string());
                }
            };

            match projection::project(&input) {
                Some(geotag) => ProjectionReport {
                    direction: geotag.direction(),
                    geotag: Some(geotag),
                    error: None,
                },
                None => ProjectionReport::failed("projected location is out of range"),
            }
        })
        .collect();

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    info!("Projected {} requests ({} failed)", reports.len(), failed);
    reports
}

/// Recompute the consensus of one target.
pub fn run_consensus(document: &TargetDocument, policy: &ConsensusPolicy) -> TargetConsensus {
    let result = recompute_target(document.target_id, &document.sightings, policy);
    match &result.geotag {
        Some(geotag) => info!(
            "Target {}: consensus {:?} from {} sightings",
            result.target_id, geotag.location, result.contributing
        ),
        None => info!("Target {}: no consensus available", result.target_id),
    }
    result
}

/// Re-cluster a ROI batch, unless the gimbal mode forbids it.
pub fn run_cluster(
    entries: Vec<RoiEntry>,
    config: &ClusterConfig,
    mode: Option<CameraGimbalMode>,
) -> Vec<Roi> {
    let rois: Vec<Roi> = entries
        .into_iter()
        .map(|entry| entry.into_roi(&config.creator))
        .collect();

    if let Some(mode) = mode {
        if !mode.allows_reclustering() {
            info!("Gimbal mode {:?} does not re-cluster; batch unchanged", mode);
            return rois;
        }
    }

    let refreshed = refresh_derived(&rois, config);
    let derived = refreshed.iter().filter(|r| r.averaged).count();
    debug!("eps={} creator={}", config.epsilon, config.creator);
    info!("{} ROIs reduced to {} representatives", rois.len(), derived);
    refreshed
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotag_core::{
        ClientType, FieldOfView, Geotag, GpsLocation, ImageMode, PixelTag, SightingRecord,
        TelemetrySnapshot,
    };
    use uuid::Uuid;

    fn telemetry() -> TelemetrySnapshot {
        TelemetrySnapshot {
            location: Some(GpsLocation::new(38.14, -76.43).unwrap()),
            altitude_m: Some(100.0),
            plane_yaw_deg: Some(0.0),
            gimbal: None,
            fov: Some(FieldOfView::from_degrees(60.0, 45.0)),
        }
    }

    #[test]
    fn test_project_center_and_failures() {
        let config = GeotagConfig::default();
        let (cx, cy) = config.image.center();
        let requests = vec![
            ProjectionRequest {
                telemetry: telemetry(),
                pixel: PixelTag {
                    x: cx,
                    y: cy,
                    radians_from_top: Some(0.0),
                },
                mode: ImageMode::Fixed,
                image: None,
            },
            ProjectionRequest {
                telemetry: TelemetrySnapshot::default(),
                pixel: PixelTag {
                    x: 1.0,
                    y: 1.0,
                    radians_from_top: None,
                },
                mode: ImageMode::Fixed,
                image: None,
            },
            ProjectionRequest {
                telemetry: telemetry(),
                pixel: PixelTag {
                    x: 1.0,
                    y: 1.0,
                    radians_from_top: None,
                },
                mode: ImageMode::OffAxis,
                image: None,
            },
        ];

        let reports = run_project(&requests, &config);
        assert_eq!(reports.len(), 3);

        let loc = reports[0].geotag.unwrap().location.unwrap();
        assert!((loc.latitude() - 38.14).abs() < 1e-9);
        assert!((loc.longitude() + 76.43).abs() < 1e-9);
        assert_eq!(reports[0].direction, Some(geotag_core::CardinalDirection::North));

        assert!(reports[1].error.as_deref().unwrap().contains("location"));
        assert!(reports[2].error.as_deref().unwrap().contains("Off-axis"));
    }

    #[test]
    fn test_consensus_uses_policy() {
        let tag = |lon: f64| {
            Some(Geotag::new(
                Some(GpsLocation::new(0.0, lon).unwrap()),
                Some(0.0),
            ))
        };
        let document = TargetDocument {
            target_id: Uuid::nil(),
            sightings: vec![
                SightingRecord {
                    id: Uuid::new_v4(),
                    client: ClientType::Mdlc,
                    geotag: tag(0.0),
                },
                SightingRecord {
                    id: Uuid::new_v4(),
                    client: ClientType::Adlc,
                    geotag: tag(4.0),
                },
                SightingRecord {
                    id: Uuid::new_v4(),
                    client: ClientType::Adlc,
                    geotag: tag(6.0),
                },
            ],
        };

        let median = run_consensus(&document, &ConsensusPolicy::Median);
        assert_eq!(median.geotag.unwrap().location.unwrap().longitude(), 4.0);

        let weighted = run_consensus(
            &document,
            &ConsensusPolicy::WeightedAverage(Default::default()),
        );
        // manual median 0, automatic median 5
        assert_eq!(weighted.geotag.unwrap().location.unwrap().longitude(), 2.5);
    }

    #[test]
    fn test_cluster_respects_gimbal_mode() {
        let config = ClusterConfig::with_epsilon(0.001).unwrap();
        let entries = || {
            vec![
                RoiEntry::Point(GpsLocation::new(0.0, 0.0).unwrap()),
                RoiEntry::Point(GpsLocation::new(0.0, 0.0002).unwrap()),
            ]
        };

        let idle = run_cluster(entries(), &config, Some(CameraGimbalMode::Idle));
        assert_eq!(idle.len(), 2);
        assert!(idle.iter().all(|r| !r.averaged));

        let tracking = run_cluster(entries(), &config, Some(CameraGimbalMode::Tracking));
        assert_eq!(tracking.len(), 3);
        assert_eq!(tracking.iter().filter(|r| r.averaged).count(), 1);

        let ungated = run_cluster(entries(), &config, None);
        assert_eq!(ungated, tracking);
    }
}
