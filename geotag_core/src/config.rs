//! Engine configuration.
//!
//! Every value has a default, so an empty JSON object is a valid config:
//!
//! ```json
//! {
//!   "consensus": { "manual_weight": 0.5, "automatic_weight": 0.5, "policy": "median" },
//!   "clustering": { "epsilon": 0.0001, "creator": "<NO_USER>" },
//!   "image": { "width": 5456, "height": 3632 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterConfig;
use crate::consensus::{ConsensusPolicy, ConsensusWeights};
use crate::error::ConfigError;
use crate::projection::ImageDimensions;

/// Consensus policy selector as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    WeightedAverage,
    #[default]
    Median,
}

/// Consensus section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Weight of the manual-group median (default: 0.5)
    pub manual_weight: f64,

    /// Weight of the automatic-group median (default: 0.5)
    pub automatic_weight: f64,

    /// Policy used for target recomputation (default: median)
    pub policy: PolicyKind,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        let weights = ConsensusWeights::default();
        Self {
            manual_weight: weights.manual(),
            automatic_weight: weights.automatic(),
            policy: PolicyKind::default(),
        }
    }
}

impl ConsensusConfig {
    pub fn weights(&self) -> Result<ConsensusWeights, ConfigError> {
        ConsensusWeights::new(self.manual_weight, self.automatic_weight)
    }

    /// The configured policy, with `kind` overriding the configured selector.
    pub fn policy(&self, kind: Option<PolicyKind>) -> Result<ConsensusPolicy, ConfigError> {
        match kind.unwrap_or(self.policy) {
            PolicyKind::WeightedAverage => Ok(ConsensusPolicy::WeightedAverage(self.weights()?)),
            PolicyKind::Median => Ok(ConsensusPolicy::Median),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeotagConfig {
    pub consensus: ConsensusConfig,
    pub clustering: ClusterConfig,

    /// Size of the images pixel annotations refer to
    pub image: ImageDimensions,
}

impl GeotagConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GeotagConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.consensus.weights()?;
        self.clustering.validate()?;
        if self.image.width == 0 || self.image.height == 0 {
            return Err(ConfigError::InvalidImage {
                width: self.image.width,
                height: self.image.height,
            });
        }
        Ok(())
    }
}
