// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration of the instance extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InstancingError, Result};

/// Rule used to reject implausible door candidates after geometry computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlierPolicy {
    /// Keep a candidate iff `ratio > min_ratio`, `width < max_width` and
    /// `height < max_height`.
    Fixed {
        min_ratio: f64,
        max_width: f64,
        max_height: f64,
    },
    /// Keep a candidate iff its bounding-box area lies strictly inside
    /// `(q25 - lower_factor * iqr, q75 + upper_factor * iqr)` computed over
    /// all candidates of the graph.
    InterquartileRange { lower_factor: f64, upper_factor: f64 },
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        OutlierPolicy::Fixed {
            min_ratio: 0.3,
            max_width: 3000.0,
            max_height: 3000.0,
        }
    }
}

impl OutlierPolicy {
    /// The interquartile-range policy with its usual fences.
    pub fn interquartile_range() -> Self {
        OutlierPolicy::InterquartileRange {
            lower_factor: 2.0,
            upper_factor: 6.0,
        }
    }
}

/// Configuration for door instance extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of 2-hop majority smoothing sweeps applied before extraction.
    /// Default: 0 (raw predictions are used as-is)
    pub smoothing_passes: usize,

    /// Neighbor distance for density-based re-clustering (floor-plan units).
    /// Two positions closer than or equal to this are linked. Default: 1100.0
    pub cluster_distance: f64,

    /// Minimum neighborhood size (including the point itself) for a core
    /// point. Default: 1, so every point belongs to some cluster.
    pub cluster_min_points: usize,

    /// Re-split spatial clusters that are not connected through their own
    /// door nodes. Default: false (spatial clusters are kept whole)
    pub enforce_connectivity: bool,

    /// When set, drop cluster nodes at or beyond this distance from the
    /// cluster centroid before size filtering. Default: None
    pub max_center_distance: Option<f64>,

    /// Candidates with this many nodes or fewer are discarded. Default: 8
    pub min_instance_nodes: usize,

    /// Geometric outlier rejection rule. Default: fixed thresholds
    pub outlier_policy: OutlierPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            smoothing_passes: 0,
            cluster_distance: 1100.0,
            cluster_min_points: 1,
            enforce_connectivity: false,
            max_center_distance: None,
            min_instance_nodes: 8,
            outlier_policy: OutlierPolicy::default(),
        }
    }
}

impl ExtractionConfig {
    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.cluster_distance.is_finite() && self.cluster_distance > 0.0) {
            return Err(InstancingError::InvalidConfig(format!(
                "cluster_distance must be positive, got {}",
                self.cluster_distance
            )));
        }
        if self.cluster_min_points == 0 {
            return Err(InstancingError::InvalidConfig(
                "cluster_min_points must be at least 1".into(),
            ));
        }
        if let Some(d) = self.max_center_distance {
            if !(d.is_finite() && d > 0.0) {
                return Err(InstancingError::InvalidConfig(format!(
                    "max_center_distance must be positive, got {d}"
                )));
            }
        }
        match &self.outlier_policy {
            OutlierPolicy::Fixed { min_ratio, .. } if !(0.0..=1.0).contains(min_ratio) => {
                Err(InstancingError::InvalidConfig(format!(
                    "min_ratio must lie in [0, 1], got {min_ratio}"
                )))
            }
            OutlierPolicy::InterquartileRange {
                lower_factor,
                upper_factor,
            } if *lower_factor < 0.0 || *upper_factor < 0.0 => Err(
                InstancingError::InvalidConfig("interquartile factors must be non-negative".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| InstancingError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
