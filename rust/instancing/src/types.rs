// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result types of the instance extraction pipeline.

use doorgraph_graph::{GraphError, NodeClass, NodeId};
use serde::{Deserialize, Serialize};

use crate::geometry::InstanceGeometry;

/// One class label per node, aligned with the graph's node ids.
pub type Predictions = Vec<NodeClass>;

/// Converts raw integer labels (0 = other, 1 = door) into predictions.
pub fn predictions_from_labels(labels: &[i64]) -> Result<Predictions, GraphError> {
    labels.iter().map(|&l| NodeClass::try_from(l)).collect()
}

/// A discrete door detection: a connected, spatially compact group of door nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorInstance {
    /// Dense id, unique within one extraction (0-based, in processing order).
    pub id: usize,
    /// Member node ids, ascending.
    pub nodes: Vec<NodeId>,
    /// Axis-aligned bounding-box summary of the member positions.
    pub geometry: InstanceGeometry,
}

impl DoorInstance {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Counts recorded by each pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub node_count: usize,
    /// Nodes relabelled by smoothing (any direction, summed over passes).
    pub smoothed_changes: usize,
    pub door_nodes: usize,
    pub components: usize,
    pub spatial_clusters: usize,
    pub trimmed_nodes: usize,
    pub removed_small: usize,
    pub removed_outliers: usize,
    pub instances: usize,
}

/// Output of [`extract_instances`](crate::extract_instances).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub instances: Vec<DoorInstance>,
    /// Predictions after smoothing; equal to the input when smoothing is off.
    pub predictions: Predictions,
    pub stats: ExtractionStats,
}

impl Extraction {
    /// Number of detected doors.
    pub fn door_count(&self) -> usize {
        self.instances.len()
    }

    /// Per-node instance id (`None` for nodes outside every instance).
    pub fn instance_assignment(&self, node_count: usize) -> Vec<Option<usize>> {
        let mut assignment = vec![None; node_count];
        for instance in &self.instances {
            for &n in &instance.nodes {
                if let Some(slot) = assignment.get_mut(n) {
                    *slot = Some(instance.id);
                }
            }
        }
        assignment
    }
}
