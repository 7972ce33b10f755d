// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prediction-to-instance pipeline.
//!
//! Per-node door predictions are noisy: doors show up as loose blobs of door
//! nodes, sometimes chained to each other through long runs of misclassified
//! nodes, and sometimes as isolated false positives.
//!
//! This module applies a multi-stage pipeline:
//! 1. Smoothing: optional 2-hop majority vote
//! 2. Induction: keep door nodes and the edges between them
//! 3. Connectivity: split into connected components
//! 4. Re-clustering: split components that are spatially disjoint; with
//!    `enforce_connectivity` each cluster is split again along door edges
//! 5. Size: drop candidates with too few nodes
//! 6. Geometry + outliers: drop candidates with implausible bounding boxes
//! 7. Tagging: assign dense instance ids

use doorgraph_graph::{FloorGraph, NodeClass, NodeId, Point2D};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::clustering::{cluster_members, dbscan};
use crate::config::ExtractionConfig;
use crate::error::{InstancingError, Result};
use crate::geometry::InstanceGeometry;
use crate::outliers::inlier_indices;
use crate::smoothing::smooth_predictions;
use crate::types::{DoorInstance, Extraction, ExtractionStats};

/// Main pipeline: takes one graph and its per-node predictions and returns
/// the detected door instances.
///
/// A prediction vector without door nodes yields an empty extraction.
pub fn extract_instances(
    graph: &FloorGraph,
    predictions: &[NodeClass],
    config: &ExtractionConfig,
) -> Result<Extraction> {
    config.validate()?;
    if predictions.len() != graph.node_count() {
        return Err(InstancingError::PredictionLength {
            nodes: graph.node_count(),
            predictions: predictions.len(),
        });
    }

    let mut stats = ExtractionStats {
        node_count: graph.node_count(),
        ..Default::default()
    };

    // Step 1: Morphological smoothing
    let mut predictions = predictions.to_vec();
    for _ in 0..config.smoothing_passes {
        let next = smooth_predictions(graph, &predictions)?;
        stats.smoothed_changes += next
            .iter()
            .zip(&predictions)
            .filter(|(a, b)| a != b)
            .count();
        predictions = next;
    }

    // Step 2: Door subgraph induction
    let components = door_components(graph, &predictions)?;
    stats.door_nodes = components.iter().map(Vec::len).sum();
    stats.components = components.len();
    debug!(
        door_nodes = stats.door_nodes,
        components = stats.components,
        "split door subgraph"
    );

    // Step 3-4: Spatial re-clustering of every component
    let mut candidates = Vec::new();
    for component in &components {
        candidates.extend(spatial_clusters(graph, component, config)?);
    }
    stats.spatial_clusters = candidates.len();

    if let Some(max_distance) = config.max_center_distance {
        let before: usize = candidates.iter().map(Vec::len).sum();
        candidates = candidates
            .into_iter()
            .map(|c| trim_far_from_center(graph, c, max_distance))
            .filter(|c| !c.is_empty())
            .collect();
        stats.trimmed_nodes = before - candidates.iter().map(Vec::len).sum::<usize>();
    }
    debug!(
        clusters = stats.spatial_clusters,
        trimmed_nodes = stats.trimmed_nodes,
        "re-clustered components"
    );

    // Step 5: Size filter
    let before = candidates.len();
    let candidates = filter_by_size(candidates, config.min_instance_nodes);
    stats.removed_small = before - candidates.len();

    // Step 6: Geometry and outlier rejection
    let geometries: Vec<InstanceGeometry> = candidates
        .iter()
        .map(|c| candidate_geometry(graph, c))
        .collect();
    let inliers = inlier_indices(&geometries, &config.outlier_policy);
    stats.removed_outliers = candidates.len() - inliers.len();

    // Step 7: Instance tagging
    let instances: Vec<DoorInstance> = inliers
        .into_iter()
        .enumerate()
        .map(|(id, i)| DoorInstance {
            id,
            nodes: candidates[i].clone(),
            geometry: geometries[i],
        })
        .collect();
    stats.instances = instances.len();

    info!(
        doors = stats.instances,
        removed_small = stats.removed_small,
        removed_outliers = stats.removed_outliers,
        "extracted door instances"
    );

    Ok(Extraction {
        instances,
        predictions,
        stats,
    })
}

/// Runs [`extract_instances`] over independent graphs in parallel.
///
/// Results keep the input order; a failure on one graph does not affect the others.
pub fn extract_batch(
    inputs: &[(&FloorGraph, &[NodeClass])],
    config: &ExtractionConfig,
) -> Vec<Result<Extraction>> {
    inputs
        .par_iter()
        .map(|(graph, predictions)| extract_instances(graph, predictions, config))
        .collect()
}

// ─── Step 2-3: Induction and Connectivity ───────────────────────────────────

/// Connected components of the subgraph induced by door-predicted nodes.
///
/// Components are node-disjoint and their union is exactly the door node set.
pub fn door_components(graph: &FloorGraph, predictions: &[NodeClass]) -> Result<Vec<Vec<NodeId>>> {
    let door_nodes: Vec<NodeId> = predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_door())
        .map(|(i, _)| i)
        .collect();
    if door_nodes.is_empty() {
        return Ok(Vec::new());
    }
    let doors = graph.induced_subgraph(&door_nodes)?;
    Ok(doors.connected_components())
}

// ─── Step 4: Spatial Re-clustering ──────────────────────────────────────────

/// Splits one connected component into spatially coherent clusters.
///
/// Every returned cluster is a subset of `component`. With
/// `enforce_connectivity` each cluster is further split into the pieces that
/// stay connected through its own members.
pub fn spatial_clusters(
    graph: &FloorGraph,
    component: &[NodeId],
    config: &ExtractionConfig,
) -> Result<Vec<Vec<NodeId>>> {
    let points: Vec<Point2D> = component.iter().map(|&n| graph.position(n)).collect();
    let labels = dbscan(&points, config.cluster_distance, config.cluster_min_points);

    let mut clusters = Vec::new();
    for members in cluster_members(&labels) {
        let mut nodes: Vec<NodeId> = members.into_iter().map(|i| component[i]).collect();
        nodes.sort_unstable();

        if config.enforce_connectivity {
            let sub = graph.induced_subgraph(&nodes)?;
            clusters.extend(sub.connected_components());
        } else {
            clusters.push(nodes);
        }
    }
    Ok(clusters)
}

/// Keeps only nodes strictly closer than `max_distance` to the cluster centroid.
fn trim_far_from_center(graph: &FloorGraph, cluster: Vec<NodeId>, max_distance: f64) -> Vec<NodeId> {
    let points: Vec<Point2D> = cluster.iter().map(|&n| graph.position(n)).collect();
    let Some(centroid) = Point2D::centroid(&points) else {
        return cluster;
    };
    cluster
        .into_iter()
        .zip(points)
        .filter(|(_, p)| p.distance_to(&centroid) < max_distance)
        .map(|(n, _)| n)
        .collect()
}

// ─── Step 5: Size Filter ────────────────────────────────────────────────────

/// Keeps candidates with strictly more than `min_nodes` nodes, in order.
pub fn filter_by_size(candidates: Vec<Vec<NodeId>>, min_nodes: usize) -> Vec<Vec<NodeId>> {
    candidates
        .into_iter()
        .filter(|c| c.len() > min_nodes)
        .collect()
}

// ─── Step 6: Geometry ───────────────────────────────────────────────────────

fn candidate_geometry(graph: &FloorGraph, candidate: &[NodeId]) -> InstanceGeometry {
    let points: Vec<Point2D> = candidate.iter().map(|&n| graph.position(n)).collect();
    InstanceGeometry::from_points(&points).unwrap_or_default()
}
