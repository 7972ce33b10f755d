// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Density-based spatial clustering (DBSCAN).
//!
//! Two points are neighbors when their distance is at most `eps`. A point is
//! a core point when its neighborhood, itself included, holds at least
//! `min_points` points. Clusters grow from core points in input order, so
//! labels are deterministic: cluster 0 contains the first core point.

use doorgraph_graph::{Point2D, SpatialGrid};

/// Labels every point with its cluster, or `None` for noise.
///
/// With `min_points <= 1` every point is a core point and no point is noise.
pub fn dbscan(points: &[Point2D], eps: f64, min_points: usize) -> Vec<Option<usize>> {
    let grid = SpatialGrid::from_points(points, eps);
    let neighborhoods: Vec<Vec<usize>> = points
        .iter()
        .map(|p| grid.within_radius(points, p, eps))
        .collect();
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|n| n.len() >= min_points)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut next_label = 0;

    for start in 0..points.len() {
        if labels[start].is_some() || !is_core[start] {
            continue;
        }

        let label = next_label;
        next_label += 1;
        labels[start] = Some(label);

        let mut stack = vec![start];
        while let Some(point) = stack.pop() {
            for &neighbor in &neighborhoods[point] {
                if labels[neighbor].is_none() {
                    labels[neighbor] = Some(label);
                    // Border points join the cluster but do not extend it.
                    if is_core[neighbor] {
                        stack.push(neighbor);
                    }
                }
            }
        }
    }

    labels
}

/// Groups point indices by cluster label, ascending by label. Noise is dropped.
pub fn cluster_members(labels: &[Option<usize>]) -> Vec<Vec<usize>> {
    let count = labels.iter().flatten().max().map_or(0, |&m| m + 1);
    let mut members = vec![Vec::new(); count];
    for (i, label) in labels.iter().enumerate() {
        if let Some(l) = label {
            members[*l].push(i);
        }
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, spacing: f64) -> Vec<Point2D> {
        (0..n)
            .map(|i| Point2D::new(i as f64 * spacing, 0.0))
            .collect()
    }

    #[test]
    fn chain_within_eps_forms_one_cluster() {
        let pts = line(6, 1000.0);
        let labels = dbscan(&pts, 1100.0, 1);
        assert!(labels.iter().all(|&l| l == Some(0)));
    }

    #[test]
    fn wide_spacing_gives_singletons() {
        let pts = line(5, 1250.0);
        let labels = dbscan(&pts, 1100.0, 1);
        assert_eq!(
            labels,
            vec![Some(0), Some(1), Some(2), Some(3), Some(4)]
        );
        assert_eq!(cluster_members(&labels).len(), 5);
    }

    #[test]
    fn eps_is_inclusive() {
        let pts = line(2, 1100.0);
        assert_eq!(dbscan(&pts, 1100.0, 1), vec![Some(0), Some(0)]);
    }

    #[test]
    fn separated_groups_are_labelled_in_input_order() {
        let mut pts = vec![Point2D::new(5000.0, 0.0), Point2D::new(5100.0, 0.0)];
        pts.extend(line(3, 100.0));
        let labels = dbscan(&pts, 150.0, 1);
        assert_eq!(
            labels,
            vec![Some(0), Some(0), Some(1), Some(1), Some(1)]
        );
        assert_eq!(cluster_members(&labels), vec![vec![0, 1], vec![2, 3, 4]]);
    }

    #[test]
    fn higher_min_points_marks_noise_and_borders() {
        // Dense triple at the origin, one border point, one far outlier.
        let pts = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(100.0, 100.0),
        ];
        let labels = dbscan(&pts, 1.5, 3);
        // Point 3 only sees {1, 3}: not core, but reachable from core point 1.
        assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(0), None]);
        assert_eq!(cluster_members(&labels), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn empty_input() {
        assert!(dbscan(&[], 10.0, 1).is_empty());
        assert!(cluster_members(&[]).is_empty());
    }
}
