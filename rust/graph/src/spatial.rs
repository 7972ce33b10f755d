// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index for radius queries over 2D points.
//!
//! Uses a grid-based spatial hash for O(1) average-case neighbor lookups.
//! This backs the density-based re-clustering of door candidates, where
//! every point needs all other points within a fixed distance.

use rustc_hash::FxHashMap;

use crate::types::Point2D;

/// A spatial hash grid over indices into a caller-owned point slice.
///
/// The grid divides the plane into square cells of side `cell_size`. Radius
/// queries visit every cell the query disk can touch.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Creates a new spatial index with the given cell size.
    ///
    /// Non-positive or non-finite sizes fall back to 1.0.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            grid: FxHashMap::default(),
        }
    }

    /// Builds an index over `points`; entry `i` refers to `points[i]`.
    pub fn from_points(points: &[Point2D], cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (i, p) in points.iter().enumerate() {
            index.insert(i, p);
        }
        index
    }

    pub fn insert(&mut self, index: usize, point: &Point2D) {
        let cell = self.cell_coords(point);
        self.grid.entry(cell).or_default().push(index);
    }

    /// Returns every indexed point within `radius` (inclusive) of `center`,
    /// ascending by index.
    ///
    /// `points` must be the slice the index was built over.
    pub fn within_radius(&self, points: &[Point2D], center: &Point2D, radius: f64) -> Vec<usize> {
        let (cx, cy) = self.cell_coords(center);
        let reach = (radius / self.cell_size).ceil().max(1.0) as i64;
        let radius_sq = radius * radius;

        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(indices) = self.grid.get(&cell) {
                    for &i in indices {
                        let p = &points[i];
                        let dist_sq = (p.x - center.x).powi(2) + (p.y - center.y).powi(2);
                        if dist_sq <= radius_sq {
                            found.push(i);
                        }
                    }
                }
            }
        }
        // Saturated cells at the edge of the i64 range can be visited twice.
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Number of occupied grid cells.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    fn cell_coords(&self, p: &Point2D) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }
}
