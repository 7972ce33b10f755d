// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding-box geometry of door candidates.

use doorgraph_graph::Point2D;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2D,
    pub max: Point2D,
}

impl BoundingBox {
    /// Bounding box of `points`, `None` when empty.
    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().skip(1).fold((first, first), |(min, max), p| {
            (
                Point2D::new(min.x.min(p.x), min.y.min(p.y)),
                Point2D::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Geometry summary of one instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceGeometry {
    pub area: f64,
    pub width: f64,
    pub height: f64,
    /// `min(width, height) / max(width, height)`; 0 for degenerate boxes.
    pub ratio: f64,
}

impl InstanceGeometry {
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        let width = bbox.width();
        let height = bbox.height();
        // A zero extent on either axis forces rejection downstream.
        let ratio = if width > 0.0 && height > 0.0 {
            width.min(height) / width.max(height)
        } else {
            0.0
        };
        Self {
            area: bbox.area(),
            width,
            height,
            ratio,
        }
    }

    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        BoundingBox::from_points(points).map(|b| Self::from_bbox(&b))
    }

    /// True when the bounding box collapses to a point or a line.
    pub fn is_degenerate(&self) -> bool {
        self.ratio <= 0.0
    }
}
