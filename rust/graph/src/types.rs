// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared by every crate in the workspace.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A 2D point in floor-plan units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.to_nalgebra() - other.to_nalgebra()).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of a set of points, `None` when empty.
    pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point2D::new(sx / n, sy / n))
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Binary node class: door or any other structural node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum NodeClass {
    Other = 0,
    Door = 1,
}

impl NodeClass {
    /// Number of classes.
    pub const COUNT: usize = 2;

    /// Column index of this class in logits and class-weight arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(NodeClass::Other),
            1 => Some(NodeClass::Door),
            _ => None,
        }
    }

    pub fn is_door(self) -> bool {
        self == NodeClass::Door
    }
}

impl From<NodeClass> for u8 {
    fn from(class: NodeClass) -> Self {
        class as u8
    }
}

impl TryFrom<u8> for NodeClass {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl TryFrom<i64> for NodeClass {
    type Error = GraphError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NodeClass::Other),
            1 => Ok(NodeClass::Door),
            other => Err(GraphError::InvalidClass(other)),
        }
    }
}
