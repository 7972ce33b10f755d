// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disjoint-union batching of graphs.
//!
//! Training processes several graphs at once by merging them into a single
//! graph with no edges between members. Node ids of member `k` are shifted by
//! the total node count of members `0..k`.

use std::ops::Range;

use crate::error::{GraphError, Result};
use crate::graph::{FloorGraph, NodeId};

/// A disjoint union of graphs with the node range of every member.
#[derive(Debug, Clone)]
pub struct BatchedGraph {
    pub graph: FloorGraph,
    pub ranges: Vec<Range<NodeId>>,
}

impl BatchedGraph {
    /// Number of member graphs.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Splits a per-node vector of the batch back into per-member vectors.
    pub fn split<T: Clone>(&self, per_node: &[T]) -> Vec<Vec<T>> {
        self.ranges
            .iter()
            .map(|r| per_node[r.clone()].to_vec())
            .collect()
    }
}

impl FloorGraph {
    /// Merges graphs into one disjoint union.
    ///
    /// All members must share the same feature length. An empty input yields
    /// an empty batch with feature length 0.
    pub fn batch<'a, I>(graphs: I) -> Result<BatchedGraph>
    where
        I: IntoIterator<Item = &'a FloorGraph>,
    {
        let mut graphs = graphs.into_iter().peekable();
        let feature_len = graphs.peek().map(|g| g.feature_len()).unwrap_or(0);
        let mut merged = FloorGraph::new(feature_len);
        let mut ranges = Vec::new();

        for g in graphs {
            if g.feature_len() != feature_len {
                return Err(GraphError::BatchFeatureLength {
                    expected: feature_len,
                    found: g.feature_len(),
                });
            }

            let offset = merged.node_count();
            let attrs = g.attributes();
            for n in 0..g.node_count() {
                merged.push_node(
                    attrs.source_ids[n],
                    attrs.positions[n],
                    attrs.features[n].clone(),
                    attrs.labels[n],
                )?;
            }
            for &(a, b) in g.edges() {
                merged.add_edge(a + offset, b + offset)?;
            }
            ranges.push(offset..merged.node_count());
        }

        Ok(BatchedGraph {
            graph: merged,
            ranges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeClass, Point2D};

    fn make_pair(x: f64, label: NodeClass) -> FloorGraph {
        let mut g = FloorGraph::new(1);
        g.add_labeled_node(Point2D::new(x, 0.0), vec![1.0], label)
            .unwrap();
        g.add_labeled_node(Point2D::new(x + 1.0, 0.0), vec![2.0], label)
            .unwrap();
        g.add_edge(0, 1).unwrap();
        g
    }

    #[test]
    fn batch_offsets_edges_and_keeps_members_disjoint() {
        let a = make_pair(0.0, NodeClass::Door);
        let b = make_pair(10.0, NodeClass::Other);
        let batch = FloorGraph::batch([&a, &b]).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.graph.node_count(), 4);
        assert_eq!(batch.graph.edge_count(), 2);
        assert!(batch.graph.has_edge(2, 3));
        assert!(!batch.graph.has_edge(1, 2));
        assert_eq!(batch.ranges, vec![0..2, 2..4]);
        assert_eq!(batch.graph.label(3), Some(NodeClass::Other));
        assert_eq!(batch.graph.connected_components().len(), 2);
    }

    #[test]
    fn split_restores_member_vectors() {
        let a = make_pair(0.0, NodeClass::Door);
        let b = make_pair(10.0, NodeClass::Door);
        let batch = FloorGraph::batch([&a, &b]).unwrap();
        let parts = batch.split(&[1, 2, 3, 4]);
        assert_eq!(parts, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn mismatched_feature_lengths_fail() {
        let a = make_pair(0.0, NodeClass::Door);
        let b = FloorGraph::new(3);
        assert!(matches!(
            FloorGraph::batch([&a, &b]),
            Err(GraphError::BatchFeatureLength {
                expected: 1,
                found: 3
            })
        ));
    }

    #[test]
    fn empty_batch() {
        let batch = FloorGraph::batch(std::iter::empty()).unwrap();
        assert!(batch.is_empty());
        assert!(batch.graph.is_empty());
    }
}
