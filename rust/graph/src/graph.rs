// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-indexed floor-plan graph.
//!
//! Builds a graph where:
//! - **Nodes** = structural samples of a floor plan (dense ids `0..n`)
//! - **Edges** = spatial/structural adjacency between samples
//!
//! Node attributes live in a separate [`NodeAttributes`] table addressed by
//! the same dense ids, so algorithms only ever touch integer indices.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::error::{GraphError, Result};
use crate::subgraph::Subgraph;
use crate::types::{NodeClass, Point2D};

/// Dense node index into the graph's per-node arrays.
pub type NodeId = usize;

/// Per-node attribute table.
#[derive(Debug, Clone, Default)]
pub struct NodeAttributes {
    /// 2D position of every node.
    pub positions: Vec<Point2D>,
    /// Fixed-length feature vector of every node.
    pub features: Vec<Vec<f32>>,
    /// Ground-truth class, when the graph was loaded from labelled data.
    pub labels: Vec<Option<NodeClass>>,
    /// Identifier the node had in its source document.
    pub source_ids: Vec<i64>,
}

/// An undirected attributed graph with dense node ids.
#[derive(Debug, Clone)]
pub struct FloorGraph {
    feature_len: usize,
    attributes: NodeAttributes,
    edges: Vec<(NodeId, NodeId)>,
    /// Adjacency list: node id → neighbor ids in insertion order.
    adjacency: Vec<Vec<NodeId>>,
    edge_set: FxHashSet<(NodeId, NodeId)>,
}

impl FloorGraph {
    /// Creates an empty graph whose nodes carry `feature_len` features.
    pub fn new(feature_len: usize) -> Self {
        Self {
            feature_len,
            attributes: NodeAttributes::default(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            edge_set: FxHashSet::default(),
        }
    }

    // =========================================================================
    // Graph mutation
    // =========================================================================

    /// Adds a node. Returns its id.
    pub fn add_node(&mut self, position: Point2D, feature: Vec<f32>) -> Result<NodeId> {
        let source_id = self.node_count() as i64;
        self.push_node(source_id, position, feature, None)
    }

    /// Adds a node carrying a ground-truth class. Returns its id.
    pub fn add_labeled_node(
        &mut self,
        position: Point2D,
        feature: Vec<f32>,
        label: NodeClass,
    ) -> Result<NodeId> {
        let source_id = self.node_count() as i64;
        self.push_node(source_id, position, feature, Some(label))
    }

    pub(crate) fn push_node(
        &mut self,
        source_id: i64,
        position: Point2D,
        feature: Vec<f32>,
        label: Option<NodeClass>,
    ) -> Result<NodeId> {
        if feature.len() != self.feature_len {
            return Err(GraphError::FeatureLength {
                node: source_id,
                expected: self.feature_len,
                found: feature.len(),
            });
        }
        if !position.is_finite() {
            return Err(GraphError::NonFinitePosition(source_id));
        }

        let id = self.attributes.positions.len();
        self.attributes.positions.push(position);
        self.attributes.features.push(feature);
        self.attributes.labels.push(label);
        self.attributes.source_ids.push(source_id);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Adds an undirected edge between two nodes.
    ///
    /// Returns `false` when the edge is a self-loop or already present; such
    /// edges are ignored.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Ok(false);
        }
        let key = (a.min(b), a.max(b));
        if !self.edge_set.insert(key) {
            return Ok(false);
        }
        self.edges.push(key);
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        Ok(true)
    }

    /// Sets the ground-truth class of a node.
    pub fn set_label(&mut self, node: NodeId, label: NodeClass) -> Result<()> {
        self.check_node(node)?;
        self.attributes.labels[node] = Some(label);
        Ok(())
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.attributes.positions.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Length of every node's feature vector.
    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.attributes
    }

    /// Edges as `(smaller id, larger id)` pairs in insertion order.
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node < self.node_count()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_set.contains(&(a.min(b), a.max(b)))
    }

    /// Returns adjacent node ids.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency[node]
    }

    /// Returns the degree (number of connections) of a node.
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node].len()
    }

    pub fn position(&self, node: NodeId) -> Point2D {
        self.attributes.positions[node]
    }

    pub fn positions(&self) -> &[Point2D] {
        &self.attributes.positions
    }

    pub fn feature(&self, node: NodeId) -> &[f32] {
        &self.attributes.features[node]
    }

    pub fn label(&self, node: NodeId) -> Option<NodeClass> {
        self.attributes.labels[node]
    }

    /// Ground-truth labels of every node, or `None` if any node is unlabelled.
    pub fn labels(&self) -> Option<Vec<NodeClass>> {
        self.attributes.labels.iter().copied().collect()
    }

    pub fn source_id(&self, node: NodeId) -> i64 {
        self.attributes.source_ids[node]
    }

    /// Returns the 2-hop neighborhood of a node: its neighbors and their
    /// neighbors, deduplicated, excluding the node itself, ascending.
    pub fn two_hop_neighborhood(&self, node: NodeId) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        for &n1 in &self.adjacency[node] {
            seen.insert(n1);
            seen.extend(self.adjacency[n1].iter().copied());
        }
        seen.remove(&node);

        let mut out: Vec<NodeId> = seen.into_iter().collect();
        out.sort_unstable();
        out
    }

    // =========================================================================
    // Subgraphs and components
    // =========================================================================

    /// Induces the subgraph on `nodes` and the edges between them.
    ///
    /// Duplicate ids are ignored; an unknown id is an error.
    pub fn induced_subgraph(&self, nodes: &[NodeId]) -> Result<Subgraph<'_>> {
        if let Some(&bad) = nodes.iter().find(|&&n| !self.contains_node(n)) {
            return Err(GraphError::NodeNotFound(bad));
        }
        Ok(Subgraph::new(self, nodes))
    }

    /// Returns connected components as lists of node ids.
    ///
    /// Components are ordered by their smallest member; members are ascending.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        bfs_components(self.node_count(), |n| self.adjacency[n].iter().copied())
    }

    /// Checks if the graph is connected (at most one component).
    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(node))
        }
    }
}

impl Default for FloorGraph {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Breadth-first component labelling over `0..n` with a neighbor callback.
pub(crate) fn bfs_components<F, I>(n: usize, neighbors: F) -> Vec<Vec<usize>>
where
    F: Fn(usize) -> I,
    I: Iterator<Item = usize>,
{
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            component.push(node);
            for neighbor in neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}
