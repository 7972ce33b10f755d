// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Induced subgraph views over a [`FloorGraph`].
//!
//! A subgraph borrows its parent and stores only a sorted member list plus a
//! local adjacency list; node ids exposed by the API are always parent ids.

use rustc_hash::FxHashMap;

use crate::graph::{bfs_components, FloorGraph, NodeId};
use crate::types::Point2D;

/// The subgraph induced by a node subset of a parent graph.
#[derive(Debug, Clone)]
pub struct Subgraph<'g> {
    parent: &'g FloorGraph,
    /// Member ids in the parent graph, ascending.
    nodes: Vec<NodeId>,
    /// Parent id → local index.
    local: FxHashMap<NodeId, usize>,
    /// Local adjacency list (local indices).
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl<'g> Subgraph<'g> {
    /// Builds the subgraph. Callers validate that every id is in `parent`.
    pub(crate) fn new(parent: &'g FloorGraph, members: &[NodeId]) -> Self {
        let mut nodes = members.to_vec();
        nodes.sort_unstable();
        nodes.dedup();

        let local: FxHashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut edge_count = 0;
        for (i, &node) in nodes.iter().enumerate() {
            for neighbor in parent.neighbors(node) {
                if let Some(&j) = local.get(neighbor) {
                    adjacency[i].push(j);
                    if i < j {
                        edge_count += 1;
                    }
                }
            }
        }

        Self {
            parent,
            nodes,
            local,
            adjacency,
            edge_count,
        }
    }

    pub fn parent(&self) -> &'g FloorGraph {
        self.parent
    }

    /// Member node ids (parent ids), ascending.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.local.contains_key(&node)
    }

    /// Neighbors of a member node that are themselves members (parent ids).
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        match self.local.get(&node) {
            Some(&i) => self.adjacency[i].iter().map(|&j| self.nodes[j]).collect(),
            None => Vec::new(),
        }
    }

    /// Positions of the member nodes, in member order.
    pub fn positions(&self) -> Vec<Point2D> {
        self.nodes.iter().map(|&n| self.parent.position(n)).collect()
    }

    /// Induces a subgraph of this subgraph. Ids outside this subgraph are dropped.
    pub fn induce(&self, members: &[NodeId]) -> Subgraph<'g> {
        let kept: Vec<NodeId> = members
            .iter()
            .copied()
            .filter(|n| self.contains(*n))
            .collect();
        Subgraph::new(self.parent, &kept)
    }

    /// Splits the subgraph into connected components (parent ids).
    ///
    /// Two members share a component iff a path joins them through members
    /// only. Components are ordered by their smallest member.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        bfs_components(self.nodes.len(), |i| self.adjacency[i].iter().copied())
            .into_iter()
            .map(|component| component.into_iter().map(|i| self.nodes[i]).collect())
            .collect()
    }

    /// Splits the subgraph into connected component subgraphs.
    pub fn component_subgraphs(&self) -> Vec<Subgraph<'g>> {
        self.connected_components()
            .iter()
            .map(|component| Subgraph::new(self.parent, component))
            .collect()
    }
}
