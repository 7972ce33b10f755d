// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON ingestion and export of attributed floor-plan graphs.
//!
//! The document format keeps the node attributes by name, the way graph
//! exports from floor-plan tooling usually do:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 17, "pos": [120.0, 40.5], "feature": [0.2, 1.0], "label": 1 }],
//!   "edges": [[17, 18]]
//! }
//! ```
//!
//! Source ids may be any integers; they are remapped to dense ids in
//! document order and kept in [`NodeAttributes::source_ids`](crate::NodeAttributes).

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::FloorGraph;
use crate::types::{NodeClass, Point2D};

/// Serializable representation of a floor-plan graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: i64,
    #[serde(default)]
    pub pos: Option<[f64; 2]>,
    #[serde(default)]
    pub feature: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<i64>,
}

/// An undirected edge between two source ids.
pub type EdgeDocument = [i64; 2];

impl FloorGraph {
    /// Builds a graph from a parsed document, validating every node.
    pub fn from_document(doc: &GraphDocument) -> Result<Self> {
        let feature_len = match doc.nodes.first() {
            Some(first) => first
                .feature
                .as_ref()
                .map(Vec::len)
                .ok_or(GraphError::MissingFeature(first.id))?,
            None => 0,
        };

        let mut graph = FloorGraph::new(feature_len);
        let mut id_map: FxHashMap<i64, usize> = FxHashMap::default();

        for node in &doc.nodes {
            let pos = node.pos.ok_or(GraphError::MissingPosition(node.id))?;
            let feature = node
                .feature
                .clone()
                .ok_or(GraphError::MissingFeature(node.id))?;
            let label = node.label.map(NodeClass::try_from).transpose()?;

            if id_map.contains_key(&node.id) {
                return Err(GraphError::DuplicateNodeId(node.id));
            }
            let dense = graph.push_node(node.id, Point2D::from(pos), feature, label)?;
            id_map.insert(node.id, dense);
        }

        for &[a, b] in &doc.edges {
            let da = *id_map.get(&a).ok_or(GraphError::UnknownEdgeEndpoint(a))?;
            let db = *id_map.get(&b).ok_or(GraphError::UnknownEdgeEndpoint(b))?;
            graph.add_edge(da, db)?;
        }

        Ok(graph)
    }

    /// Parses a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: GraphDocument =
            serde_json::from_str(json).map_err(|e| GraphError::Serialization(e.to_string()))?;
        Self::from_document(&doc)
    }

    /// Reads and parses a graph file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Creates a serializable document using the source ids.
    pub fn to_document(&self) -> GraphDocument {
        let attrs = self.attributes();
        let nodes = (0..self.node_count())
            .map(|n| NodeDocument {
                id: attrs.source_ids[n],
                pos: Some(attrs.positions[n].into()),
                feature: Some(attrs.features[n].clone()),
                label: attrs.labels[n].map(|l| u8::from(l) as i64),
            })
            .collect();
        let edges = self
            .edges()
            .iter()
            .map(|&(a, b)| [attrs.source_ids[a], attrs.source_ids[b]])
            .collect();
        GraphDocument { nodes, edges }
    }

    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| GraphError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "nodes": [
            { "id": 10, "pos": [0.0, 0.0], "feature": [1.0, 0.0], "label": 1 },
            { "id": 20, "pos": [5.0, 0.0], "feature": [0.0, 1.0], "label": 0 },
            { "id": 7,  "pos": [5.0, 5.0], "feature": [0.5, 0.5] }
        ],
        "edges": [[10, 20], [20, 7]]
    }"#;

    #[test]
    fn parse_remaps_ids_densely() {
        let g = FloorGraph::from_json(SAMPLE).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.feature_len(), 2);
        assert_eq!(g.source_id(2), 7);
        assert!(g.has_edge(1, 2));
        assert_eq!(g.label(0), Some(NodeClass::Door));
        assert_eq!(g.label(2), None);
    }

    #[test]
    fn export_preserves_structure() {
        let g = FloorGraph::from_json(SAMPLE).unwrap();
        let again = FloorGraph::from_json(&g.to_json().unwrap()).unwrap();
        assert_eq!(again.node_count(), g.node_count());
        assert_eq!(again.edges(), g.edges());
        assert_eq!(again.attributes().source_ids, vec![10, 20, 7]);
    }

    #[test]
    fn missing_position_fails_fast() {
        let json = r#"{ "nodes": [
            { "id": 1, "pos": [0.0, 0.0], "feature": [1.0] },
            { "id": 2, "feature": [1.0] }
        ], "edges": [] }"#;
        assert!(matches!(
            FloorGraph::from_json(json),
            Err(GraphError::MissingPosition(2))
        ));
    }

    #[test]
    fn missing_feature_fails_fast() {
        let json = r#"{ "nodes": [ { "id": 3, "pos": [0.0, 0.0] } ] }"#;
        assert!(matches!(
            FloorGraph::from_json(json),
            Err(GraphError::MissingFeature(3))
        ));
    }

    #[test]
    fn integrity_errors() {
        let dup = r#"{ "nodes": [
            { "id": 1, "pos": [0.0, 0.0], "feature": [] },
            { "id": 1, "pos": [1.0, 0.0], "feature": [] }
        ] }"#;
        assert!(matches!(
            FloorGraph::from_json(dup),
            Err(GraphError::DuplicateNodeId(1))
        ));

        let dangling = r#"{ "nodes": [ { "id": 1, "pos": [0.0, 0.0], "feature": [] } ],
                            "edges": [[1, 99]] }"#;
        assert!(matches!(
            FloorGraph::from_json(dangling),
            Err(GraphError::UnknownEdgeEndpoint(99))
        ));

        let bad_label = r#"{ "nodes": [ { "id": 1, "pos": [0.0, 0.0], "feature": [], "label": 4 } ] }"#;
        assert!(matches!(
            FloorGraph::from_json(bad_label),
            Err(GraphError::InvalidClass(4))
        ));

        assert!(matches!(
            FloorGraph::from_json("not json"),
            Err(GraphError::Serialization(_))
        ));
    }

    #[test]
    fn empty_document_is_an_empty_graph() {
        let g = FloorGraph::from_json(r#"{ "nodes": [] }"#).unwrap();
        assert!(g.is_empty());
    }
}
