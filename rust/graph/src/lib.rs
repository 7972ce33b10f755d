// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # DoorGraph Graph
//!
//! Attributed floor-plan graphs for node classification.
//!
//! Nodes are dense integer ids into per-node attribute arrays (position,
//! feature vector, optional ground-truth class). Edges are undirected and
//! stored as adjacency lists, which keeps neighborhood queries, induced
//! subgraphs and connected components simple and deterministic.
//!
//! ```rust,ignore
//! use doorgraph_graph::{FloorGraph, NodeClass, Point2D};
//!
//! let mut graph = FloorGraph::new(2);
//! let a = graph.add_node(Point2D::new(0.0, 0.0), vec![0.1, 0.2])?;
//! let b = graph.add_node(Point2D::new(10.0, 0.0), vec![0.3, 0.4])?;
//! graph.add_edge(a, b)?;
//!
//! let doors = graph.induced_subgraph(&[a, b])?;
//! assert_eq!(doors.connected_components().len(), 1);
//! ```

pub mod batch;
pub mod error;
pub mod graph;
pub mod serialization;
pub mod spatial;
pub mod subgraph;
pub mod types;

pub use batch::BatchedGraph;
pub use error::{GraphError, Result};
pub use graph::{FloorGraph, NodeAttributes, NodeId};
pub use serialization::{EdgeDocument, GraphDocument, NodeDocument};
pub use spatial::SpatialGrid;
pub use subgraph::Subgraph;
pub use types::{NodeClass, Point2D};
