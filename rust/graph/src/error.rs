// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for graph construction and ingestion.

use crate::graph::NodeId;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building, querying or loading a graph.
///
/// Every ingestion error is a data-integrity failure: the graph is rejected
/// as a whole and no partially-built graph is returned.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node id does not refer to a node of the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A feature vector has a different length than the graph's features.
    #[error("feature length mismatch on node {node}: expected {expected}, found {found}")]
    FeatureLength {
        node: i64,
        expected: usize,
        found: usize,
    },

    /// A serialized node carries no `pos` attribute.
    #[error("node {0} has no position")]
    MissingPosition(i64),

    /// A serialized node carries no `feature` attribute.
    #[error("node {0} has no feature vector")]
    MissingFeature(i64),

    /// A node position contains NaN or infinity.
    #[error("node {0} has a non-finite position")]
    NonFinitePosition(i64),

    /// Two serialized nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(i64),

    /// An edge references a node id that is not in the document.
    #[error("edge references unknown node id: {0}")]
    UnknownEdgeEndpoint(i64),

    /// A class label other than 0 (other) or 1 (door).
    #[error("invalid class label {0}, expected 0 or 1")]
    InvalidClass(i64),

    /// Graphs with different feature lengths cannot be batched.
    #[error("cannot batch graphs with feature lengths {expected} and {found}")]
    BatchFeatureLength { expected: usize, found: usize },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading a graph file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
