// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for classifiers, artifacts and training.

use doorgraph_graph::GraphError;

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    /// A matrix or vector has the wrong shape.
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    Dimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The network name is not in the registry.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// The model metadata record is malformed.
    #[error("invalid model metadata: {0}")]
    Metadata(String),

    /// A training sample has nodes without ground-truth labels.
    #[error("graph {0} has unlabelled nodes")]
    MissingLabels(String),

    /// Batches must contain at least one node.
    #[error("empty batch")]
    EmptyBatch,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
