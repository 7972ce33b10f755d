// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for smoothing and instance extraction.

use doorgraph_graph::GraphError;

/// Result type alias for instancing operations.
pub type Result<T> = std::result::Result<T, InstancingError>;

#[derive(Debug, thiserror::Error)]
pub enum InstancingError {
    /// The prediction vector does not have one entry per node.
    #[error("prediction length mismatch: graph has {nodes} nodes, got {predictions} predictions")]
    PredictionLength { nodes: usize, predictions: usize },

    /// A configuration value is out of range.
    #[error("invalid extraction config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Reading or parsing a configuration file failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
