// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node classifier interface.

use doorgraph_graph::{FloorGraph, NodeClass};
use nalgebra::DMatrix;

use crate::error::{LearningError, Result};
use crate::metadata::ModelMetadata;
use crate::network::Hyperparameters;

/// Raw class scores: one row per node, one column per class.
pub type Logits = DMatrix<f32>;

/// A model that scores every node of a graph.
pub trait NodeClassifier {
    fn metadata(&self) -> &ModelMetadata;

    /// Computes logits for every node. `features` has one row per node.
    fn forward(&self, graph: &FloorGraph, features: &DMatrix<f32>) -> Result<Logits>;

    /// Predicts the class of every node (arg-max of the logits).
    fn classify(&self, graph: &FloorGraph, features: &DMatrix<f32>) -> Result<Vec<NodeClass>> {
        predict_classes(&self.forward(graph, features)?)
    }
}

/// A classifier that can take an optimization step.
pub trait TrainableClassifier: NodeClassifier {
    /// Applies one parameter update given the loss gradient w.r.t. the logits
    /// produced by `forward(graph, features)`.
    fn backward_step(
        &mut self,
        graph: &FloorGraph,
        features: &DMatrix<f32>,
        grad_logits: &DMatrix<f32>,
        hyper: &Hyperparameters,
    ) -> Result<()>;
}

/// Arg-max of every row. Ties resolve to the lowest class index.
pub fn predict_classes(logits: &Logits) -> Result<Vec<NodeClass>> {
    if logits.ncols() != NodeClass::COUNT {
        return Err(LearningError::Dimension {
            what: "logit columns",
            expected: NodeClass::COUNT,
            found: logits.ncols(),
        });
    }
    Ok(logits
        .row_iter()
        .map(|row| {
            let mut best = 0;
            for c in 1..row.len() {
                if row[c] > row[best] {
                    best = c;
                }
            }
            NodeClass::from_index(best).unwrap_or(NodeClass::Other)
        })
        .collect())
}

/// Stacks the node feature vectors of a graph into a `nodes x features` matrix.
pub fn feature_matrix(graph: &FloorGraph) -> DMatrix<f32> {
    DMatrix::from_fn(graph.node_count(), graph.feature_len(), |i, j| {
        graph.feature(i)[j]
    })
}
