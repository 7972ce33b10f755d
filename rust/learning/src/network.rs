// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference node classification networks.
//!
//! Both networks are a single affine layer over a per-node input vector:
//! - `linear`: the node's own features
//! - `mean_aggregate`: the node's features concatenated with the mean of its
//!   neighbors' features (a one-layer GraphSAGE-style mean aggregator)

use std::fmt;
use std::str::FromStr;

use doorgraph_graph::{FloorGraph, NodeClass};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::classifier::{Logits, NodeClassifier, TrainableClassifier};
use crate::error::{LearningError, Result};
use crate::metadata::ModelMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    Linear,
    MeanAggregate,
}

impl NetworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Linear => "linear",
            NetworkKind::MeanAggregate => "mean_aggregate",
        }
    }

    /// Optimizer settings registered for this network.
    pub fn hyperparameters(&self) -> Hyperparameters {
        match self {
            NetworkKind::Linear => Hyperparameters {
                lr: 0.05,
                weight_decay: 5e-4,
            },
            NetworkKind::MeanAggregate => Hyperparameters {
                lr: 0.02,
                weight_decay: 5e-4,
            },
        }
    }

    /// Length of the per-node input vector for `n_features` node features.
    pub fn input_len(&self, n_features: usize) -> usize {
        match self {
            NetworkKind::Linear => n_features,
            NetworkKind::MeanAggregate => 2 * n_features,
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkKind {
    type Err = LearningError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(NetworkKind::Linear),
            "mean_aggregate" | "sage" => Ok(NetworkKind::MeanAggregate),
            other => Err(LearningError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Plain gradient-descent settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub lr: f32,
    pub weight_decay: f32,
}

/// Serializable parameters of an [`AffineNodeClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffineParameters {
    pub network: NetworkKind,
    pub n_features: usize,
    pub n_classes: usize,
    /// `n_classes x input_len`, row-major.
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
}

/// A single affine layer over per-node (optionally aggregated) features.
#[derive(Debug, Clone)]
pub struct AffineNodeClassifier {
    kind: NetworkKind,
    metadata: ModelMetadata,
    /// `n_classes x input_len`
    weights: DMatrix<f32>,
    bias: DVector<f32>,
}

impl AffineNodeClassifier {
    /// Creates a zero-initialized binary classifier.
    pub fn new(kind: NetworkKind, n_features: usize) -> Self {
        let n_classes = NodeClass::COUNT;
        Self {
            kind,
            metadata: ModelMetadata::new(kind.as_str(), n_features, n_classes),
            weights: DMatrix::zeros(n_classes, kind.input_len(n_features)),
            bias: DVector::zeros(n_classes),
        }
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    pub fn weights(&self) -> &DMatrix<f32> {
        &self.weights
    }

    pub fn bias(&self) -> &DVector<f32> {
        &self.bias
    }

    /// Restores a classifier from serialized parameters.
    pub fn from_parameters(params: AffineParameters) -> Result<Self> {
        if params.n_classes != NodeClass::COUNT {
            return Err(LearningError::Dimension {
                what: "class count",
                expected: NodeClass::COUNT,
                found: params.n_classes,
            });
        }
        let input_len = params.network.input_len(params.n_features);
        if params.weights.len() != params.n_classes * input_len {
            return Err(LearningError::Dimension {
                what: "weights",
                expected: params.n_classes * input_len,
                found: params.weights.len(),
            });
        }
        if params.bias.len() != params.n_classes {
            return Err(LearningError::Dimension {
                what: "bias",
                expected: params.n_classes,
                found: params.bias.len(),
            });
        }
        Ok(Self {
            kind: params.network,
            metadata: ModelMetadata::new(
                params.network.as_str(),
                params.n_features,
                params.n_classes,
            ),
            weights: DMatrix::from_row_slice(params.n_classes, input_len, &params.weights),
            bias: DVector::from_vec(params.bias),
        })
    }

    pub fn to_parameters(&self) -> AffineParameters {
        let weights = self
            .weights
            .row_iter()
            .flat_map(|row| row.iter().copied().collect::<Vec<_>>())
            .collect();
        AffineParameters {
            network: self.kind,
            n_features: self.metadata.n_features,
            n_classes: self.metadata.n_classes,
            weights,
            bias: self.bias.iter().copied().collect(),
        }
    }

    /// Builds the `nodes x input_len` input matrix.
    fn inputs(&self, graph: &FloorGraph, features: &DMatrix<f32>) -> Result<DMatrix<f32>> {
        let n_features = self.metadata.n_features;
        if features.ncols() != n_features {
            return Err(LearningError::Dimension {
                what: "feature columns",
                expected: n_features,
                found: features.ncols(),
            });
        }
        if features.nrows() != graph.node_count() {
            return Err(LearningError::Dimension {
                what: "feature rows",
                expected: graph.node_count(),
                found: features.nrows(),
            });
        }

        match self.kind {
            NetworkKind::Linear => Ok(features.clone()),
            NetworkKind::MeanAggregate => {
                let n = graph.node_count();
                let mut x = DMatrix::zeros(n, 2 * n_features);
                for v in 0..n {
                    for j in 0..n_features {
                        x[(v, j)] = features[(v, j)];
                    }
                    let neighbors = graph.neighbors(v);
                    if neighbors.is_empty() {
                        continue;
                    }
                    let scale = 1.0 / neighbors.len() as f32;
                    for &u in neighbors {
                        for j in 0..n_features {
                            x[(v, n_features + j)] += features[(u, j)] * scale;
                        }
                    }
                }
                Ok(x)
            }
        }
    }
}

impl NodeClassifier for AffineNodeClassifier {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn forward(&self, graph: &FloorGraph, features: &DMatrix<f32>) -> Result<Logits> {
        let x = self.inputs(graph, features)?;
        let mut logits = x * self.weights.transpose();
        for mut row in logits.row_iter_mut() {
            for c in 0..row.len() {
                row[c] += self.bias[c];
            }
        }
        Ok(logits)
    }
}

impl TrainableClassifier for AffineNodeClassifier {
    fn backward_step(
        &mut self,
        graph: &FloorGraph,
        features: &DMatrix<f32>,
        grad_logits: &DMatrix<f32>,
        hyper: &Hyperparameters,
    ) -> Result<()> {
        let x = self.inputs(graph, features)?;
        if grad_logits.shape() != (x.nrows(), self.metadata.n_classes) {
            return Err(LearningError::Dimension {
                what: "gradient rows",
                expected: x.nrows(),
                found: grad_logits.nrows(),
            });
        }

        let grad_w = grad_logits.transpose() * &x;
        let mut grad_b = DVector::<f32>::zeros(self.metadata.n_classes);
        for row in grad_logits.row_iter() {
            for c in 0..row.len() {
                grad_b[c] += row[c];
            }
        }

        let decay = &self.weights * hyper.weight_decay;
        self.weights -= (grad_w + decay) * hyper.lr;
        self.bias -= grad_b * hyper.lr;
        Ok(())
    }
}
