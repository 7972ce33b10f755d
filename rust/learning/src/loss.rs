// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Class-weighted cross-entropy over node logits.

use doorgraph_graph::NodeClass;
use nalgebra::DMatrix;

use crate::classifier::Logits;
use crate::error::{LearningError, Result};

/// Class weights from a batch's label distribution.
///
/// Returns `[door_fraction, 1 - door_fraction]`, indexed by class: the
/// `Other` class is weighted by the share of door labels and the `Door`
/// class by the share of everything else. An empty label set yields
/// `[0.0, 1.0]`.
pub fn compute_class_weights(labels: &[NodeClass]) -> [f32; 2] {
    if labels.is_empty() {
        return [0.0, 1.0];
    }
    let doors = labels.iter().filter(|c| c.is_door()).count();
    let door_fraction = doors as f32 / labels.len() as f32;
    [door_fraction, 1.0 - door_fraction]
}

/// Scalar loss and its gradient with respect to the logits.
#[derive(Debug, Clone)]
pub struct LossOutput {
    pub loss: f32,
    pub grad: DMatrix<f32>,
}

/// Weighted mean negative log-likelihood of the softmax of `logits`.
///
/// `loss = sum_i w[y_i] * nll_i / sum_i w[y_i]`. When the weights of all
/// present labels sum to zero the loss and gradient are zero.
pub fn weighted_cross_entropy(
    logits: &Logits,
    labels: &[NodeClass],
    weights: &[f32; 2],
) -> Result<LossOutput> {
    if logits.ncols() != NodeClass::COUNT {
        return Err(LearningError::Dimension {
            what: "logit columns",
            expected: NodeClass::COUNT,
            found: logits.ncols(),
        });
    }
    if logits.nrows() != labels.len() {
        return Err(LearningError::Dimension {
            what: "label count",
            expected: logits.nrows(),
            found: labels.len(),
        });
    }

    let mut grad = DMatrix::zeros(logits.nrows(), logits.ncols());
    let weight_sum: f32 = labels.iter().map(|c| weights[c.index()]).sum();
    if weight_sum <= 0.0 {
        return Ok(LossOutput { loss: 0.0, grad });
    }

    let mut loss = 0.0f32;
    for (i, label) in labels.iter().enumerate() {
        let row = logits.row(i);
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let sum_exp: f32 = row.iter().map(|z| (z - max).exp()).sum();
        let log_norm = max + sum_exp.ln();

        let target = label.index();
        let w = weights[target] / weight_sum;
        loss += w * (log_norm - row[target]);

        for c in 0..row.len() {
            let p = (row[c] - log_norm).exp();
            let indicator = if c == target { 1.0 } else { 0.0 };
            grad[(i, c)] = w * (p - indicator);
        }
    }

    Ok(LossOutput { loss, grad })
}
