// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification metrics.
//!
//! All functions compare predictions against ground truth position by
//! position; only the common prefix is considered if the lengths differ.

use doorgraph_graph::NodeClass;

/// Fraction of correctly classified nodes. Empty input yields `0.0`.
pub fn accuracy(predictions: &[NodeClass], labels: &[NodeClass]) -> f64 {
    let n = predictions.len().min(labels.len());
    if n == 0 {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();
    correct as f64 / n as f64
}

/// Accuracy restricted to nodes whose ground truth is `class`.
///
/// Returns `None` when no node carries that label.
pub fn class_accuracy(
    predictions: &[NodeClass],
    labels: &[NodeClass],
    class: NodeClass,
) -> Option<f64> {
    let (mut total, mut correct) = (0usize, 0usize);
    for (p, l) in predictions.iter().zip(labels) {
        if *l == class {
            total += 1;
            if p == l {
                correct += 1;
            }
        }
    }
    (total > 0).then(|| correct as f64 / total as f64)
}

/// Mean per-class recall over the classes present in `labels`.
pub fn balanced_accuracy(predictions: &[NodeClass], labels: &[NodeClass]) -> f64 {
    let recalls: Vec<f64> = (0..NodeClass::COUNT)
        .filter_map(NodeClass::from_index)
        .filter_map(|c| class_accuracy(predictions, labels, c))
        .collect();
    if recalls.is_empty() {
        return 0.0;
    }
    recalls.iter().sum::<f64>() / recalls.len() as f64
}
