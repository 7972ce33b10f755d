// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Epoch-level training and validation.
//!
//! Every batch is weighted with [`compute_class_weights`] of its own labels.
//! Epoch figures are arithmetic means over batches; a class absent from a
//! batch's ground truth does not contribute to that class's mean. The first
//! failing batch aborts the epoch.

use doorgraph_graph::NodeClass;
use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::{predict_classes, NodeClassifier, TrainableClassifier};
use crate::dataset::Batch;
use crate::error::Result;
use crate::loss::{compute_class_weights, weighted_cross_entropy};
use crate::metrics::{balanced_accuracy, class_accuracy};
use crate::network::Hyperparameters;

/// Figures for a single batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchMetrics {
    pub loss: f64,
    /// Balanced accuracy.
    pub overall_acc: f64,
    /// Accuracy per class, `None` when the class is absent from the batch.
    pub class_acc: Vec<Option<f64>>,
}

impl BatchMetrics {
    fn measure(loss: f32, predictions: &[NodeClass], labels: &[NodeClass]) -> Self {
        let class_acc = (0..NodeClass::COUNT)
            .filter_map(NodeClass::from_index)
            .map(|c| class_accuracy(predictions, labels, c))
            .collect();
        Self {
            loss: f64::from(loss),
            overall_acc: balanced_accuracy(predictions, labels),
            class_acc,
        }
    }
}

/// Batch means for one pass over a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EpochSummary {
    pub loss: f64,
    pub overall_acc: f64,
    pub class_acc: Vec<Option<f64>>,
}

impl EpochSummary {
    pub fn from_batches(batches: &[BatchMetrics]) -> Self {
        if batches.is_empty() {
            return Self {
                class_acc: vec![None; NodeClass::COUNT],
                ..Self::default()
            };
        }
        let n = batches.len() as f64;
        let class_acc = (0..NodeClass::COUNT)
            .map(|c| {
                let present: Vec<f64> = batches
                    .iter()
                    .filter_map(|b| b.class_acc.get(c).copied().flatten())
                    .collect();
                (!present.is_empty())
                    .then(|| present.iter().sum::<f64>() / present.len() as f64)
            })
            .collect();
        Self {
            loss: batches.iter().map(|b| b.loss).sum::<f64>() / n,
            overall_acc: batches.iter().map(|b| b.overall_acc).sum::<f64>() / n,
            class_acc,
        }
    }

    fn door_acc(&self) -> f64 {
        self.class_acc
            .get(NodeClass::Door.index())
            .copied()
            .flatten()
            .unwrap_or(f64::NAN)
    }
}

/// Training and validation summaries of one epoch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochReport {
    pub epoch: usize,
    pub train: EpochSummary,
    pub val: EpochSummary,
}

#[derive(Debug, Clone)]
pub struct Trainer {
    hyper: Hyperparameters,
}

impl Trainer {
    pub fn new(hyper: Hyperparameters) -> Self {
        Self { hyper }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    /// Forward, loss and one parameter update. Metrics use the predictions
    /// made before the update.
    pub fn train_batch<M: TrainableClassifier>(
        &self,
        model: &mut M,
        batch: &Batch,
    ) -> Result<BatchMetrics> {
        let weights = compute_class_weights(&batch.labels);
        let logits = model.forward(&batch.graph, &batch.features)?;
        let out = weighted_cross_entropy(&logits, &batch.labels, &weights)?;
        model.backward_step(&batch.graph, &batch.features, &out.grad, &self.hyper)?;
        let predictions = predict_classes(&logits)?;
        Ok(BatchMetrics::measure(out.loss, &predictions, &batch.labels))
    }

    pub fn evaluate_batch<M: NodeClassifier>(
        &self,
        model: &M,
        batch: &Batch,
    ) -> Result<BatchMetrics> {
        let weights = compute_class_weights(&batch.labels);
        let logits = model.forward(&batch.graph, &batch.features)?;
        let out = weighted_cross_entropy(&logits, &batch.labels, &weights)?;
        let predictions = predict_classes(&logits)?;
        Ok(BatchMetrics::measure(out.loss, &predictions, &batch.labels))
    }

    pub fn train_epoch<M: TrainableClassifier>(
        &self,
        model: &mut M,
        batches: &[Batch],
    ) -> Result<EpochSummary> {
        let metrics = batches
            .iter()
            .map(|b| self.train_batch(model, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(EpochSummary::from_batches(&metrics))
    }

    pub fn validate_epoch<M: NodeClassifier>(
        &self,
        model: &M,
        batches: &[Batch],
    ) -> Result<EpochSummary> {
        let metrics = batches
            .iter()
            .map(|b| self.evaluate_batch(model, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(EpochSummary::from_batches(&metrics))
    }

    /// Runs `epochs` rounds of training followed by validation.
    pub fn fit<M: TrainableClassifier>(
        &self,
        model: &mut M,
        train: &[Batch],
        val: &[Batch],
        epochs: usize,
    ) -> Result<Vec<EpochReport>> {
        debug!(
            epochs,
            train_batches = train.len(),
            val_batches = val.len(),
            lr = self.hyper.lr,
            "Starting training"
        );
        let mut reports = Vec::with_capacity(epochs);
        for epoch in 1..=epochs {
            let train_summary = self.train_epoch(model, train)?;
            let val_summary = self.validate_epoch(model, val)?;
            info!(
                epoch,
                train_loss = train_summary.loss,
                train_acc = train_summary.overall_acc,
                train_door_acc = train_summary.door_acc(),
                val_loss = val_summary.loss,
                val_acc = val_summary.overall_acc,
                val_door_acc = val_summary.door_acc(),
                "Epoch complete"
            );
            reports.push(EpochReport {
                epoch,
                train: train_summary,
                val: val_summary,
            });
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{collate, Sample};
    use crate::error::LearningError;
    use crate::network::{AffineNodeClassifier, NetworkKind};
    use doorgraph_graph::{FloorGraph, Point2D};
    use doorgraph_graph::NodeClass::{Door as D, Other as O};

    /// Doors carry feature `[1, 0]`, everything else `[0, 1]`.
    fn separable(labels: &[NodeClass]) -> Sample {
        let mut g = FloorGraph::new(2);
        for (i, &l) in labels.iter().enumerate() {
            let feature = if l.is_door() { vec![1.0, 0.0] } else { vec![0.0, 1.0] };
            g.add_labeled_node(Point2D::new(i as f64, 0.0), feature, l)
                .unwrap();
        }
        Sample::new("plan", g).unwrap()
    }

    #[test]
    fn epoch_means_skip_absent_classes() {
        let batches = [
            BatchMetrics {
                loss: 1.0,
                overall_acc: 1.0,
                class_acc: vec![Some(1.0), None],
            },
            BatchMetrics {
                loss: 3.0,
                overall_acc: 0.25,
                class_acc: vec![Some(0.5), Some(0.0)],
            },
        ];
        let summary = EpochSummary::from_batches(&batches);
        assert_eq!(summary.loss, 2.0);
        assert_eq!(summary.overall_acc, 0.625);
        assert_eq!(summary.class_acc, vec![Some(0.75), Some(0.0)]);
    }

    #[test]
    fn fit_learns_a_separable_problem() {
        let train = vec![collate(&[separable(&[D, O, O, O])]).unwrap()];
        let val = vec![collate(&[separable(&[O, D, O])]).unwrap()];
        let mut model = AffineNodeClassifier::new(NetworkKind::Linear, 2);
        let trainer = Trainer::new(NetworkKind::Linear.hyperparameters());

        let reports = trainer.fit(&mut model, &train, &val, 3).unwrap();
        assert_eq!(reports.len(), 3);
        // Zero-initialized logits: every node ties and falls to `Other`.
        assert!((reports[0].train.loss - std::f64::consts::LN_2).abs() < 1e-6);
        assert_eq!(reports[0].train.class_acc[D.index()], Some(0.0));
        assert!(reports[1].train.loss < reports[0].train.loss);
        assert_eq!(reports[2].val.overall_acc, 1.0);
        assert_eq!(reports[2].val.class_acc[D.index()], Some(1.0));
    }

    #[test]
    fn failing_batch_aborts_the_epoch() {
        let batches = vec![collate(&[separable(&[D, O])]).unwrap()];
        let mut model = AffineNodeClassifier::new(NetworkKind::Linear, 3);
        let trainer = Trainer::new(NetworkKind::Linear.hyperparameters());
        assert!(matches!(
            trainer.train_epoch(&mut model, &batches),
            Err(LearningError::Dimension { .. })
        ));
    }
}
