// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # DoorGraph Learning
//!
//! The supervised side of door detection: the node classifier interface,
//! model artifacts, the class-balanced cross-entropy loss, metrics and the
//! epoch-level training orchestrator.
//!
//! The crate ships two small reference networks ([`NetworkKind::Linear`] and
//! [`NetworkKind::MeanAggregate`]) so the full train/predict workflow runs
//! end to end; any other model plugs in through [`NodeClassifier`] and
//! [`TrainableClassifier`].

pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod loss;
pub mod metadata;
pub mod metrics;
pub mod network;
pub mod trainer;

pub use artifact::{ModelArtifact, METADATA_FILE, METADATA_JSON_FILE, PARAMETERS_FILE};
pub use classifier::{feature_matrix, predict_classes, Logits, NodeClassifier, TrainableClassifier};
pub use dataset::{collate, load_graph, load_samples, make_batches, read_manifest, Batch, Sample};
pub use error::{LearningError, Result};
pub use loss::{compute_class_weights, weighted_cross_entropy, LossOutput};
pub use metadata::ModelMetadata;
pub use metrics::{accuracy, balanced_accuracy, class_accuracy};
pub use network::{AffineNodeClassifier, AffineParameters, Hyperparameters, NetworkKind};
pub use trainer::{BatchMetrics, EpochReport, EpochSummary, Trainer};
