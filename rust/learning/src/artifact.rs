// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On-disk trained models.
//!
//! A model named `name` lives in `<models_dir>/<name>/`:
//! - `predict_info.txt`: the [`ModelMetadata`] record, or `predict_info.json`
//!   holding the same fields
//! - `model.json`: the serialized network parameters

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::classifier::NodeClassifier;
use crate::error::{LearningError, Result};
use crate::metadata::ModelMetadata;
use crate::network::{AffineNodeClassifier, AffineParameters, NetworkKind};

pub const METADATA_FILE: &str = "predict_info.txt";
pub const METADATA_JSON_FILE: &str = "predict_info.json";
pub const PARAMETERS_FILE: &str = "model.json";

/// Metadata plus the trained classifier it describes.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub classifier: AffineNodeClassifier,
}

impl ModelArtifact {
    pub fn new(classifier: AffineNodeClassifier) -> Self {
        Self {
            metadata: classifier.metadata().clone(),
            classifier,
        }
    }

    pub fn directory(models_dir: impl AsRef<Path>, name: &str) -> PathBuf {
        models_dir.as_ref().join(name)
    }

    /// Loads `<models_dir>/<name>/`, checking that the metadata record agrees
    /// with the stored parameters.
    pub fn load(models_dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = Self::directory(models_dir, name);
        let text_record = dir.join(METADATA_FILE);
        let json_record = dir.join(METADATA_JSON_FILE);
        let metadata = if !text_record.exists() && json_record.exists() {
            ModelMetadata::from_json_file(json_record)?
        } else {
            ModelMetadata::from_file(text_record)?
        };
        let kind: NetworkKind = metadata.network_name.parse()?;

        let json = std::fs::read_to_string(dir.join(PARAMETERS_FILE))?;
        let params: AffineParameters =
            serde_json::from_str(&json).map_err(|e| LearningError::Serialization(e.to_string()))?;

        if params.network != kind {
            return Err(LearningError::Metadata(format!(
                "metadata names network {} but parameters are for {}",
                kind, params.network
            )));
        }
        if params.n_features != metadata.n_features {
            return Err(LearningError::Dimension {
                what: "feature count",
                expected: metadata.n_features,
                found: params.n_features,
            });
        }
        if params.n_classes != metadata.n_classes {
            return Err(LearningError::Dimension {
                what: "class count",
                expected: metadata.n_classes,
                found: params.n_classes,
            });
        }

        let classifier = AffineNodeClassifier::from_parameters(params)?;
        debug!(model = name, network = %kind, n_features = metadata.n_features, "Loaded model");
        Ok(Self {
            metadata,
            classifier,
        })
    }

    /// Writes both files, creating the model directory if needed.
    pub fn save(&self, models_dir: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
        let dir = Self::directory(models_dir, name);
        std::fs::create_dir_all(&dir)?;
        self.metadata.write_file(dir.join(METADATA_FILE))?;
        let json = serde_json::to_string_pretty(&self.classifier.to_parameters())
            .map_err(|e| LearningError::Serialization(e.to_string()))?;
        std::fs::write(dir.join(PARAMETERS_FILE), json)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ModelArtifact::new(AffineNodeClassifier::new(NetworkKind::MeanAggregate, 4));
        let model_dir = artifact.save(dir.path(), "m1").unwrap();
        assert!(model_dir.join(METADATA_FILE).exists());

        let loaded = ModelArtifact::load(dir.path(), "m1").unwrap();
        assert_eq!(loaded.metadata, ModelMetadata::new("mean_aggregate", 4, 2));
        assert_eq!(loaded.classifier.kind(), NetworkKind::MeanAggregate);
    }

    #[test]
    fn json_metadata_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ModelArtifact::new(AffineNodeClassifier::new(NetworkKind::Linear, 3));
        let model_dir = artifact.save(dir.path(), "m1").unwrap();
        std::fs::remove_file(model_dir.join(METADATA_FILE)).unwrap();
        std::fs::write(
            model_dir.join(METADATA_JSON_FILE),
            r#"{"network_name": "linear", "n_features": 3, "n_classes": 2}"#,
        )
        .unwrap();

        let loaded = ModelArtifact::load(dir.path(), "m1").unwrap();
        assert_eq!(loaded.metadata, ModelMetadata::new("linear", 3, 2));
    }

    #[test]
    fn mismatched_metadata_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ModelArtifact::new(AffineNodeClassifier::new(NetworkKind::Linear, 4));
        let model_dir = artifact.save(dir.path(), "m1").unwrap();
        ModelMetadata::new("linear", 5, 2)
            .write_file(model_dir.join(METADATA_FILE))
            .unwrap();

        assert!(matches!(
            ModelArtifact::load(dir.path(), "m1"),
            Err(LearningError::Dimension { what: "feature count", .. })
        ));
    }

    #[test]
    fn missing_model_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelArtifact::load(dir.path(), "nope"),
            Err(LearningError::Io(_))
        ));
    }
}
