// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model metadata record stored next to trained parameters.
//!
//! The record is a three-line text file:
//!
//! ```text
//! mean_aggregate
//! 12
//! 2
//! ```
//!
//! holding the network name, the number of features per node and the number
//! of classes. The same fields can also be stored as a JSON object.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LearningError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub network_name: String,
    pub n_features: usize,
    pub n_classes: usize,
}

impl ModelMetadata {
    pub fn new(network_name: impl Into<String>, n_features: usize, n_classes: usize) -> Self {
        Self {
            network_name: network_name.into(),
            n_features,
            n_classes,
        }
    }

    /// Parses the three-line text record. Trailing whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim_end);
        let mut next = |what: &str| {
            lines
                .next()
                .filter(|l| !l.is_empty())
                .ok_or_else(|| LearningError::Metadata(format!("missing {what}")))
        };

        let network_name = next("network name")?.to_string();
        let n_features = parse_count(next("feature count")?, "feature count")?;
        let n_classes = parse_count(next("class count")?, "class count")?;
        Ok(Self {
            network_name,
            n_features,
            n_classes,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parses `{"network_name": .., "n_features": .., "n_classes": ..}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LearningError::Metadata(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for ModelMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.network_name)?;
        writeln!(f, "{}", self.n_features)?;
        writeln!(f, "{}", self.n_classes)
    }
}

fn parse_count(value: &str, what: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| LearningError::Metadata(format!("{what} is not a non-negative integer: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_three_line_record() {
        let meta = ModelMetadata::parse("gat\n12\n2\n").unwrap();
        assert_eq!(meta, ModelMetadata::new("gat", 12, 2));
    }

    #[test]
    fn display_is_parseable() {
        let meta = ModelMetadata::new("linear", 3, 2);
        assert_eq!(ModelMetadata::parse(&meta.to_string()).unwrap(), meta);
    }

    #[test]
    fn parse_json_record() {
        let json = r#"{"network_name": "linear", "n_features": 3, "n_classes": 2}"#;
        let meta = ModelMetadata::from_json(json).unwrap();
        assert_eq!(meta, ModelMetadata::new("linear", 3, 2));
        assert!(matches!(
            ModelMetadata::from_json(r#"{"network_name": "linear"}"#),
            Err(LearningError::Metadata(_))
        ));
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(matches!(
            ModelMetadata::parse("gat\n12\n"),
            Err(LearningError::Metadata(_))
        ));
        assert!(matches!(
            ModelMetadata::parse("gat\ntwelve\n2"),
            Err(LearningError::Metadata(_))
        ));
        assert!(ModelMetadata::parse("").is_err());
    }
}
