// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide settings loaded from environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use doorgraph_instancing::ExtractionConfig;

/// Default directory holding trained models.
pub const DEFAULT_MODELS_DIR: &str = "trained_models";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one sub-directory per trained model.
    pub models_dir: PathBuf,
    /// Number of worker threads for per-graph parallelism.
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            models_dir: std::env::var("DOORGRAPH_MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR)),
            worker_threads: std::env::var("WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or_else(num_cpus::get),
        }
    }
}

/// Reads an extraction config file, or the defaults when no file is given.
pub fn load_extraction_config(path: Option<&PathBuf>) -> Result<ExtractionConfig> {
    let config = match path {
        Some(path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load extraction config: {}", path.display()))?,
        None => ExtractionConfig::default(),
    };
    config.validate().context("Invalid extraction config")?;
    Ok(config)
}

/// Resolves a manifest path against the data directory. Absolute manifest
/// paths are used as given.
pub fn manifest_path(data_path: &Path, manifest: &Path) -> PathBuf {
    data_path.join(manifest)
}
