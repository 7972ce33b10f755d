// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `doorgraph predict`: classify nodes, then extract door instances.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use doorgraph_graph::{FloorGraph, NodeClass};
use doorgraph_instancing::{
    extract_instances, Extraction, ExtractionConfig, InstanceRenderer, OutlierPolicy,
};
use doorgraph_learning::{
    feature_matrix, load_graph, read_manifest, ModelArtifact, NodeClassifier,
};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{load_extraction_config, manifest_path, Config};
use crate::report::JsonReport;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutlierMode {
    /// Fixed aspect-ratio and extent thresholds
    Fixed,
    /// Interquartile-range fences on bounding-box area
    Iqr,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory the manifest entries are relative to
    #[arg(long, default_value = "data/Public")]
    pub data_path: PathBuf,

    /// Manifest listing one graph document per line (relative to --data-path)
    #[arg(long, default_value = "test_list.txt")]
    pub predict_list: PathBuf,

    /// Name of the trained model
    #[arg(long)]
    pub model: String,

    /// Directory holding trained models (overrides DOORGRAPH_MODELS_DIR)
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Extraction config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of 2-hop majority smoothing sweeps
    #[arg(long)]
    pub smoothing_passes: Option<usize>,

    /// Spatial re-clustering distance
    #[arg(long)]
    pub cluster_distance: Option<f64>,

    /// Candidates need strictly more nodes than this
    #[arg(long)]
    pub min_instance_nodes: Option<usize>,

    /// Outlier rejection rule
    #[arg(long, value_enum)]
    pub outlier_policy: Option<OutlierMode>,
}

impl PredictArgs {
    /// The manifest location, resolved against the data directory.
    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.data_path, &self.predict_list)
    }

    /// The config file (or defaults) with command-line overrides applied.
    fn extraction_config(&self) -> Result<ExtractionConfig> {
        let mut config = load_extraction_config(self.config.as_ref())?;
        if let Some(passes) = self.smoothing_passes {
            config.smoothing_passes = passes;
        }
        if let Some(distance) = self.cluster_distance {
            config.cluster_distance = distance;
        }
        if let Some(min) = self.min_instance_nodes {
            config.min_instance_nodes = min;
        }
        match self.outlier_policy {
            Some(OutlierMode::Fixed) => config.outlier_policy = OutlierPolicy::default(),
            Some(OutlierMode::Iqr) => config.outlier_policy = OutlierPolicy::interquartile_range(),
            None => {}
        }
        config.validate().context("Invalid extraction config")?;
        Ok(config)
    }
}

/// Everything produced for one graph.
struct GraphPrediction {
    graph: FloorGraph,
    predictions: Vec<NodeClass>,
    extraction: Extraction,
}

fn predict_graph(
    data_path: &Path,
    entry: &str,
    model: &impl NodeClassifier,
    config: &ExtractionConfig,
) -> Result<GraphPrediction> {
    let graph = load_graph(data_path, entry).context("Failed to load graph")?;
    let features = feature_matrix(&graph);
    let predictions = model
        .classify(&graph, &features)
        .context("Classification failed")?;
    let extraction =
        extract_instances(&graph, &predictions, config).context("Instance extraction failed")?;
    Ok(GraphPrediction {
        graph,
        predictions,
        extraction,
    })
}

pub fn run(args: PredictArgs, config: &Config) -> Result<()> {
    let extraction_config = args.extraction_config()?;
    let models_dir = args
        .models_dir
        .clone()
        .unwrap_or_else(|| config.models_dir.clone());
    let artifact = ModelArtifact::load(&models_dir, &args.model).with_context(|| {
        format!(
            "Failed to load model {} from {}",
            args.model,
            models_dir.display()
        )
    })?;
    let manifest = args.manifest_path();
    let entries = read_manifest(&manifest)
        .with_context(|| format!("Failed to read manifest: {}", manifest.display()))?;

    info!(
        graphs = entries.len(),
        model = %args.model,
        network = %artifact.metadata.network_name,
        "Running prediction"
    );

    // Graphs are independent; a failure only affects its own entry.
    let results: Vec<(&String, Result<GraphPrediction>)> = entries
        .par_iter()
        .map(|entry| {
            let result = predict_graph(
                &args.data_path,
                entry,
                &artifact.classifier,
                &extraction_config,
            );
            (entry, result)
        })
        .collect();

    let mut report = JsonReport::new(&args.model);
    for (entry, result) in results {
        match result {
            Ok(p) => {
                info!(graph = %entry, "Number of doors: {}", p.extraction.door_count());
                report.render_predictions(entry, &p.graph, &p.predictions)?;
                report.render_instances(entry, &p.graph, &p.extraction)?;
            }
            Err(e) => {
                warn!(graph = %entry, error = %format!("{e:#}"), "Skipping graph");
                report.record_failure(entry, &e);
            }
        }
    }

    info!(
        processed = report.graphs.len(),
        failed = report.failures.len(),
        total_doors = report.total_doors,
        "Prediction complete"
    );
    report.write(args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PredictArgs {
        PredictArgs {
            data_path: PathBuf::from("data"),
            predict_list: PathBuf::from("list.txt"),
            model: "m".into(),
            models_dir: None,
            config: None,
            output: None,
            smoothing_passes: None,
            cluster_distance: None,
            min_instance_nodes: None,
            outlier_policy: None,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let config = PredictArgs {
            smoothing_passes: Some(2),
            cluster_distance: Some(500.0),
            outlier_policy: Some(OutlierMode::Iqr),
            ..args()
        }
        .extraction_config()
        .unwrap();
        assert_eq!(config.smoothing_passes, 2);
        assert_eq!(config.cluster_distance, 500.0);
        assert_eq!(config.outlier_policy, OutlierPolicy::interquartile_range());
        assert_eq!(config.min_instance_nodes, 8);
    }

    #[test]
    fn manifest_is_read_from_the_data_path() {
        assert_eq!(args().manifest_path(), PathBuf::from("data/list.txt"));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let result = PredictArgs {
            cluster_distance: Some(-1.0),
            ..args()
        }
        .extraction_config();
        assert!(result.is_err());
    }
}
