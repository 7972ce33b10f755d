// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `doorgraph train`: fit a node classifier and store it as a model artifact.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use doorgraph_learning::{
    load_samples, make_batches, read_manifest, AffineNodeClassifier, ModelArtifact, NetworkKind,
    Sample, Trainer,
};
use tracing::info;

use crate::config::{manifest_path, Config};

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory the manifest entries are relative to
    #[arg(long, default_value = "data/Public")]
    pub data_path: PathBuf,

    /// Manifest of training graphs (relative to --data-path)
    #[arg(long)]
    pub train_list: PathBuf,

    /// Manifest of validation graphs (relative to --data-path)
    #[arg(long)]
    pub val_list: PathBuf,

    /// Network name (linear, mean_aggregate)
    #[arg(long, default_value = "mean_aggregate")]
    pub network: String,

    #[arg(long, default_value = "50")]
    pub epochs: usize,

    /// Graphs per batch
    #[arg(long, default_value = "4")]
    pub batch_size: usize,

    /// Learning rate (defaults to the network's setting)
    #[arg(long)]
    pub lr: Option<f32>,

    /// L2 weight decay (defaults to the network's setting)
    #[arg(long)]
    pub weight_decay: Option<f32>,

    /// Name of the model directory to write
    #[arg(long)]
    pub output_model: String,

    /// Directory holding trained models (overrides DOORGRAPH_MODELS_DIR)
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Write per-epoch summaries as JSON
    #[arg(long)]
    pub history: Option<PathBuf>,
}

fn load(args: &TrainArgs, list: &Path) -> Result<Vec<Sample>> {
    let manifest = manifest_path(&args.data_path, list);
    let entries = read_manifest(&manifest)
        .with_context(|| format!("Failed to read manifest: {}", manifest.display()))?;
    load_samples(&args.data_path, &entries)
        .with_context(|| format!("Failed to load graphs listed in {}", manifest.display()))
}

pub fn run(args: TrainArgs, config: &Config) -> Result<()> {
    let kind: NetworkKind = args.network.parse()?;
    let mut hyper = kind.hyperparameters();
    if let Some(lr) = args.lr {
        hyper.lr = lr;
    }
    if let Some(weight_decay) = args.weight_decay {
        hyper.weight_decay = weight_decay;
    }

    let train_samples = load(&args, &args.train_list)?;
    let val_samples = load(&args, &args.val_list)?;
    let Some(first) = train_samples.first() else {
        bail!(
            "Training manifest {} is empty",
            manifest_path(&args.data_path, &args.train_list).display()
        );
    };
    let n_features = first.graph.feature_len();

    let train = make_batches(&train_samples, args.batch_size)?;
    let val = make_batches(&val_samples, args.batch_size)?;
    info!(
        network = %kind,
        n_features,
        train_graphs = train_samples.len(),
        val_graphs = val_samples.len(),
        batches = train.len(),
        "Starting training"
    );

    let mut model = AffineNodeClassifier::new(kind, n_features);
    let reports = Trainer::new(hyper).fit(&mut model, &train, &val, args.epochs)?;

    let models_dir = args
        .models_dir
        .clone()
        .unwrap_or_else(|| config.models_dir.clone());
    let dir = ModelArtifact::new(model)
        .save(&models_dir, &args.output_model)
        .with_context(|| format!("Failed to save model {}", args.output_model))?;
    info!(path = %dir.display(), "Model saved");

    if let Some(path) = &args.history {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history: {}", path.display()))?;
    }
    Ok(())
}
