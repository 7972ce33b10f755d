// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! doorgraph - door detection on floor-plan graphs.
//!
//! Usage:
//!   doorgraph predict --data-path <dir> --predict-list <file> --model <name>
//!   doorgraph train --data-path <dir> --train-list <file> --val-list <file> \
//!       --network <name> --output-model <name>
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod config;
mod predict;
mod report;
mod train;

use config::Config;

#[derive(Parser)]
#[command(name = "doorgraph")]
#[command(about = "Door detection on floor-plan graphs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify graph nodes and extract door instances
    Predict(predict::PredictArgs),
    /// Train a node classifier on labelled graphs
    Train(train::TrainArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to configure worker threads")?;

    tracing::debug!(
        worker_threads = config.worker_threads,
        models_dir = %config.models_dir.display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Predict(args) => predict::run(args, &config),
        Commands::Train(args) => train::run(args, &config),
    }
}
