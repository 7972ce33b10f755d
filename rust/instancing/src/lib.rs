// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door instance extraction from per-node predictions
//!
//! This crate turns noisy binary node classifications over a floor-plan graph
//! into a clean set of discrete door instances:
//! 1. Optional 2-hop majority smoothing of the predictions
//! 2. Induction of the door-node subgraph
//! 3. Connected-component splitting
//! 4. Density-based spatial re-clustering of every component
//! 5. Size filtering, bounding-box geometry and outlier rejection
//! 6. Dense instance id assignment
//!
//! # Usage
//!
//! ```rust,ignore
//! use doorgraph_instancing::{extract_instances, ExtractionConfig};
//!
//! let extraction = extract_instances(&graph, &predictions, &ExtractionConfig::default())?;
//! for door in &extraction.instances {
//!     println!("door {} has {} nodes", door.id, door.nodes.len());
//! }
//! ```
//!
//! Every function here is a pure transform over its inputs; graphs can be
//! processed independently in parallel with [`extract_batch`].

pub mod clustering;
pub mod config;
pub mod error;
pub mod extractor;
pub mod geometry;
pub mod outliers;
pub mod render;
pub mod smoothing;
pub mod types;

pub use clustering::{cluster_members, dbscan};
pub use config::{ExtractionConfig, OutlierPolicy};
pub use error::{InstancingError, Result};
pub use extractor::{extract_batch, extract_instances};
pub use geometry::{BoundingBox, InstanceGeometry};
pub use render::InstanceRenderer;
pub use smoothing::{smooth_predictions, smooth_predictions_n};
pub use types::{predictions_from_labels, DoorInstance, Extraction, ExtractionStats, Predictions};
