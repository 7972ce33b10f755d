// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Labelled graph samples, manifests and batching.

use std::ops::Range;
use std::path::Path;

use doorgraph_graph::{FloorGraph, NodeClass, NodeId};
use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::debug;

use crate::classifier::feature_matrix;
use crate::error::{LearningError, Result};

/// A graph whose nodes all carry ground-truth labels.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub graph: FloorGraph,
    pub labels: Vec<NodeClass>,
}

impl Sample {
    pub fn new(name: impl Into<String>, graph: FloorGraph) -> Result<Self> {
        let name = name.into();
        let labels = graph
            .labels()
            .ok_or_else(|| LearningError::MissingLabels(name.clone()))?;
        Ok(Self {
            name,
            graph,
            labels,
        })
    }
}

/// Several samples merged into one disjoint-union graph.
#[derive(Debug, Clone)]
pub struct Batch {
    pub graph: FloorGraph,
    /// Node range of every member sample, in input order.
    pub ranges: Vec<Range<NodeId>>,
    pub labels: Vec<NodeClass>,
    pub features: DMatrix<f32>,
}

impl Batch {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

/// Reads a manifest: one graph path per line, relative to the data
/// directory. Blank lines are skipped.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Loads one graph document from `data_path/entry`.
pub fn load_graph(data_path: impl AsRef<Path>, entry: &str) -> Result<FloorGraph> {
    Ok(FloorGraph::from_json_file(data_path.as_ref().join(entry))?)
}

/// Loads every manifest entry as a labelled sample, in parallel.
///
/// Order follows the manifest. The first failing entry fails the whole load.
pub fn load_samples(data_path: impl AsRef<Path>, entries: &[String]) -> Result<Vec<Sample>> {
    let data_path = data_path.as_ref();
    let samples = entries
        .par_iter()
        .map(|entry| Sample::new(entry.clone(), load_graph(data_path, entry)?))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = samples.len(), path = %data_path.display(), "Loaded samples");
    Ok(samples)
}

/// Merges samples into a single batch.
pub fn collate(samples: &[Sample]) -> Result<Batch> {
    if samples.is_empty() {
        return Err(LearningError::EmptyBatch);
    }
    let batched = FloorGraph::batch(samples.iter().map(|s| &s.graph))?;
    let labels: Vec<NodeClass> = samples
        .iter()
        .flat_map(|s| s.labels.iter().copied())
        .collect();
    let features = feature_matrix(&batched.graph);
    Ok(Batch {
        graph: batched.graph,
        ranges: batched.ranges,
        labels,
        features,
    })
}

/// Groups samples into batches of `batch_size` in order; the last batch may
/// be smaller. A zero batch size is treated as one.
pub fn make_batches(samples: &[Sample], batch_size: usize) -> Result<Vec<Batch>> {
    samples.chunks(batch_size.max(1)).map(collate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorgraph_graph::Point2D;

    fn sample(name: &str, labels: &[NodeClass]) -> Sample {
        let mut g = FloorGraph::new(1);
        for (i, &l) in labels.iter().enumerate() {
            g.add_labeled_node(Point2D::new(i as f64, 0.0), vec![i as f32], l)
                .unwrap();
        }
        for i in 1..labels.len() {
            g.add_edge(i - 1, i).unwrap();
        }
        Sample::new(name, g).unwrap()
    }

    #[test]
    fn unlabelled_graph_is_not_a_sample() {
        let mut g = FloorGraph::new(1);
        g.add_node(Point2D::new(0.0, 0.0), vec![0.0]).unwrap();
        assert!(matches!(
            Sample::new("plan", g),
            Err(LearningError::MissingLabels(name)) if name == "plan"
        ));
    }

    #[test]
    fn collate_concatenates_in_order() {
        let a = sample("a", &[NodeClass::Door, NodeClass::Other]);
        let b = sample("b", &[NodeClass::Other, NodeClass::Other, NodeClass::Door]);
        let batch = collate(&[a, b]).unwrap();

        assert_eq!(batch.node_count(), 5);
        assert_eq!(batch.ranges, vec![0..2, 2..5]);
        assert_eq!(batch.labels[4], NodeClass::Door);
        assert_eq!(batch.features.shape(), (5, 1));
        assert_eq!(batch.features[(2, 0)], 0.0);
        assert_eq!(batch.graph.edge_count(), 3);
        assert!(!batch.graph.has_edge(1, 2));
    }

    #[test]
    fn batches_keep_remainder() {
        let samples: Vec<Sample> = (0..5)
            .map(|i| sample(&format!("s{i}"), &[NodeClass::Other]))
            .collect();
        let batches = make_batches(&samples, 2).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].node_count(), 1);
        assert!(matches!(collate(&[]), Err(LearningError::EmptyBatch)));
    }

    #[test]
    fn manifest_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "a.json\n\n  b.json  \n").unwrap();
        assert_eq!(read_manifest(&path).unwrap(), vec!["a.json", "b.json"]);
    }
}
