// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Training a model, storing it, reloading it and turning its predictions
//! into door instances.

use doorgraph_graph::{FloorGraph, NodeClass, Point2D};
use doorgraph_instancing::{extract_instances, ExtractionConfig};
use doorgraph_learning::{
    collate, feature_matrix, AffineNodeClassifier, ModelArtifact, NetworkKind, NodeClassifier,
    Sample, Trainer,
};

/// A 4x3 grid of door nodes (150 x 100 units) wired to a chain of wall nodes
/// far away. Doors carry feature `[1, 0]`, walls `[0, 1]`.
fn plan() -> FloorGraph {
    let mut g = FloorGraph::new(2);
    for row in 0..3 {
        for col in 0..4 {
            let pos = Point2D::new(col as f64 * 50.0, row as f64 * 50.0);
            g.add_labeled_node(pos, vec![1.0, 0.0], NodeClass::Door)
                .unwrap();
        }
    }
    for row in 0..3 {
        for col in 0..4 {
            let n = row * 4 + col;
            if col < 3 {
                g.add_edge(n, n + 1).unwrap();
            }
            if row < 2 {
                g.add_edge(n, n + 4).unwrap();
            }
        }
    }
    for i in 0..8 {
        let pos = Point2D::new(5000.0 + i as f64 * 400.0, 0.0);
        let n = g
            .add_labeled_node(pos, vec![0.0, 1.0], NodeClass::Other)
            .unwrap();
        g.add_edge(n - 1, n).unwrap();
    }
    g
}

#[test]
fn trained_model_finds_the_door() {
    let sample = Sample::new("plan.json", plan()).unwrap();
    let batches = vec![collate(std::slice::from_ref(&sample)).unwrap()];
    let mut model = AffineNodeClassifier::new(NetworkKind::Linear, 2);
    let reports = Trainer::new(NetworkKind::Linear.hyperparameters())
        .fit(&mut model, &batches, &batches, 5)
        .unwrap();
    assert_eq!(reports.last().unwrap().val.overall_acc, 1.0);

    let dir = tempfile::tempdir().unwrap();
    ModelArtifact::new(model)
        .save(dir.path(), "linear_plan")
        .unwrap();
    let artifact = ModelArtifact::load(dir.path(), "linear_plan").unwrap();

    let graph = &sample.graph;
    let predictions = artifact
        .classifier
        .classify(graph, &feature_matrix(graph))
        .unwrap();
    assert_eq!(predictions, sample.labels);

    let extraction = extract_instances(graph, &predictions, &ExtractionConfig::default()).unwrap();
    assert_eq!(extraction.door_count(), 1);
    assert_eq!(extraction.instances[0].nodes, (0..12).collect::<Vec<_>>());
    assert!((extraction.instances[0].geometry.ratio - 100.0 / 150.0).abs() < 1e-9);
}
