// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Morphological smoothing of node predictions.
//!
//! A node is promoted to door when at least half of its 2-hop neighborhood
//! is predicted door. Every node is evaluated against the input predictions,
//! never against labels already rewritten in the same sweep.

use doorgraph_graph::{FloorGraph, NodeClass};

use crate::error::{InstancingError, Result};
use crate::types::Predictions;

/// Runs one majority-vote sweep over the 2-hop neighborhood of every node.
pub fn smooth_predictions(graph: &FloorGraph, predictions: &[NodeClass]) -> Result<Predictions> {
    check_len(graph, predictions)?;

    Ok((0..graph.node_count())
        .map(|node| {
            let hood = graph.two_hop_neighborhood(node);
            if hood.is_empty() {
                return predictions[node];
            }
            let doors = hood.iter().filter(|&&n| predictions[n].is_door()).count();
            let others = hood.len() - doors;
            if doors >= others {
                NodeClass::Door
            } else {
                predictions[node]
            }
        })
        .collect())
}

/// Applies `passes` independent sweeps, each reading the previous output.
pub fn smooth_predictions_n(
    graph: &FloorGraph,
    predictions: &[NodeClass],
    passes: usize,
) -> Result<Predictions> {
    check_len(graph, predictions)?;
    let mut current = predictions.to_vec();
    for _ in 0..passes {
        current = smooth_predictions(graph, &current)?;
    }
    Ok(current)
}

fn check_len(graph: &FloorGraph, predictions: &[NodeClass]) -> Result<()> {
    if predictions.len() != graph.node_count() {
        return Err(InstancingError::PredictionLength {
            nodes: graph.node_count(),
            predictions: predictions.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorgraph_graph::Point2D;
    use doorgraph_graph::NodeClass::{Door as D, Other as O};

    fn make_path(n: usize) -> FloorGraph {
        let mut g = FloorGraph::new(0);
        for i in 0..n {
            g.add_node(Point2D::new(i as f64, 0.0), Vec::new()).unwrap();
        }
        for i in 1..n {
            g.add_edge(i - 1, i).unwrap();
        }
        g
    }

    #[test]
    fn fills_isolated_gap() {
        let g = make_path(5);
        let out = smooth_predictions(&g, &[D, D, O, D, D]).unwrap();
        assert_eq!(out, vec![D, D, D, D, D]);
    }

    #[test]
    fn never_demotes_doors() {
        let g = make_path(7);
        let out = smooth_predictions(&g, &[O, O, O, D, O, O, O]).unwrap();
        // Node 3 sees 4 others but keeps its own door label.
        assert_eq!(out, vec![O, O, O, D, O, O, O]);
    }

    #[test]
    fn tie_promotes_to_door() {
        // Node 0 sees {1, 2}: one door, one other.
        let g = make_path(3);
        let out = smooth_predictions(&g, &[O, D, O]).unwrap();
        assert_eq!(out[0], D);
    }

    #[test]
    fn single_sweep_reads_original_predictions() {
        // Node 2 sees {0, 1, 3, 4}: a 2/2 tie, promoted.
        // Node 3 sees {1, 2, 4, 5}: one door in the input. An in-place sweep
        // would let it observe the promoted node 2 and flip as well.
        let g = make_path(6);
        let input = [D, D, O, O, O, O];
        let out = smooth_predictions(&g, &input).unwrap();
        assert_eq!(out, vec![D, D, D, O, O, O]);

        let twice = smooth_predictions_n(&g, &input, 2).unwrap();
        assert_eq!(twice, vec![D, D, D, D, O, O]);
    }

    #[test]
    fn isolated_node_keeps_label() {
        let mut g = make_path(2);
        g.add_node(Point2D::new(50.0, 50.0), Vec::new()).unwrap();
        let out = smooth_predictions(&g, &[O, O, O]).unwrap();
        assert_eq!(out, vec![O, O, O]);
    }

    #[test]
    fn zero_passes_is_identity_and_length_is_checked() {
        let g = make_path(3);
        assert_eq!(smooth_predictions_n(&g, &[O, D, O], 0).unwrap(), vec![O, D, O]);
        assert!(matches!(
            smooth_predictions(&g, &[O]),
            Err(InstancingError::PredictionLength {
                nodes: 3,
                predictions: 1
            })
        ));
    }
}
