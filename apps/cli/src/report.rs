// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON export of prediction runs.

use std::convert::Infallible;
use std::path::Path;

use anyhow::{Context, Result};
use doorgraph_graph::{FloorGraph, NodeClass};
use doorgraph_instancing::{Extraction, ExtractionStats, InstanceGeometry, InstanceRenderer};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DoorReport {
    pub id: usize,
    /// Node ids as they appear in the input document.
    pub nodes: Vec<i64>,
    pub geometry: InstanceGeometry,
}

#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub name: String,
    pub node_count: usize,
    pub predicted_door_nodes: usize,
    pub doors: Vec<DoorReport>,
    pub stats: Option<ExtractionStats>,
}

#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub name: String,
    pub error: String,
}

/// Collects per-graph results and writes them as one JSON document.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub model: String,
    pub total_doors: usize,
    pub graphs: Vec<GraphReport>,
    pub failures: Vec<FailureReport>,
}

impl JsonReport {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            total_doors: 0,
            graphs: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, name: &str, error: &anyhow::Error) {
        self.failures.push(FailureReport {
            name: name.to_string(),
            error: format!("{error:#}"),
        });
    }

    /// The report for `name` that is still waiting for its instances, or a
    /// new one. A name listed twice in a manifest gets two reports.
    fn entry(&mut self, name: &str, graph: &FloorGraph) -> &mut GraphReport {
        let pending = self
            .graphs
            .iter()
            .rposition(|g| g.name == name && g.stats.is_none());
        let index = match pending {
            Some(index) => index,
            None => {
                self.graphs.push(GraphReport {
                    name: name.to_string(),
                    node_count: graph.node_count(),
                    predicted_door_nodes: 0,
                    doors: Vec::new(),
                    stats: None,
                });
                self.graphs.len() - 1
            }
        };
        &mut self.graphs[index]
    }

    /// Writes the report to `path`, or to stdout when no path is given.
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        match path {
            Some(path) => std::fs::write(path, json)
                .with_context(|| format!("Failed to write report: {}", path.display())),
            None => {
                println!("{json}");
                Ok(())
            }
        }
    }
}

impl InstanceRenderer for JsonReport {
    type Error = Infallible;

    fn render_predictions(
        &mut self,
        name: &str,
        graph: &FloorGraph,
        predictions: &[NodeClass],
    ) -> std::result::Result<(), Infallible> {
        let entry = self.entry(name, graph);
        entry.predicted_door_nodes = predictions.iter().filter(|c| c.is_door()).count();
        Ok(())
    }

    fn render_instances(
        &mut self,
        name: &str,
        graph: &FloorGraph,
        extraction: &Extraction,
    ) -> std::result::Result<(), Infallible> {
        let entry = self.entry(name, graph);
        entry.doors = extraction
            .instances
            .iter()
            .map(|door| DoorReport {
                id: door.id,
                nodes: door.nodes.iter().map(|&n| graph.source_id(n)).collect(),
                geometry: door.geometry,
            })
            .collect();
        entry.stats = Some(extraction.stats.clone());
        self.total_doors = self.graphs.iter().map(|g| g.doors.len()).sum();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorgraph_instancing::{extract_instances, ExtractionConfig};

    fn door_square() -> FloorGraph {
        let json = r#"{
            "nodes": [
                {"id": 10, "pos": [0.0, 0.0], "feature": [1.0]},
                {"id": 11, "pos": [100.0, 0.0], "feature": [1.0]},
                {"id": 12, "pos": [100.0, 100.0], "feature": [1.0]},
                {"id": 13, "pos": [0.0, 100.0], "feature": [1.0]}
            ],
            "edges": [[10, 11], [11, 12], [12, 13], [13, 10]]
        }"#;
        FloorGraph::from_json(json).unwrap()
    }

    #[test]
    fn report_uses_source_ids() {
        let graph = door_square();
        let predictions = vec![NodeClass::Door; 4];
        let config = ExtractionConfig {
            min_instance_nodes: 3,
            ..ExtractionConfig::default()
        };
        let extraction = extract_instances(&graph, &predictions, &config).unwrap();

        let mut report = JsonReport::new("linear");
        report
            .render_predictions("plan.json", &graph, &predictions)
            .unwrap();
        report
            .render_instances("plan.json", &graph, &extraction)
            .unwrap();

        assert_eq!(report.graphs.len(), 1);
        assert_eq!(report.total_doors, 1);
        let entry = &report.graphs[0];
        assert_eq!(entry.predicted_door_nodes, 4);
        assert_eq!(entry.doors[0].nodes, vec![10, 11, 12, 13]);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["graphs"][0]["doors"][0]["geometry"]["width"], 100.0);
    }

    #[test]
    fn repeated_entries_are_counted_once_each() {
        let graph = door_square();
        let predictions = vec![NodeClass::Door; 4];
        let config = ExtractionConfig {
            min_instance_nodes: 3,
            ..ExtractionConfig::default()
        };
        let extraction = extract_instances(&graph, &predictions, &config).unwrap();

        let mut report = JsonReport::new("linear");
        for _ in 0..2 {
            report
                .render_predictions("plan.json", &graph, &predictions)
                .unwrap();
            report
                .render_instances("plan.json", &graph, &extraction)
                .unwrap();
        }
        assert_eq!(report.graphs.len(), 2);
        assert_eq!(report.total_doors, 2);
        assert!(report.graphs.iter().all(|g| g.doors.len() == 1));
    }

    #[test]
    fn failures_are_listed_separately() {
        let mut report = JsonReport::new("linear");
        report.record_failure("bad.json", &anyhow::anyhow!("missing position"));
        assert!(report.graphs.is_empty());
        assert_eq!(report.failures[0].error, "missing position");
    }
}
