// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering seam for prediction and instance outputs.
//!
//! The extraction pipeline never draws anything. Consumers that want plots,
//! overlays or exports implement [`InstanceRenderer`] and feed it the data
//! returned by [`extract_instances`](crate::extract_instances).

use doorgraph_graph::{FloorGraph, NodeClass};

use crate::types::Extraction;

/// A sink for per-graph extraction results.
pub trait InstanceRenderer {
    type Error;

    /// Receives the raw per-node predictions of a graph.
    fn render_predictions(
        &mut self,
        name: &str,
        graph: &FloorGraph,
        predictions: &[NodeClass],
    ) -> Result<(), Self::Error>;

    /// Receives the final door instances of a graph.
    fn render_instances(
        &mut self,
        name: &str,
        graph: &FloorGraph,
        extraction: &Extraction,
    ) -> Result<(), Self::Error>;
}
