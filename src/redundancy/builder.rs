// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Chained-takeover redundancy builder.

Adds `redundancy` extra copies of every computational neuron and wires each
copy so that it is suppressed by its immediate predecessor and takes over one
tick after that predecessor goes silent. Tolerant to failures that occur in
level order; cheaper to wire than the full population lattice.
*/

use tracing::debug;

use crate::graph::{AdaptationGraph, LifNeuron, TopologySnapshot};
use crate::layout::LayoutConfig;
use crate::redundancy::properties::chained_neuron_properties;
use crate::types::{AdaptationError, AdaptationResult};
use crate::wiring::{
    add_chained_inhibitory_synapse, add_recurrent_synapses, redundant_neuron_name,
    replicate_input_synapses, replicate_output_synapses, CreationIndex,
};

/// Apply chained redundancy at the given level, mutating the graph in place.
pub fn apply_redundancy(
    adaptation_graph: &mut AdaptationGraph,
    redundancy: u32,
    layout: &LayoutConfig,
) -> AdaptationResult<()> {
    RedundancyBuilder::new(adaptation_graph, redundancy, layout).apply()
}

/// Two-phase builder: a creation pass that registers every redundant neuron
/// in a [`CreationIndex`], then a wiring pass that resolves copies only
/// through that index. All copies for all original nodes exist before any
/// cross-node redundant synapse is created.
struct RedundancyBuilder<'a> {
    graph: &'a mut AdaptationGraph,
    redundancy: u32,
    layout: &'a LayoutConfig,
    topology: TopologySnapshot,
    index: CreationIndex,
}

impl<'a> RedundancyBuilder<'a> {
    fn new(graph: &'a mut AdaptationGraph, redundancy: u32, layout: &'a LayoutConfig) -> Self {
        let topology = TopologySnapshot::capture(graph);
        Self {
            graph,
            redundancy,
            layout,
            topology,
            index: CreationIndex::new(),
        }
    }

    fn apply(mut self) -> AdaptationResult<()> {
        self.graph.set_red_level(self.redundancy);
        self.create_redundant_neurons()?;
        self.wire_redundant_synapses()?;
        debug!(
            target: "snn-adaptation",
            "Chained redundancy level {} applied: {} neurons, {} synapses",
            self.redundancy,
            self.graph.neuron_count(),
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Creation pass: one copy per computational node per level 1..=ℓ.
    fn create_redundant_neurons(&mut self) -> AdaptationResult<()> {
        for node_name in self.topology.nodes() {
            let original = self
                .graph
                .neuron(node_name)
                .ok_or_else(|| AdaptationError::UnknownNeuron(node_name.to_string()))?
                .clone();
            if !original.role().is_computational() {
                continue;
            }
            for red_level in 1..=self.redundancy {
                let properties = chained_neuron_properties(&original, red_level)?;
                let copy = LifNeuron::with_role(
                    redundant_neuron_name(red_level, original.name()),
                    original.role(),
                    properties,
                    self.layout.chained_offset(original.pos, red_level),
                    original.identifiers().to_vec(),
                );
                self.index.register(node_name, copy.name().to_string());
                self.graph.add_neuron(copy);
            }
        }
        Ok(())
    }

    /// Wiring pass, per level per original node: input replication, output
    /// replication, adjacent-level inhibition, recurrence.
    fn wire_redundant_synapses(&mut self) -> AdaptationResult<()> {
        for red_level in 1..=self.redundancy {
            for node_name in self.topology.nodes() {
                replicate_input_synapses(
                    self.graph,
                    &self.topology,
                    &self.index,
                    node_name,
                    red_level,
                    false,
                )?;
                replicate_output_synapses(
                    self.graph,
                    &self.topology,
                    &self.index,
                    node_name,
                    red_level,
                    false,
                )?;
                add_chained_inhibitory_synapse(self.graph, &self.index, node_name, red_level)?;
                add_recurrent_synapses(self.graph, &self.index, node_name, red_level)?;
            }
        }
        Ok(())
    }
}
