// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Population-coding builder.

Turns every computational neuron into a flat population of `redundancy + 1`
behaviorally equivalent members (the original included) with a total
lower-to-higher suppression order, so at most one member is active whatever
subset of the population the fault model has silenced.

After construction the original neuron's parameters are overwritten with its
level-1 derivation: the primary and its first backup are meant to be
behaviorally identical, and the original's pre-adaptation parameters are no
longer correct inside the population.
*/

use tracing::debug;

use crate::graph::{AdaptationGraph, LifNeuron, TopologySnapshot};
use crate::layout::LayoutConfig;
use crate::population::properties::population_neuron_properties;
use crate::types::{AdaptationError, AdaptationResult};
use crate::wiring::{
    add_population_inhibitory_synapses, add_recurrent_synapses, redundant_neuron_name,
    replicate_input_synapses, replicate_output_synapses, CreationIndex,
};

/// Apply population coding at the given level, mutating the graph in place.
pub fn apply_population_coding(
    adaptation_graph: &mut AdaptationGraph,
    redundancy: u32,
    layout: &LayoutConfig,
) -> AdaptationResult<()> {
    PopulationBuilder::new(adaptation_graph, redundancy, layout).apply()
}

/// Two-phase builder, same shape as the chained one: creation pass populates
/// the [`CreationIndex`], wiring pass resolves copies only through it.
struct PopulationBuilder<'a> {
    graph: &'a mut AdaptationGraph,
    redundancy: u32,
    layout: &'a LayoutConfig,
    topology: TopologySnapshot,
    index: CreationIndex,
}

impl<'a> PopulationBuilder<'a> {
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
        self.create_population_neurons()?;
        self.wire_population_synapses()?;
        self.overwrite_primary_parameters()?;
        debug!(
            target: "snn-adaptation",
            "Population coding level {} applied: {} neurons, {} synapses",
            self.redundancy,
            self.graph.neuron_count(),
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Creation pass: one population member per computational node per level.
    fn create_population_neurons(&mut self) -> AdaptationResult<()> {
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
                let properties = population_neuron_properties(&original, red_level)?;
                let copy = LifNeuron::with_role(
                    redundant_neuron_name(red_level, original.name()),
                    original.role(),
                    properties,
                    self.layout.population_offset(original.pos, red_level),
                    original.identifiers().to_vec(),
                );
                self.index.register(node_name, copy.name().to_string());
                self.graph.add_neuron(copy);
            }
        }
        Ok(())
    }

    /// Wiring pass, per level per original node. Missing endpoints are
    /// soft-skipped: connector nodes have no copies by design.
    fn wire_population_synapses(&mut self) -> AdaptationResult<()> {
        for red_level in 1..=self.redundancy {
            for node_name in self.topology.nodes() {
                replicate_input_synapses(
                    self.graph,
                    &self.topology,
                    &self.index,
                    node_name,
                    red_level,
                    true,
                )?;
                replicate_output_synapses(
                    self.graph,
                    &self.topology,
                    &self.index,
                    node_name,
                    red_level,
                    true,
                )?;
                add_population_inhibitory_synapses(
                    self.graph,
                    &self.index,
                    node_name,
                    red_level,
                )?;
                add_recurrent_synapses(self.graph, &self.index, node_name, red_level)?;
            }
        }
        Ok(())
    }

    /// Overwrite each original neuron's parameters with its level-1
    /// derivation. Intentional mutation of the primary, not cleanup.
    fn overwrite_primary_parameters(&mut self) -> AdaptationResult<()> {
        for node_name in self.topology.nodes() {
            let properties = match self.graph.neuron(node_name) {
                Some(original) if original.role().is_computational() => {
                    population_neuron_properties(original, 1)?
                }
                _ => continue,
            };
            if let Some(original) = self.graph.neuron_mut(node_name) {
                original.apply_properties(properties);
            }
        }
        Ok(())
    }
}
