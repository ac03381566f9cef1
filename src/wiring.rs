// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Synapse wiring engine.

Creates the input, output, inhibitory and self-recurrent synapses that tie
redundant neurons into the original circuit. Every function here operates on
one (original node, redundancy level) pair and assumes the creation pass has
already finished: wiring only ever references copies registered in the
[`CreationIndex`], so a synapse can never point at a neuron that does not
exist yet.

All adaptation-added synapses carry zero delay, zero decay per tick and the
redundant provenance flag.
*/

use ahash::AHashMap;
use tracing::warn;

use crate::graph::{AdaptationGraph, Synapse, TopologySnapshot};
use crate::types::{AdaptationError, AdaptationResult, NeuronRole};

/// Weight of the suppression synapses between population members. Strong
/// enough that one firing lower-level member holds every higher-level member
/// below threshold for the full simulation, whatever its other inputs.
pub const INHIBITORY_WEIGHT: f64 = -100.0;

/// Self-excitation on redundant selector copies, sustaining their firing
/// once triggered. Found by grid search together with the selector
/// population parameters.
pub const SELECTOR_RECURRENT_WEIGHT: f64 = 4.0;

/// Fixed excitation on next_round -> selector-copy synapses, applied
/// irrespective of the original synapse weight so a takeover selector starts
/// the next approximation round exactly like its primary would.
pub const NEXT_ROUND_TO_SELECTOR_WEIGHT: f64 = 1.0;

/// Name of the level-`red_level` redundant copy of `node_name`.
pub fn redundant_neuron_name(red_level: u32, node_name: &str) -> String {
    format!("r_{red_level}_{node_name}")
}

/// Arena of redundant copies registered by a creation pass.
///
/// The wiring pass resolves every copy it references through this index, so
/// the create-before-wire ordering is structural rather than conventional:
/// an unregistered copy simply cannot be named.
#[derive(Debug, Default)]
pub(crate) struct CreationIndex {
    copies: AHashMap<String, Vec<String>>,
}

impl CreationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy of `original`. Must be called in level order 1..=ℓ.
    pub fn register(&mut self, original: &str, copy_name: String) {
        self.copies
            .entry(original.to_string())
            .or_default()
            .push(copy_name);
    }

    /// The level-`red_level` copy of `original`, if one was created.
    /// Connector nodes are never duplicated, so they resolve to `None`.
    pub fn copy(&self, original: &str, red_level: u32) -> Option<&str> {
        self.copies
            .get(original)?
            .get(red_level as usize - 1)
            .map(String::as_str)
    }

    /// Population member at `level`, where level 0 is the original itself.
    pub fn member<'a>(&'a self, original: &'a str, level: u32) -> Option<&'a str> {
        if level == 0 {
            Some(original)
        } else {
            self.copy(original, level)
        }
    }
}

/// Insert a redundant synapse. With `allow_missing`, a missing endpoint is a
/// soft-skip: connector nodes are intentionally excluded from duplication, so
/// the population synapse pass routinely wires against names that were never
/// created.
fn insert_redundant_synapse(
    graph: &mut AdaptationGraph,
    from: &str,
    to: &str,
    synapse: Synapse,
    allow_missing: bool,
) -> AdaptationResult<()> {
    if allow_missing && (!graph.contains_neuron(from) || !graph.contains_neuron(to)) {
        warn!(
            target: "snn-adaptation",
            "Skipping redundant synapse {} -> {}: endpoint not in graph", from, to
        );
        return Ok(());
    }
    graph.add_synapse(from, to, synapse, true)
}

fn original_weight(graph: &AdaptationGraph, from: &str, to: &str) -> AdaptationResult<f64> {
    graph
        .synapse(from, to)
        .map(|edge| edge.synapse.weight)
        .ok_or_else(|| AdaptationError::UnknownNeuron(from.to_string()))
}

fn role_of(graph: &AdaptationGraph, name: &str) -> AdaptationResult<NeuronRole> {
    graph
        .neuron(name)
        .map(|n| n.role())
        .ok_or_else(|| AdaptationError::UnknownNeuron(name.to_string()))
}

/// Replicate every edge into `node_name` onto its level-`red_level` copy,
/// preserving the original weight.
///
/// Special case: when the copy is a selector and the source is a next_round
/// neuron, the weight is forced to [`NEXT_ROUND_TO_SELECTOR_WEIGHT`] and the
/// same edge is additionally wired from the source's own level-`red_level`
/// copy, so the excitation survives the source itself having failed over.
pub(crate) fn replicate_input_synapses(
    graph: &mut AdaptationGraph,
    topology: &TopologySnapshot,
    index: &CreationIndex,
    node_name: &str,
    red_level: u32,
    allow_missing: bool,
) -> AdaptationResult<()> {
    let Some(copy_name) = index.copy(node_name, red_level) else {
        return Ok(());
    };
    let copy_name = copy_name.to_string();
    let node_role = role_of(graph, node_name)?;

    for (from, to) in topology.input_edges(node_name).to_vec() {
        let from_role = role_of(graph, &from)?;
        let forced = node_role == NeuronRole::Selector && from_role == NeuronRole::NextRound;
        let weight = if forced {
            NEXT_ROUND_TO_SELECTOR_WEIGHT
        } else {
            original_weight(graph, &from, &to)?
        };
        insert_redundant_synapse(
            graph,
            &from,
            &copy_name,
            Synapse::with_weight(weight),
            allow_missing,
        )?;
        if forced {
            let redundant_from = redundant_neuron_name(red_level, &from);
            insert_redundant_synapse(
                graph,
                &redundant_from,
                &copy_name,
                Synapse::with_weight(NEXT_ROUND_TO_SELECTOR_WEIGHT),
                allow_missing,
            )?;
        }
    }
    Ok(())
}

/// Replicate every edge out of `node_name` from its level-`red_level` copy to
/// the same destination, preserving the original weight.
pub(crate) fn replicate_output_synapses(
    graph: &mut AdaptationGraph,
    topology: &TopologySnapshot,
    index: &CreationIndex,
    node_name: &str,
    red_level: u32,
    allow_missing: bool,
) -> AdaptationResult<()> {
    let Some(copy_name) = index.copy(node_name, red_level) else {
        return Ok(());
    };
    let copy_name = copy_name.to_string();

    for (from, to) in topology.output_edges(node_name).to_vec() {
        let weight = original_weight(graph, &from, &to)?;
        insert_redundant_synapse(
            graph,
            &copy_name,
            &to,
            Synapse::with_weight(weight),
            allow_missing,
        )?;
    }
    Ok(())
}

/// Chained scheme: the level-`red_level` copy is inhibited by its immediate
/// predecessor only (the original when `red_level` is 1), forming a linear
/// takeover chain.
pub(crate) fn add_chained_inhibitory_synapse(
    graph: &mut AdaptationGraph,
    index: &CreationIndex,
    node_name: &str,
    red_level: u32,
) -> AdaptationResult<()> {
    let Some(copy_name) = index.copy(node_name, red_level) else {
        return Ok(());
    };
    let copy_name = copy_name.to_string();
    let source = if red_level == 1 {
        node_name.to_string()
    } else {
        index
            .copy(node_name, red_level - 1)
            .ok_or_else(|| AdaptationError::UnknownNeuron(node_name.to_string()))?
            .to_string()
    };
    graph.add_synapse(
        &source,
        &copy_name,
        Synapse::with_weight(INHIBITORY_WEIGHT),
        true,
    )
}

/// Population scheme: every member below `red_level` (the original included)
/// suppresses the level-`red_level` copy. Invoked once per level, this builds
/// the full lower-to-higher suppression order over the population, so at most
/// one member is ever active whatever subset has failed.
pub(crate) fn add_population_inhibitory_synapses(
    graph: &mut AdaptationGraph,
    index: &CreationIndex,
    node_name: &str,
    red_level: u32,
) -> AdaptationResult<()> {
    let Some(copy_name) = index.copy(node_name, red_level) else {
        return Ok(());
    };
    let copy_name = copy_name.to_string();
    for lower in 0..red_level {
        let Some(member) = index.member(node_name, lower) else {
            continue;
        };
        let member = member.to_string();
        if !graph.has_synapse(&member, &copy_name) {
            graph.add_synapse(
                &member,
                &copy_name,
                Synapse::with_weight(INHIBITORY_WEIGHT),
                true,
            )?;
        }
    }
    Ok(())
}

/// Propagate the original's self-loop onto its level-`red_level` copy, and
/// give selector copies their fixed self-excitatory loop regardless of the
/// original's recurrence.
pub(crate) fn add_recurrent_synapses(
    graph: &mut AdaptationGraph,
    index: &CreationIndex,
    node_name: &str,
    red_level: u32,
) -> AdaptationResult<()> {
    let Some(copy_name) = index.copy(node_name, red_level) else {
        return Ok(());
    };
    let copy_name = copy_name.to_string();
    let original = graph
        .neuron(node_name)
        .ok_or_else(|| AdaptationError::UnknownNeuron(node_name.to_string()))?;
    let recur = original.recur;
    let role = original.role();

    if let Some(weight) = recur {
        graph.add_synapse(&copy_name, &copy_name, Synapse::with_weight(weight), true)?;
    }
    if role == NeuronRole::Selector {
        graph.add_synapse(
            &copy_name,
            &copy_name,
            Synapse::with_weight(SELECTOR_RECURRENT_WEIGHT),
            true,
        )?;
    }
    Ok(())
}
