// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# snn-adaptation

Fault-tolerance adaptation for spiking-neural-network graphs.

An SNN implementation of a graph algorithm (here, the MDSA minimum-dominating-
set approximation) is a directed graph of LIF neurons whose exact firing times
*are* the computation. A simulated-radiation fault model can silence neurons
mid-run; this crate rewrites the graph beforehand so that every computational
neuron is backed by redundant copies wired with cross-inhibition. While a
primary fires it suppresses its backups; when it goes silent, the next copy
takes over with the timing compensation its role requires.

Two duplication strategies are provided:
- [`redundancy::apply_redundancy`] — chained takeover: one copy per level,
  adjacent-level inhibition, tolerant to failures in level order.
- [`population::apply_population_coding`] — a flat population per neuron with
  a total suppression order, tolerant to any failed subset.

Both strategies only ever add neurons and synapses; the original circuit is
left intact (up to the population scheme's documented primary-parameter
overwrite), and each pass runs creation strictly before wiring so no synapse
can reference a copy that does not exist yet.

The LIF simulation engine, the radiation fault injection and the experiment
runner live elsewhere; this crate is the pure graph transformation between
them.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod descriptor;
pub mod graph;
pub mod layout;
pub mod population;
pub mod redundancy;
pub mod types;
pub mod wiring;

pub use descriptor::{Adaptation, AdaptationType};
pub use graph::{
    AdaptationGraph, Identifier, LifNeuron, NeuronProperties, Synapse, SynapseEdge,
    TopologySnapshot,
};
pub use layout::LayoutConfig;
pub use population::apply_population_coding;
pub use redundancy::{
    apply_redundancy, verify_redundancy_settings_for_exp_config,
    verify_redundancy_settings_for_run_config,
};
pub use types::{AdaptationError, AdaptationResult, NeuronRole};
pub use wiring::{
    redundant_neuron_name, INHIBITORY_WEIGHT, NEXT_ROUND_TO_SELECTOR_WEIGHT,
    SELECTOR_RECURRENT_WEIGHT,
};

/// Apply the adaptation a validated descriptor names, dispatching to the
/// matching builder.
pub fn apply_adaptation(
    adaptation_graph: &mut AdaptationGraph,
    adaptation: &Adaptation,
    layout: &LayoutConfig,
) -> AdaptationResult<()> {
    match adaptation.adaptation_type() {
        AdaptationType::Redundancy => {
            apply_redundancy(adaptation_graph, adaptation.redundancy(), layout)
        }
        AdaptationType::Population => {
            apply_population_coding(adaptation_graph, adaptation.redundancy(), layout)
        }
    }
}
