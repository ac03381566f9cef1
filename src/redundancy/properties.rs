// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Per-role neuron properties for the chained-redundancy scheme.

A chained copy sits one simulation tick behind the neuron it backs up, so the
delay-compensating roles raise their threshold by exactly one: the copy
accumulates the same input one tick longer and must not fire before its
primary would have.
*/

use crate::graph::{LifNeuron, NeuronProperties};
use crate::types::{AdaptationError, AdaptationResult, NeuronRole};

/// Derive `{bias, du, dv, vth}` for the level-`red_level` chained copy of a
/// neuron. Connector nodes are never duplicated and are rejected here.
pub fn chained_neuron_properties(
    neuron: &LifNeuron,
    red_level: u32,
) -> AdaptationResult<NeuronProperties> {
    let level = f64::from(red_level);
    let mut properties = neuron.properties();
    match neuron.role() {
        // Single-delay takeover: one extra tick, one extra unit of threshold.
        NeuronRole::SpikeOnce | NeuronRole::Rand | NeuronRole::DegreeReceiver => {
            properties.vth += 1.0;
        }
        NeuronRole::Selector => {
            properties.bias *= level;
            properties.vth *= level;
        }
        // OR-gate over the backing degree_receiver population: fire as soon
        // as any single member has fired.
        NeuronRole::Counter => {
            properties.vth = f64::from(red_level - 1);
        }
        // AND-like quorum: wait for the whole preceding population.
        NeuronRole::NextRound | NeuronRole::Terminator => {
            properties.vth *= level;
        }
        NeuronRole::Connector => {
            return Err(AdaptationError::UnsupportedNeuronRole(
                neuron.name().to_string(),
            ));
        }
    }
    Ok(properties)
}
