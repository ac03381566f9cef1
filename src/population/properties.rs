// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Per-role neuron properties for the population-coding scheme.

A population member at level `ℓ` may only take over after every lower member
has gone silent, which costs up to `ℓ` simulation ticks. The delay-compensating
roles therefore raise their threshold by the full level, not by one as in the
chained scheme.
*/

use crate::graph::{LifNeuron, NeuronProperties};
use crate::types::{AdaptationError, AdaptationResult, NeuronRole};

/// Selector population parameters discovered by grid search: the m=0
/// selectors must fire at t=0 under their own bias, later-round selectors
/// fire only once their next_round excitation arrives.
const SELECTOR_M0_BIAS: f64 = 1.0;
const SELECTOR_LATER_ROUND_BIAS: f64 = 0.0;
const SELECTOR_DU: f64 = 0.1;
const SELECTOR_DV: f64 = 0.0;

/// Derive `{bias, du, dv, vth}` for the level-`red_level` population member
/// of a neuron. Connector nodes are never duplicated and are rejected here.
pub fn population_neuron_properties(
    neuron: &LifNeuron,
    red_level: u32,
) -> AdaptationResult<NeuronProperties> {
    let level = f64::from(red_level);
    let mut properties = neuron.properties();
    match neuron.role() {
        // Takeover after up to `level` ticks of suppression.
        NeuronRole::SpikeOnce | NeuronRole::Rand | NeuronRole::DegreeReceiver => {
            properties.vth += level;
        }
        NeuronRole::Selector => {
            let bias = if selector_m_val(neuron)? == 0 {
                SELECTOR_M0_BIAS
            } else {
                SELECTOR_LATER_ROUND_BIAS
            };
            properties = NeuronProperties {
                bias,
                du: SELECTOR_DU,
                dv: SELECTOR_DV,
                vth: level,
            };
        }
        // OR-gate: fire as soon as any one backing degree_receiver member
        // has fired.
        NeuronRole::Counter => {
            properties.vth = f64::from(red_level - 1);
        }
        // AND-like quorum over the whole preceding population.
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

/// The approximation-iteration index of a selector neuron, carried as its
/// first identifier.
fn selector_m_val(neuron: &LifNeuron) -> AdaptationResult<i64> {
    match neuron.identifiers().first() {
        Some(identifier) if identifier.description == "m_val" => Ok(identifier.value),
        _ => Err(AdaptationError::MalformedIdentifier(
            neuron.name().to_string(),
        )),
    }
}
