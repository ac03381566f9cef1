// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for adaptation passes.

The error enum covers every validation failure an adaptation pass can raise;
all of them abort the pass at the point of detection and are never retried.
*/

use serde::{Deserialize, Serialize};

/// Result type for adaptation operations
pub type AdaptationResult<T> = Result<T, AdaptationError>;

/// Errors that can occur while validating or applying an adaptation
#[derive(Debug, thiserror::Error)]
pub enum AdaptationError {
    #[error("Error, {0} not supported.")]
    UnsupportedAdaptationType(String),

    #[error("Error, {0}")]
    InvalidRedundancy(String),

    #[error("Error, no valid redundancy setting found in: {0}")]
    MissingRedundancyKey(String),

    #[error("Error, neuron role of {0} not supported.")]
    UnsupportedNeuronRole(String),

    #[error("Error, {0} is missing its m_val identifier at position 0.")]
    MalformedIdentifier(String),

    #[error("Error, neuron {0} does not exist in the adaptation graph.")]
    UnknownNeuron(String),
}

/// Algorithmic role of a neuron in the MDSA SNN circuit.
///
/// The role is parsed once from the structured name prefix when the neuron is
/// ingested and carried as a typed field from then on; it determines which
/// property-derivation rule applies during duplication. `Connector` nodes are
/// structural passthroughs and are excluded from duplication entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronRole {
    SpikeOnce,
    Rand,
    DegreeReceiver,
    Selector,
    Counter,
    NextRound,
    Terminator,
    Connector,
}

/// Name prefixes of the MDSA circuit, longest-match first so that e.g.
/// `degree_receiver_` is never shadowed by a shorter prefix.
const ROLE_PREFIXES: [(&str, NeuronRole); 8] = [
    ("degree_receiver", NeuronRole::DegreeReceiver),
    ("spike_once", NeuronRole::SpikeOnce),
    ("next_round", NeuronRole::NextRound),
    ("terminator", NeuronRole::Terminator),
    ("connector", NeuronRole::Connector),
    ("selector", NeuronRole::Selector),
    ("counter", NeuronRole::Counter),
    ("rand", NeuronRole::Rand),
];

impl NeuronRole {
    /// Parse the role from a structured neuron name such as
    /// `degree_receiver_0_1_2` or `selector_0_3`.
    pub fn from_name(name: &str) -> AdaptationResult<Self> {
        for (prefix, role) in ROLE_PREFIXES {
            if name.starts_with(prefix) {
                return Ok(role);
            }
        }
        Err(AdaptationError::UnsupportedNeuronRole(name.to_string()))
    }

    /// Whether neurons of this role take part in the computation and are
    /// therefore duplicated by an adaptation pass.
    pub fn is_computational(&self) -> bool {
        !matches!(self, NeuronRole::Connector)
    }
}
