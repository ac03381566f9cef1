// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Typed graph container for adaptation passes.

Neurons and synapses are typed records rather than open attribute bags. The
graph is a plain directed multigraph-without-parallel-edges: one synapse per
ordered neuron pair, insert-or-replace semantics on re-insertion. Node and
edge iteration follow insertion order so adaptation passes are deterministic.
*/

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::types::{AdaptationError, AdaptationResult, NeuronRole};

/// An attached tag describing a neuron's place in the algorithm, e.g. the
/// approximation-iteration index `m_val` on selector neurons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub description: String,
    pub value: i64,
    pub position: u32,
}

impl Identifier {
    pub fn new(description: &str, value: i64, position: u32) -> Self {
        Self {
            description: description.to_string(),
            value,
            position,
        }
    }
}

/// Dynamical parameters of a LIF neuron, as derived for a redundant copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronProperties {
    pub bias: f64,
    /// Leak-current rate
    pub du: f64,
    /// Leak-voltage rate
    pub dv: f64,
    /// Firing threshold
    pub vth: f64,
}

/// A discrete-time LIF neuron as stored in the adaptation graph.
///
/// The role tag is assigned once at construction and is stable thereafter;
/// redundant copies inherit the role of the neuron they back up rather than
/// re-parsing their `r_<level>_` prefixed name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifNeuron {
    name: String,
    pub bias: f64,
    pub du: f64,
    pub dv: f64,
    pub vth: f64,
    pub pos: (f64, f64),
    identifiers: Vec<Identifier>,
    role: NeuronRole,
    /// Self-loop ("recur") weight, if the neuron recurs onto itself.
    pub recur: Option<f64>,
}

impl LifNeuron {
    /// Construct a neuron, parsing its role from the structured name prefix.
    pub fn new(
        name: &str,
        bias: f64,
        du: f64,
        dv: f64,
        vth: f64,
        pos: (f64, f64),
        identifiers: Vec<Identifier>,
    ) -> AdaptationResult<Self> {
        let role = NeuronRole::from_name(name)?;
        Ok(Self {
            name: name.to_string(),
            bias,
            du,
            dv,
            vth,
            pos,
            identifiers,
            role,
            recur: None,
        })
    }

    /// Construct a neuron with an explicitly assigned role. Used for
    /// redundant copies, whose `r_<level>_` prefixed names do not parse and
    /// which inherit the role of their original.
    pub fn with_role(
        name: String,
        role: NeuronRole,
        properties: NeuronProperties,
        pos: (f64, f64),
        identifiers: Vec<Identifier>,
    ) -> Self {
        Self {
            name,
            bias: properties.bias,
            du: properties.du,
            dv: properties.dv,
            vth: properties.vth,
            pos,
            identifiers,
            role,
            recur: None,
        }
    }

    /// Builder-style recurrence weight.
    pub fn with_recur(mut self, weight: f64) -> Self {
        self.recur = Some(weight);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> NeuronRole {
        self.role
    }

    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    /// Current dynamical parameters as a property record.
    pub fn properties(&self) -> NeuronProperties {
        NeuronProperties {
            bias: self.bias,
            du: self.du,
            dv: self.dv,
            vth: self.vth,
        }
    }

    /// Overwrite the dynamical parameters with a derived property record.
    pub fn apply_properties(&mut self, properties: NeuronProperties) {
        self.bias = properties.bias;
        self.du = properties.du;
        self.dv = properties.dv;
        self.vth = properties.vth;
    }
}

/// A directed synapse between two neurons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    pub weight: f64,
    pub delay: f64,
    pub change_per_t: f64,
}

impl Synapse {
    pub fn new(weight: f64, delay: f64, change_per_t: f64) -> Self {
        Self {
            weight,
            delay,
            change_per_t,
        }
    }

    /// Adaptation-added synapses carry zero delay and zero decay per tick
    /// unless stated otherwise.
    pub fn with_weight(weight: f64) -> Self {
        Self::new(weight, 0.0, 0.0)
    }
}

/// A synapse together with its provenance: adaptation-added wiring is flagged
/// redundant, original circuit wiring is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynapseEdge {
    pub synapse: Synapse,
    pub is_redundant: bool,
}

/// The full neuron/synapse collection an adaptation pass mutates, plus the
/// graph-level attribute recording the active redundancy level.
#[derive(Debug, Clone, Default)]
pub struct AdaptationGraph {
    neurons: AHashMap<String, LifNeuron>,
    node_order: Vec<String>,
    edges: AHashMap<(String, String), SynapseEdge>,
    edge_order: Vec<(String, String)>,
    red_level: Option<u32>,
}

impl AdaptationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a neuron. Re-inserting an existing name replaces the record in
    /// place without disturbing iteration order.
    pub fn add_neuron(&mut self, neuron: LifNeuron) {
        let name = neuron.name().to_string();
        if self.neurons.insert(name.clone(), neuron).is_none() {
            self.node_order.push(name);
        }
    }

    pub fn neuron(&self, name: &str) -> Option<&LifNeuron> {
        self.neurons.get(name)
    }

    pub fn neuron_mut(&mut self, name: &str) -> Option<&mut LifNeuron> {
        self.neurons.get_mut(name)
    }

    pub fn contains_neuron(&self, name: &str) -> bool {
        self.neurons.contains_key(name)
    }

    /// Neuron names in insertion order.
    pub fn neuron_names(&self) -> impl Iterator<Item = &str> {
        self.node_order.iter().map(String::as_str)
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Insert a directed synapse. Both endpoints must already exist; an
    /// adaptation pass that wires against a missing neuron either skips
    /// (population scheme) or aborts (chained scheme) at the call site.
    /// Re-inserting an existing edge replaces it.
    pub fn add_synapse(
        &mut self,
        from: &str,
        to: &str,
        synapse: Synapse,
        is_redundant: bool,
    ) -> AdaptationResult<()> {
        if !self.neurons.contains_key(from) {
            return Err(AdaptationError::UnknownNeuron(from.to_string()));
        }
        if !self.neurons.contains_key(to) {
            return Err(AdaptationError::UnknownNeuron(to.to_string()));
        }
        let key = (from.to_string(), to.to_string());
        if self
            .edges
            .insert(
                key.clone(),
                SynapseEdge {
                    synapse,
                    is_redundant,
                },
            )
            .is_none()
        {
            self.edge_order.push(key);
        }
        Ok(())
    }

    pub fn synapse(&self, from: &str, to: &str) -> Option<&SynapseEdge> {
        self.edges.get(&(from.to_string(), to.to_string()))
    }

    pub fn has_synapse(&self, from: &str, to: &str) -> bool {
        self.edges
            .contains_key(&(from.to_string(), to.to_string()))
    }

    /// Directed edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &SynapseEdge)> {
        self.edge_order.iter().map(|key| {
            let edge = &self.edges[key];
            (key.0.as_str(), key.1.as_str(), edge)
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Graph-level redundancy level stamped by an adaptation pass.
    pub fn red_level(&self) -> Option<u32> {
        self.red_level
    }

    pub fn set_red_level(&mut self, red_level: u32) {
        self.red_level = Some(red_level);
    }
}

/// Snapshot of the original node set and per-node input/output edge lists,
/// built once per adaptation pass before any mutation.
///
/// The lists reflect the edge set at the moment of capture; they are not live
/// views, so wiring added later in the pass never feeds back into it.
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    nodes: Vec<String>,
    input_edges: AHashMap<String, Vec<(String, String)>>,
    output_edges: AHashMap<String, Vec<(String, String)>>,
}

impl TopologySnapshot {
    pub fn capture(graph: &AdaptationGraph) -> Self {
        let nodes: Vec<String> = graph.neuron_names().map(str::to_string).collect();
        let mut input_edges: AHashMap<String, Vec<(String, String)>> = AHashMap::new();
        let mut output_edges: AHashMap<String, Vec<(String, String)>> = AHashMap::new();
        for (from, to, _) in graph.edges() {
            let edge = (from.to_string(), to.to_string());
            input_edges
                .entry(to.to_string())
                .or_default()
                .push(edge.clone());
            output_edges.entry(from.to_string()).or_default().push(edge);
        }
        Self {
            nodes,
            input_edges,
            output_edges,
        }
    }

    /// Original node names in insertion order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Edges that fed into `node_name` at capture time.
    pub fn input_edges(&self, node_name: &str) -> &[(String, String)] {
        self.input_edges
            .get(node_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edges that left `node_name` at capture time.
    pub fn output_edges(&self, node_name: &str) -> &[(String, String)] {
        self.output_edges
            .get(node_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron(name: &str) -> LifNeuron {
        LifNeuron::new(name, 0.0, 0.0, 0.0, 1.0, (0.0, 0.0), vec![]).unwrap()
    }

    #[test]
    fn test_neuron_insertion_and_lookup() {
        let mut graph = AdaptationGraph::new();
        graph.add_neuron(neuron("spike_once_0"));
        graph.add_neuron(neuron("rand_0"));
        assert_eq!(graph.neuron_count(), 2);
        assert!(graph.contains_neuron("spike_once_0"));
        assert_eq!(
            graph.neuron("rand_0").unwrap().role(),
            NeuronRole::Rand
        );
        let names: Vec<&str> = graph.neuron_names().collect();
        assert_eq!(names, vec!["spike_once_0", "rand_0"]);
    }

    #[test]
    fn test_synapse_requires_both_endpoints() {
        let mut graph = AdaptationGraph::new();
        graph.add_neuron(neuron("spike_once_0"));
        let err = graph
            .add_synapse("spike_once_0", "rand_9", Synapse::with_weight(1.0), false)
            .unwrap_err();
        assert!(matches!(err, AdaptationError::UnknownNeuron(_)));
    }

    #[test]
    fn test_synapse_reinsertion_replaces() {
        let mut graph = AdaptationGraph::new();
        graph.add_neuron(neuron("spike_once_0"));
        graph.add_neuron(neuron("rand_0"));
        graph
            .add_synapse("spike_once_0", "rand_0", Synapse::with_weight(1.0), false)
            .unwrap();
        graph
            .add_synapse("spike_once_0", "rand_0", Synapse::with_weight(2.0), true)
            .unwrap();
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.synapse("spike_once_0", "rand_0").unwrap();
        assert_eq!(edge.synapse.weight, 2.0);
        assert!(edge.is_redundant);
    }

    #[test]
    fn test_topology_snapshot_is_not_a_live_view() {
        let mut graph = AdaptationGraph::new();
        graph.add_neuron(neuron("spike_once_0"));
        graph.add_neuron(neuron("degree_receiver_0"));
        graph.add_neuron(neuron("counter_0"));
        graph
            .add_synapse(
                "spike_once_0",
                "degree_receiver_0",
                Synapse::with_weight(1.0),
                false,
            )
            .unwrap();

        let snapshot = TopologySnapshot::capture(&graph);
        graph
            .add_synapse(
                "degree_receiver_0",
                "counter_0",
                Synapse::with_weight(1.0),
                false,
            )
            .unwrap();

        assert_eq!(snapshot.input_edges("degree_receiver_0").len(), 1);
        assert!(snapshot.output_edges("degree_receiver_0").is_empty());
        assert_eq!(snapshot.nodes().len(), 3);
    }
}
