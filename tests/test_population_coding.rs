// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Population-coding integration tests.

The golden fixture is a 3-node chain at redundancy 2, computed exactly: 9
neurons, 8 replicated excitatory edges, 9 pairwise inhibitory edges, primaries
overwritten with their level-1 parameters. Further tests cover the selector
special cases, connector soft-skips and the threshold invariant as a property
sweep.
*/

use proptest::prelude::*;
use snn_adaptation::{
    apply_population_coding, AdaptationError, AdaptationGraph, Identifier, LayoutConfig,
    LifNeuron, Synapse, INHIBITORY_WEIGHT, NEXT_ROUND_TO_SELECTOR_WEIGHT,
    SELECTOR_RECURRENT_WEIGHT,
};

fn neuron(name: &str, bias: f64, vth: f64) -> LifNeuron {
    LifNeuron::new(name, bias, 0.2, 0.3, vth, (0.0, 0.0), vec![]).unwrap()
}

/// Golden fixture: spike_once_0 -> degree_receiver_0 -> counter_0, each edge
/// weight 1.
fn golden_chain() -> AdaptationGraph {
    let mut graph = AdaptationGraph::new();
    graph.add_neuron(neuron("spike_once_0", 1.0, 1.0));
    graph.add_neuron(neuron("degree_receiver_0", 0.0, 2.0));
    graph.add_neuron(neuron("counter_0", 0.0, 5.0));
    graph
        .add_synapse(
            "spike_once_0",
            "degree_receiver_0",
            Synapse::with_weight(1.0),
            false,
        )
        .unwrap();
    graph
        .add_synapse(
            "degree_receiver_0",
            "counter_0",
            Synapse::with_weight(1.0),
            false,
        )
        .unwrap();
    graph
}

#[test]
fn test_golden_chain_neuron_and_edge_counts() {
    let mut graph = golden_chain();
    apply_population_coding(&mut graph, 2, &LayoutConfig::default()).unwrap();

    // 3 originals, 2 copies each.
    assert_eq!(graph.neuron_count(), 9);
    assert_eq!(graph.red_level(), Some(2));

    // 2 original edges + (2 input-side + 2 output-side) replicas per original
    // edge + C(3,2) inhibitory edges per population over 3 populations.
    assert_eq!(graph.edge_count(), 2 + 8 + 9);

    let redundant = graph.edges().filter(|(_, _, e)| e.is_redundant).count();
    assert_eq!(redundant, 17);
}

#[test]
fn test_golden_chain_edge_replication() {
    let mut graph = golden_chain();
    apply_population_coding(&mut graph, 2, &LayoutConfig::default()).unwrap();

    for level in 1..=2 {
        // Input side.
        assert_eq!(
            graph
                .synapse("spike_once_0", &format!("r_{level}_degree_receiver_0"))
                .unwrap()
                .synapse
                .weight,
            1.0
        );
        assert_eq!(
            graph
                .synapse("degree_receiver_0", &format!("r_{level}_counter_0"))
                .unwrap()
                .synapse
                .weight,
            1.0
        );
        // Output side.
        assert_eq!(
            graph
                .synapse(&format!("r_{level}_spike_once_0"), "degree_receiver_0")
                .unwrap()
                .synapse
                .weight,
            1.0
        );
        assert_eq!(
            graph
                .synapse(&format!("r_{level}_degree_receiver_0"), "counter_0")
                .unwrap()
                .synapse
                .weight,
            1.0
        );
    }
}

#[test]
fn test_golden_chain_pairwise_inhibition() {
    let mut graph = golden_chain();
    apply_population_coding(&mut graph, 2, &LayoutConfig::default()).unwrap();

    for original in ["spike_once_0", "degree_receiver_0", "counter_0"] {
        let members = [
            original.to_string(),
            format!("r_1_{original}"),
            format!("r_2_{original}"),
        ];
        for (i, lower) in members.iter().enumerate() {
            for higher in &members[i + 1..] {
                let edge = graph
                    .synapse(lower, higher)
                    .unwrap_or_else(|| panic!("pair ({lower}, {higher}) unconnected"));
                assert_eq!(edge.synapse.weight, INHIBITORY_WEIGHT);
                assert!(edge.is_redundant);
                // Direction is lower -> higher only.
                assert!(!graph.has_synapse(higher, lower));
            }
        }
    }
}

#[test]
fn test_golden_chain_thresholds_and_primary_overwrite() {
    let mut graph = golden_chain();
    apply_population_coding(&mut graph, 2, &LayoutConfig::default()).unwrap();

    // Copies: vth + level for the delay roles, level - 1 for the counter.
    assert_eq!(graph.neuron("r_1_spike_once_0").unwrap().vth, 2.0);
    assert_eq!(graph.neuron("r_2_spike_once_0").unwrap().vth, 3.0);
    assert_eq!(graph.neuron("r_1_degree_receiver_0").unwrap().vth, 3.0);
    assert_eq!(graph.neuron("r_2_degree_receiver_0").unwrap().vth, 4.0);
    assert_eq!(graph.neuron("r_1_counter_0").unwrap().vth, 0.0);
    assert_eq!(graph.neuron("r_2_counter_0").unwrap().vth, 1.0);

    // Primaries are overwritten with their level-1 derivation, so primary and
    // first backup are behaviorally identical.
    assert_eq!(graph.neuron("spike_once_0").unwrap().vth, 2.0);
    assert_eq!(graph.neuron("degree_receiver_0").unwrap().vth, 3.0);
    assert_eq!(graph.neuron("counter_0").unwrap().vth, 0.0);
    // Bias and leak rates stay put for these roles.
    assert_eq!(graph.neuron("spike_once_0").unwrap().bias, 1.0);
    assert_eq!(graph.neuron("spike_once_0").unwrap().du, 0.2);
}

fn selector_with_m_val(m_val: i64) -> LifNeuron {
    LifNeuron::new(
        &format!("selector_{m_val}_0"),
        5.0,
        0.5,
        0.5,
        9.0,
        (0.0, 0.0),
        vec![
            Identifier::new("m_val", m_val, 0),
            Identifier::new("node_index", 0, 1),
        ],
    )
    .unwrap()
}

#[test]
fn test_next_round_into_selector_copies_is_forced_excitation() {
    let mut graph = AdaptationGraph::new();
    graph.add_neuron(neuron("next_round_0", 0.0, 1.0));
    graph.add_neuron(selector_with_m_val(1));
    graph
        .add_synapse(
            "next_round_0",
            "selector_1_0",
            Synapse::with_weight(7.0),
            false,
        )
        .unwrap();

    apply_population_coding(&mut graph, 1, &LayoutConfig::default()).unwrap();

    // Forced to weight 1 regardless of the original weight 7, from both the
    // original next_round and its own copy.
    assert_eq!(
        graph
            .synapse("next_round_0", "r_1_selector_1_0")
            .unwrap()
            .synapse
            .weight,
        NEXT_ROUND_TO_SELECTOR_WEIGHT
    );
    assert_eq!(
        graph
            .synapse("r_1_next_round_0", "r_1_selector_1_0")
            .unwrap()
            .synapse
            .weight,
        NEXT_ROUND_TO_SELECTOR_WEIGHT
    );

    // Selector copies sustain themselves once triggered.
    assert_eq!(
        graph
            .synapse("r_1_selector_1_0", "r_1_selector_1_0")
            .unwrap()
            .synapse
            .weight,
        SELECTOR_RECURRENT_WEIGHT
    );

    // Later-round selector parameters: zero bias, discovered leak rates.
    let copy = graph.neuron("r_1_selector_1_0").unwrap();
    assert_eq!(copy.bias, 0.0);
    assert_eq!(copy.du, 0.1);
    assert_eq!(copy.dv, 0.0);
    assert_eq!(copy.vth, 1.0);
    // Primary overwritten to match.
    let primary = graph.neuron("selector_1_0").unwrap();
    assert_eq!(primary.bias, 0.0);
    assert_eq!(primary.vth, 1.0);
}

#[test]
fn test_round_zero_selector_keeps_unit_bias() {
    let mut graph = AdaptationGraph::new();
    graph.add_neuron(selector_with_m_val(0));
    apply_population_coding(&mut graph, 3, &LayoutConfig::default()).unwrap();

    for level in 1..=3 {
        let copy = graph.neuron(&format!("r_{level}_selector_0_0")).unwrap();
        assert_eq!(copy.bias, 1.0);
        assert_eq!(copy.vth, f64::from(level));
    }
}

#[test]
fn test_selector_without_m_val_aborts_the_pass() {
    let mut graph = AdaptationGraph::new();
    let bare_selector =
        LifNeuron::new("selector_0_0", 1.0, 0.1, 0.0, 1.0, (0.0, 0.0), vec![]).unwrap();
    graph.add_neuron(bare_selector);
    let err = apply_population_coding(&mut graph, 1, &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, AdaptationError::MalformedIdentifier(_)));
}

#[test]
fn test_connector_nodes_are_soft_skipped() {
    let mut graph = golden_chain();
    graph.add_neuron(neuron("connector_0_1", 0.0, 1.0));
    graph
        .add_synapse(
            "counter_0",
            "connector_0_1",
            Synapse::with_weight(1.0),
            false,
        )
        .unwrap();

    apply_population_coding(&mut graph, 2, &LayoutConfig::default()).unwrap();

    assert!(!graph.contains_neuron("r_1_connector_0_1"));
    assert!(!graph.contains_neuron("r_2_connector_0_1"));
    // 3 computational originals * 3 members + 1 connector.
    assert_eq!(graph.neuron_count(), 10);
    // The connector keeps receiving from the counter's copies.
    assert!(graph.has_synapse("r_1_counter_0", "connector_0_1"));
    assert!(graph.has_synapse("r_2_counter_0", "connector_0_1"));
}

#[test]
fn test_population_positions_curve_away_from_original() {
    let layout = LayoutConfig {
        dx_redundant: 1.0,
        dy_redundant: 1.0,
        redundant_curve_factor: 0.1,
    };
    let mut graph = golden_chain();
    apply_population_coding(&mut graph, 2, &layout).unwrap();

    let original = graph.neuron("spike_once_0").unwrap().pos;
    let first = graph.neuron("r_1_spike_once_0").unwrap().pos;
    let second = graph.neuron("r_2_spike_once_0").unwrap().pos;
    assert!(first.0 > original.0 && second.0 > first.0);
    assert!(first.1 > original.1 && second.1 > first.1);
}

proptest! {
    /// Threshold invariant: for the delay-compensating roles the level-k
    /// population member has vth' = vth + k, whatever the original threshold.
    #[test]
    fn prop_delay_role_threshold_gains_level(
        vth in 0.0f64..50.0,
        redundancy in 1u32..8,
    ) {
        for name in ["spike_once_0", "rand_0", "degree_receiver_0"] {
            let mut graph = AdaptationGraph::new();
            graph.add_neuron(
                LifNeuron::new(name, 0.5, 0.2, 0.3, vth, (0.0, 0.0), vec![]).unwrap(),
            );
            apply_population_coding(&mut graph, redundancy, &LayoutConfig::default()).unwrap();

            for level in 1..=redundancy {
                let copy = graph.neuron(&format!("r_{level}_{name}")).unwrap();
                prop_assert!((copy.vth - (vth + f64::from(level))).abs() < 1e-9);
                prop_assert!((copy.bias - 0.5).abs() < 1e-9);
            }
        }
    }

    /// Every unordered population pair ends up with exactly one inhibitory
    /// edge, directed lower to higher.
    #[test]
    fn prop_population_pairs_fully_inhibited(redundancy in 1u32..6) {
        let mut graph = AdaptationGraph::new();
        graph.add_neuron(
            LifNeuron::new("rand_0", 0.0, 0.2, 0.3, 1.0, (0.0, 0.0), vec![]).unwrap(),
        );
        apply_population_coding(&mut graph, redundancy, &LayoutConfig::default()).unwrap();

        let mut members = vec!["rand_0".to_string()];
        members.extend((1..=redundancy).map(|level| format!("r_{level}_rand_0")));

        let mut inhibitory = 0usize;
        for (i, lower) in members.iter().enumerate() {
            for higher in &members[i + 1..] {
                let edge = graph.synapse(lower, higher);
                prop_assert!(edge.is_some());
                prop_assert_eq!(edge.unwrap().synapse.weight, INHIBITORY_WEIGHT);
                prop_assert!(!graph.has_synapse(higher, lower));
                inhibitory += 1;
            }
        }
        let population = redundancy as usize + 1;
        prop_assert_eq!(inhibitory, population * (population - 1) / 2);
    }
}
