// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Population-coding scheme: a flat population of equivalent neurons per node,
every pair wired with lower-to-higher suppression.
*/

pub mod builder;
pub mod properties;

pub use builder::apply_population_coding;
pub use properties::population_neuron_properties;
