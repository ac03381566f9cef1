// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Chained-redundancy scheme: one extra neuron per node per level, each level
inhibited by the one before it, plus the settings validation both schemes
share.
*/

pub mod builder;
pub mod properties;
pub mod settings;

pub use builder::apply_redundancy;
pub use properties::chained_neuron_properties;
pub use settings::{
    verify_redundancy_settings_for_exp_config, verify_redundancy_settings_for_run_config,
};
