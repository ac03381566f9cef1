// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Layout offsets for redundant neurons.

Plotting itself is out of scope; adaptation passes only consume two spacing
scalars and a curve factor to push each redundant copy away from its original
so populations stay readable in rendered graphs.
*/

use serde::{Deserialize, Serialize};

/// Spacing and curvature parameters for placing redundant neurons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal spacing per redundancy level.
    pub dx_redundant: f64,
    /// Vertical spacing per redundancy level.
    pub dy_redundant: f64,
    /// Curvature factor bending population copies right and down.
    pub redundant_curve_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dx_redundant: 0.25,
            dy_redundant: 0.25,
            redundant_curve_factor: 0.1,
        }
    }
}

impl LayoutConfig {
    /// Position of the level-`red_level` copy in the chained scheme: a
    /// straight diagonal offset from the original.
    pub fn chained_offset(&self, pos: (f64, f64), red_level: u32) -> (f64, f64) {
        let level = f64::from(red_level);
        (
            pos.0 + self.dx_redundant * level,
            pos.1 + self.dy_redundant * level,
        )
    }

    /// Position of the level-`red_level` copy in the population scheme:
    /// curves right and down with increasing level so large populations fan
    /// out instead of stacking.
    pub fn population_offset(&self, pos: (f64, f64), red_level: u32) -> (f64, f64) {
        let level = f64::from(red_level);
        (
            pos.0
                + (self.dx_redundant * level)
                    * (1.0 + self.redundant_curve_factor).powi(red_level as i32),
            pos.1
                + (self.dy_redundant * level)
                    * (1.0 - self.redundant_curve_factor).powi(red_level as i32),
        )
    }
}
