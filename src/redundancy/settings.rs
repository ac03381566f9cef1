// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Redundancy settings validation.

Two entry points with identical semantics and different carrier shapes: an
experiment config sweeps a list of redundancy levels, a run config carries a
single level. A fully absent adaptation block means "no adaptation requested"
and validates unconditionally.

Policy: redundancy levels must be odd and at least 1. An even population
splits into two equal halves under worst-case failures and can deadlock on
the quorum thresholds, so even levels are rejected outright.
*/

use ahash::AHashMap;

use crate::types::{AdaptationError, AdaptationResult};

/// Key under which adaptation configs carry their redundancy levels.
pub const REDUNDANCY_KEY: &str = "redundancy";

/// Validate the adaptation block of an experiment config, which carries a
/// list of redundancy levels to sweep.
pub fn verify_redundancy_settings_for_exp_config(
    adaptation: Option<&AHashMap<String, Vec<i64>>>,
) -> AdaptationResult<()> {
    let Some(adaptation) = adaptation else {
        return Ok(());
    };
    match adaptation.get(REDUNDANCY_KEY) {
        Some(levels) => {
            for &redundancy in levels {
                verify_redundancy_value(redundancy)?;
            }
            Ok(())
        }
        None => Err(missing_key_error(adaptation.keys())),
    }
}

/// Validate the adaptation block of a run config, which carries a single
/// redundancy level.
pub fn verify_redundancy_settings_for_run_config(
    adaptation: Option<&AHashMap<String, i64>>,
) -> AdaptationResult<()> {
    let Some(adaptation) = adaptation else {
        return Ok(());
    };
    match adaptation.get(REDUNDANCY_KEY) {
        Some(&redundancy) => verify_redundancy_value(redundancy),
        None => Err(missing_key_error(adaptation.keys())),
    }
}

fn verify_redundancy_value(redundancy: i64) -> AdaptationResult<()> {
    if redundancy < 1 {
        return Err(AdaptationError::InvalidRedundancy(
            "redundancy should be 1 or larger.".to_string(),
        ));
    }
    if redundancy % 2 == 0 {
        return Err(AdaptationError::InvalidRedundancy(
            "redundancy should be odd integer.".to_string(),
        ));
    }
    Ok(())
}

fn missing_key_error<'a>(keys: impl Iterator<Item = &'a String>) -> AdaptationError {
    let mut found: Vec<&str> = keys.map(String::as_str).collect();
    found.sort_unstable();
    AdaptationError::MissingRedundancyKey(format!("[{}]", found.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_adaptation_is_a_noop() {
        assert!(verify_redundancy_settings_for_exp_config(None).is_ok());
        assert!(verify_redundancy_settings_for_run_config(None).is_ok());
    }

    #[test]
    fn test_missing_redundancy_key_is_reported() {
        let mut adaptation: AHashMap<String, Vec<i64>> = AHashMap::new();
        adaptation.insert("neuron_death".to_string(), vec![1]);
        let err = verify_redundancy_settings_for_exp_config(Some(&adaptation)).unwrap_err();
        assert!(matches!(err, AdaptationError::MissingRedundancyKey(_)));
        assert!(err.to_string().contains("neuron_death"));
    }

    #[test]
    fn test_even_run_level_is_rejected() {
        let mut adaptation: AHashMap<String, i64> = AHashMap::new();
        adaptation.insert(REDUNDANCY_KEY.to_string(), 4);
        let err = verify_redundancy_settings_for_run_config(Some(&adaptation)).unwrap_err();
        assert!(err.to_string().contains("odd integer"));
    }

    #[test]
    fn test_odd_run_level_is_accepted() {
        let mut adaptation: AHashMap<String, i64> = AHashMap::new();
        adaptation.insert(REDUNDANCY_KEY.to_string(), 3);
        assert!(verify_redundancy_settings_for_run_config(Some(&adaptation)).is_ok());
    }
}
