// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Adaptation descriptor.

A validated `{type, redundancy}` pair describing one adaptation of one run,
plus a content hash used for experiment bookkeeping (result directories,
run-config identity). The hash never feeds into wiring logic.
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{AdaptationError, AdaptationResult};

/// Supported duplication strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationType {
    /// Chained takeover: one extra neuron per node per level, adjacent-level
    /// inhibition.
    Redundancy,
    /// Flat population of equivalent neurons, pairwise inhibition.
    Population,
}

impl fmt::Display for AdaptationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdaptationType::Redundancy => write!(f, "redundancy"),
            AdaptationType::Population => write!(f, "population"),
        }
    }
}

impl FromStr for AdaptationType {
    type Err = AdaptationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redundancy" => Ok(AdaptationType::Redundancy),
            "population" => Ok(AdaptationType::Population),
            other => Err(AdaptationError::UnsupportedAdaptationType(
                other.to_string(),
            )),
        }
    }
}

/// Specification of one adaptation: which duplication strategy to apply and
/// at which redundancy level. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Adaptation {
    adaptation_type: AdaptationType,
    redundancy: u32,
}

impl Adaptation {
    /// Validate and construct a descriptor from the raw experiment-config
    /// spelling of the adaptation type.
    pub fn new(adaptation_type: &str, redundancy: u32) -> AdaptationResult<Self> {
        let adaptation_type = adaptation_type.parse::<AdaptationType>()?;
        if redundancy < 1 {
            return Err(AdaptationError::InvalidRedundancy(
                "redundancy must be equal to, or larger than 1.".to_string(),
            ));
        }
        Ok(Self {
            adaptation_type,
            redundancy,
        })
    }

    pub fn adaptation_type(&self) -> AdaptationType {
        self.adaptation_type
    }

    pub fn redundancy(&self) -> u32 {
        self.redundancy
    }

    /// Deterministic content hash of the descriptor: the SHA-256 digest of
    /// the JSON encoding of `"<type>_<redundancy>"`. Identical descriptors
    /// always hash identically.
    pub fn get_hash(&self) -> String {
        let unique_id =
            serde_json::Value::String(format!("{}_{}", self.adaptation_type, self.redundancy));
        let mut hasher = Sha256::new();
        hasher.update(unique_id.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
