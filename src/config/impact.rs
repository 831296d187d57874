// ABOUTME: Impact analyzer configuration for reframe and perspective output
// ABOUTME: Configures when an on-target streak earns a success reminder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Impact Analyzer Configuration

use serde::{Deserialize, Serialize};

/// Tunables for the impact analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Minimum consecutive on-target days before the reframe cites the streak
    pub min_streak_for_reminder: u32,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            min_streak_for_reminder: 3,
        }
    }
}
