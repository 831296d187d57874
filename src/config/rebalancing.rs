// ABOUTME: Rebalancing option generator configuration for effort tiering
// ABOUTME: Configures the per-day reduction percentages that bound each effort level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Rebalancing Option Generator Configuration
//!
//! The redistribution option's effort level is derived from the per-day
//! calorie reduction as a percentage of the daily target. These bounds set
//! where minimal ends and challenging begins.

use serde::{Deserialize, Serialize};

/// Effort tier bounds for redistribution options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingConfig {
    /// Reductions up to this percent of the daily target are minimal effort
    pub minimal_effort_max_percent: f64,
    /// Reductions above this percent of the daily target are challenging
    pub challenging_effort_min_percent: f64,
}

impl Default for RebalancingConfig {
    fn default() -> Self {
        Self {
            minimal_effort_max_percent: 5.0,
            challenging_effort_min_percent: 15.0,
        }
    }
}
