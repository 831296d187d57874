// ABOUTME: Trigger classifier configuration defining overeating severity breakpoints
// ABOUTME: Configures the minimum excess tolerance and the mild/moderate/severe tiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Trigger Classifier Configuration
//!
//! Severity breakpoints for turning a day's calorie excess into an
//! overeating tier. Defaults are calibrated to a 2000 kcal daily target;
//! [`ClassifierConfig::scaled_to_target`] derives the same table
//! proportionally for other targets.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Tolerance band as a fraction of the daily target (50 kcal at 2000)
const EXCESS_TOLERANCE_FRACTION: f64 = 0.025;
/// Moderate breakpoint as a fraction of the daily target (300 kcal at 2000)
const MODERATE_FRACTION: f64 = 0.15;
/// Severe breakpoint as a fraction of the daily target (800 kcal at 2000)
const SEVERE_FRACTION: f64 = 0.40;

/// Severity thresholds for overeating detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Excess at or below this tolerance never creates an event, in kcal
    pub min_excess_threshold: f64,
    /// Excess at or above this value is at least moderate, in kcal
    pub moderate_breakpoint: f64,
    /// Excess at or above this value is severe, in kcal
    pub severe_breakpoint: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_excess_threshold: 50.0,
            moderate_breakpoint: 300.0,
            severe_breakpoint: 800.0,
        }
    }
}

impl ClassifierConfig {
    /// Derive a breakpoint table proportional to the given daily target
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValueOutOfRange`] when the target is not a
    /// positive finite number.
    pub fn scaled_to_target(daily_target: f64) -> Result<Self, ConfigError> {
        if !daily_target.is_finite() || daily_target <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "daily_target must be a positive number",
            ));
        }
        Ok(Self {
            min_excess_threshold: daily_target * EXCESS_TOLERANCE_FRACTION,
            moderate_breakpoint: daily_target * MODERATE_FRACTION,
            severe_breakpoint: daily_target * SEVERE_FRACTION,
        })
    }
}
