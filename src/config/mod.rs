// ABOUTME: Engine configuration aggregating classifier, impact, and rebalancing settings
// ABOUTME: Provides defaults, environment variable overrides, and unified validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Engine Configuration Module
//!
//! All tunable thresholds of the recovery engine live here and are passed
//! into the engine as data; the detection and planning algorithms never
//! hard-code a breakpoint. Every value has a sensible default, can be
//! overridden through `SETPOINT_*` environment variables, and is validated
//! before use:
//!
//! - **Classifier**: excess tolerance and severity breakpoints
//! - **Impact**: streak length required for a success reminder
//! - **Rebalancing**: effort tier bounds for redistribution options

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity breakpoints for overeating detection
pub mod classifier;
/// Configuration error types
pub mod error;
/// Reframe and perspective tunables
pub mod impact;
/// Effort tier bounds for redistribution options
pub mod rebalancing;

pub use classifier::ClassifierConfig;
pub use error::ConfigError;
pub use impact::ImpactConfig;
pub use rebalancing::RebalancingConfig;

/// Main engine configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration for the trigger classifier
    pub classifier: ClassifierConfig,
    /// Configuration for the impact analyzer
    pub impact: ImpactConfig,
    /// Configuration for the rebalancing option generator
    pub rebalancing: RebalancingConfig,
}

impl EngineConfig {
    /// Load configuration from defaults plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable contains an invalid
    /// value or the resulting configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config = config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error when a threshold is non-finite, negative where a
    /// non-negative value is required, or ordered against its neighbors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cls = &self.classifier;
        if !cls.min_excess_threshold.is_finite() || cls.min_excess_threshold < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_excess_threshold must be a non-negative number",
            ));
        }
        if !cls.moderate_breakpoint.is_finite() || cls.moderate_breakpoint <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "moderate_breakpoint must be a positive number",
            ));
        }
        if !cls.severe_breakpoint.is_finite() {
            return Err(ConfigError::ValueOutOfRange(
                "severe_breakpoint must be a finite number",
            ));
        }
        if cls.min_excess_threshold >= cls.moderate_breakpoint {
            return Err(ConfigError::InvalidRange(
                "min_excess_threshold must be < moderate_breakpoint",
            ));
        }
        if cls.moderate_breakpoint >= cls.severe_breakpoint {
            return Err(ConfigError::InvalidRange(
                "moderate_breakpoint must be < severe_breakpoint",
            ));
        }

        if self.impact.min_streak_for_reminder == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_streak_for_reminder must be at least 1",
            ));
        }

        let reb = &self.rebalancing;
        if !reb.minimal_effort_max_percent.is_finite() || reb.minimal_effort_max_percent <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "minimal_effort_max_percent must be a positive number",
            ));
        }
        if !reb.challenging_effort_min_percent.is_finite()
            || reb.challenging_effort_min_percent > 100.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "challenging_effort_min_percent must be at most 100",
            ));
        }
        if reb.minimal_effort_max_percent >= reb.challenging_effort_min_percent {
            return Err(ConfigError::InvalidRange(
                "minimal_effort_max_percent must be < challenging_effort_min_percent",
            ));
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Classifier overrides
        Self::apply_env_var(
            "SETPOINT_CLASSIFIER_MIN_EXCESS",
            &mut self.classifier.min_excess_threshold,
        )?;
        Self::apply_env_var(
            "SETPOINT_CLASSIFIER_MODERATE_BREAKPOINT",
            &mut self.classifier.moderate_breakpoint,
        )?;
        Self::apply_env_var(
            "SETPOINT_CLASSIFIER_SEVERE_BREAKPOINT",
            &mut self.classifier.severe_breakpoint,
        )?;

        // Impact analyzer overrides
        Self::apply_env_var(
            "SETPOINT_IMPACT_MIN_STREAK_FOR_REMINDER",
            &mut self.impact.min_streak_for_reminder,
        )?;

        // Rebalancing overrides
        Self::apply_env_var(
            "SETPOINT_REBALANCING_MINIMAL_EFFORT_PCT",
            &mut self.rebalancing.minimal_effort_max_percent,
        )?;
        Self::apply_env_var(
            "SETPOINT_REBALANCING_CHALLENGING_EFFORT_PCT",
            &mut self.rebalancing.challenging_effort_min_percent,
        )?;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_breakpoints_are_rejected() {
        let mut config = EngineConfig::default();
        config.classifier.moderate_breakpoint = 900.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_tolerance_above_moderate_breakpoint_is_rejected() {
        let mut config = EngineConfig::default();
        config.classifier.min_excess_threshold = 350.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_streak_minimum_is_rejected() {
        let mut config = EngineConfig::default();
        config.impact.min_streak_for_reminder = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_effort_bounds_must_be_ordered() {
        let mut config = EngineConfig::default();
        config.rebalancing.minimal_effort_max_percent = 20.0;
        assert!(config.validate().is_err());
    }
}
