// ABOUTME: Configuration error types for engine threshold validation
// ABOUTME: Defines error variants for invalid ranges and unparseable overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Configuration error types for engine threshold validation.

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two related values are ordered the wrong way (e.g., breakpoints inverted)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Failed to parse a configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric value outside the valid range for its parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}
