// ABOUTME: Error types for the recovery engine with structured context
// ABOUTME: Defines EngineError variants for validation, lookup, and invariant failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::ConfigError;

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Common error types for recovery engine operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Input data failed validation before any state was touched
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Reason the value was rejected
        reason: String,
    },

    /// An internal invariant was broken; indicates a bug in the caller or engine
    #[error("Invariant violation: {detail}")]
    InvariantViolation {
        /// Description of the broken invariant
        detail: String,
    },

    /// The referenced overeating event is not (or no longer) in the store
    #[error("No active overeating event for {date}")]
    EventNotFound {
        /// Day the caller referenced
        date: NaiveDate,
    },

    /// The referenced meal entry does not exist in the log
    #[error("No meal entry with id {id}")]
    MealNotFound {
        /// Entry id supplied by the caller
        id: Uuid,
    },

    /// The selected rebalancing option is not available for this event
    #[error("Unknown rebalancing option '{option_id}'")]
    UnknownOption {
        /// Option id supplied by the caller
        option_id: String,
    },

    /// Configuration load or validation failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Build a validation error for a named input field
    #[must_use]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True when the error is a pre-state input rejection
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
