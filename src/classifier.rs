// ABOUTME: Trigger classifier turning daily calorie totals into overeating events
// ABOUTME: Validates inputs, applies the tolerance band, and assigns severity tiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Trigger Classifier
//!
//! Pure detection logic: given one day's consumed calories and target, decide
//! whether the day qualifies as an overeating event and at which severity
//! tier. No side effects; the reconciler owns event lifecycle.

use chrono::NaiveDate;

use crate::config::ClassifierConfig;
use crate::errors::{EngineError, EngineResult};
use crate::models::{OvereatingEvent, TriggerType};

/// Classify one day's totals against the configured breakpoints
///
/// Returns `Ok(None)` when the day does not qualify: consumed at or under
/// target, the excess sits inside the tolerance band, or the excess rounds
/// to zero whole kilocalories. The returned event is fresh and
/// unacknowledged; callers that amend an existing day copy the recomputed
/// fields over instead of keeping the new id.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when `consumed_calories` is negative
/// or non-finite, or `target_calories` is non-positive or non-finite. No
/// classification is attempted on invalid input.
pub fn classify(
    date: NaiveDate,
    consumed_calories: f64,
    target_calories: f64,
    thresholds: &ClassifierConfig,
) -> EngineResult<Option<OvereatingEvent>> {
    if !consumed_calories.is_finite() || consumed_calories < 0.0 {
        return Err(EngineError::validation(
            "consumed_calories",
            format!("must be a non-negative number, got {consumed_calories}"),
        ));
    }
    if !target_calories.is_finite() || target_calories <= 0.0 {
        return Err(EngineError::validation(
            "target_calories",
            format!("must be a positive number, got {target_calories}"),
        ));
    }

    let excess = consumed_calories - target_calories;
    if excess <= thresholds.min_excess_threshold {
        return Ok(None);
    }

    // An event always carries a positive whole-kcal excess; a sub-half-kcal
    // overshoot rounds away to nothing even under a zero tolerance.
    let excess_calories = excess.round() as i32;
    if excess_calories <= 0 {
        return Ok(None);
    }

    let trigger_type = severity_for(excess, thresholds);
    Ok(Some(OvereatingEvent::new(
        date,
        excess_calories,
        target_calories,
        trigger_type,
    )))
}

/// Map an excess to its severity tier; tiers never decrease as excess grows
fn severity_for(excess: f64, thresholds: &ClassifierConfig) -> TriggerType {
    if excess >= thresholds.severe_breakpoint {
        TriggerType::Severe
    } else if excess >= thresholds.moderate_breakpoint {
        TriggerType::Moderate
    } else {
        TriggerType::Mild
    }
}
