// ABOUTME: Impact analyzer translating an overeating event into honest, non-judgmental numbers
// ABOUTME: Computes timeline delay, weekly impact, workout equivalents, and reframe messaging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Impact Analyzer
//!
//! Turns one overeating event plus the goal snapshot into an
//! [`ImpactAnalysis`]: the supportive reframe first, then the real timeline
//! cost, then the same excess in relatable units. Deterministic and free of
//! clock reads so identical inputs always produce identical analyses.

use crate::config::ImpactConfig;
use crate::errors::{EngineError, EngineResult};
use crate::models::{
    GoalContext, ImpactAnalysis, OvereatingEvent, Perspective, RealImpact, Reframe, TriggerType,
};

/// Analyze the cost of an event against the goal snapshot
///
/// `on_target_streak_days` is the number of consecutive on-target days
/// immediately before the event; it only feeds the optional success
/// reminder. Percentages are intentionally unclamped, so a very large
/// excess honestly reads above 100% of a week.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when the goal snapshot fails
/// validation or the event carries a non-positive excess.
pub fn analyze(
    event: &OvereatingEvent,
    goal: &GoalContext,
    on_target_streak_days: u32,
    config: &ImpactConfig,
) -> EngineResult<ImpactAnalysis> {
    goal.validate()?;
    if event.excess_calories <= 0 {
        return Err(EngineError::validation(
            "excess_calories",
            format!("must be positive, got {}", event.excess_calories),
        ));
    }

    let excess = f64::from(event.excess_calories);
    let week_ratio = excess / goal.weekly_deficit_target;
    let journey_deficit = goal.weekly_deficit_target * f64::from(goal.total_program_weeks);

    let real_impact = RealImpact {
        timeline_delay_days: timeline_delay_days(event.excess_calories, goal.weekly_deficit_target),
        weekly_goal_impact_percent: (week_ratio * 100.0).round() as i32,
    };

    let perspective = Perspective {
        equivalent_workouts: (excess / goal.workout_equivalent_calories).round().max(0.0) as u32,
        percent_of_total_journey: (excess / journey_deficit * 100.0).round() as i32,
        days_to_nullify: (week_ratio * 7.0).ceil().max(0.0) as u32,
    };

    let reframe = reframe_for(
        event.trigger_type,
        on_target_streak_days,
        config.min_streak_for_reminder,
    );

    Ok(ImpactAnalysis {
        reframe,
        real_impact,
        perspective,
    })
}

/// Whole days the goal date slips if nothing changes; never negative
///
/// Shared with the option generator so the extend-timeline option always
/// quotes the same number the analysis shows.
pub(crate) fn timeline_delay_days(excess_calories: i32, weekly_deficit_target: f64) -> u32 {
    let delay = f64::from(excess_calories) / weekly_deficit_target * 7.0;
    delay.round().max(0.0) as u32
}

/// Severity-matched reframe copy, with the streak cited when it qualifies
fn reframe_for(trigger_type: TriggerType, streak_days: u32, min_streak: u32) -> Reframe {
    let (message, focus_point) = match trigger_type {
        TriggerType::Mild => (
            "One heavier day, not a setback. Your weekly budget absorbs this without drama.",
            "Return to your normal plan at the next meal.",
        ),
        TriggerType::Moderate => (
            "A sizeable day, and a recoverable one. The numbers below are smaller than it feels.",
            "Small adjustments over the next few days absorb this completely.",
        ),
        TriggerType::Severe => (
            "A big day. It changes this week's math, not your trajectory.",
            "Pick one recovery option below and skip any crash compensation.",
        ),
    };

    let success_reminder = (streak_days >= min_streak).then(|| {
        format!("You've been on target {streak_days} days in a row. One day doesn't undo that.")
    });

    Reframe {
        message: message.to_owned(),
        focus_point: focus_point.to_owned(),
        success_reminder,
    }
}
