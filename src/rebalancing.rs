// ABOUTME: Rebalancing option generator producing the canonical recovery choices
// ABOUTME: Builds redistribute/extend/accept options with effort, risk, and recommendation tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Rebalancing Option Generator
//!
//! Produces the canonical, ranked set of recovery choices for one event.
//! The set is deliberately small: spreading the excess over the rest of the
//! week, extending the timeline, or accepting the day and moving on. Unsafe
//! redistributions are excluded rather than emitted with a warning label,
//! so every option shown to the user is followable as-is.

use tracing::warn;

use crate::config::RebalancingConfig;
use crate::errors::{EngineError, EngineResult};
use crate::impact::timeline_delay_days;
use crate::models::{
    EffortLevel, GoalContext, OptionImpact, OptionKind, OvereatingEvent, RebalancingOption,
    Recommendation, RiskLevel, TriggerType,
};

/// Generate the ranked option set for one event
///
/// `remaining_days_in_week` is the number of days after the event's date in
/// the current week; with 0 remaining days the redistribution option is
/// omitted and the set shrinks to two. Exactly one returned option is tagged
/// [`Recommendation::Recommended`].
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when the goal snapshot fails
/// validation or the event carries a non-positive excess.
pub fn generate(
    event: &OvereatingEvent,
    goal: &GoalContext,
    remaining_days_in_week: u32,
    config: &RebalancingConfig,
) -> EngineResult<Vec<RebalancingOption>> {
    goal.validate()?;
    if event.excess_calories <= 0 {
        return Err(EngineError::validation(
            "excess_calories",
            format!("must be positive, got {}", event.excess_calories),
        ));
    }

    let mut options = Vec::with_capacity(3);
    if let Some(redistribute) = redistribute_option(event, goal, remaining_days_in_week, config) {
        options.push(redistribute);
    }
    options.push(extend_option(event, goal));
    options.push(accept_option(event));

    apply_recommendations(&mut options);
    debug_assert_eq!(
        options
            .iter()
            .filter(|option| option.recommendation == Recommendation::Recommended)
            .count(),
        1,
        "option set must carry exactly one recommendation"
    );

    Ok(options)
}

/// Option 1: trim the remaining days of the week to absorb the excess
///
/// Returns `None` when no days remain or the trimmed target would dip below
/// the safe minimum; both cases are logged and the caller proceeds with the
/// remaining options.
fn redistribute_option(
    event: &OvereatingEvent,
    goal: &GoalContext,
    remaining_days: u32,
    config: &RebalancingConfig,
) -> Option<RebalancingOption> {
    if remaining_days == 0 {
        warn!(
            date = %event.date,
            "redistribution omitted: no days remain in the week"
        );
        return None;
    }

    let per_day_reduction = (f64::from(event.excess_calories) / f64::from(remaining_days)).ceil();
    let new_daily_target = event.daily_target - per_day_reduction;
    if new_daily_target < goal.safe_minimum_calories {
        warn!(
            date = %event.date,
            new_daily_target,
            safe_minimum = goal.safe_minimum_calories,
            "redistribution omitted: trimmed target would fall below the safe minimum"
        );
        return None;
    }

    let reduction_percent = per_day_reduction / event.daily_target * 100.0;
    let effort_level = if reduction_percent <= config.minimal_effort_max_percent {
        EffortLevel::Minimal
    } else if reduction_percent > config.challenging_effort_min_percent {
        EffortLevel::Challenging
    } else {
        EffortLevel::Moderate
    };

    let description = if remaining_days == 1 {
        format!(
            "Trim {per_day_reduction:.0} kcal from the last day of this week and finish on plan."
        )
    } else {
        format!(
            "Trim {per_day_reduction:.0} kcal from each of the next {remaining_days} days and finish the week on plan."
        )
    };

    Some(RebalancingOption {
        id: OptionKind::RedistributeWeek,
        name: "Redistribute across your week".to_owned(),
        description,
        impact: OptionImpact {
            new_daily_target,
            effort_level,
            risk_level: RiskLevel::Safe,
        },
        pros: vec![
            "Keeps your finish date exactly where it is".to_owned(),
            "Breaks the correction into small daily steps".to_owned(),
        ],
        cons: Some(vec![
            "Slightly tighter targets for the rest of the week".to_owned(),
        ]),
        recommendation: Recommendation::Neutral,
    })
}

/// Option 2: keep daily targets unchanged and let the finish date slip
fn extend_option(event: &OvereatingEvent, goal: &GoalContext) -> RebalancingOption {
    let delay = timeline_delay_days(event.excess_calories, goal.weekly_deficit_target);
    let description = match delay {
        0 => "Keep every daily target the same; your projected finish moves by less than a day."
            .to_owned(),
        1 => "Keep every daily target the same and move your projected finish out by 1 day."
            .to_owned(),
        days => format!(
            "Keep every daily target the same and move your projected finish out by {days} days."
        ),
    };

    RebalancingOption {
        id: OptionKind::ExtendTimeline,
        name: "Extend your timeline".to_owned(),
        description,
        impact: OptionImpact {
            new_daily_target: event.daily_target,
            effort_level: EffortLevel::Minimal,
            risk_level: RiskLevel::Safe,
        },
        pros: vec![
            "No change to your daily routine".to_owned(),
            "No added hunger pressure this week".to_owned(),
        ],
        cons: Some(vec!["Moves your projected finish date".to_owned()]),
        recommendation: Recommendation::Neutral,
    }
}

/// Option 3: change nothing and move on
fn accept_option(event: &OvereatingEvent) -> RebalancingOption {
    let risk_level = if event.trigger_type == TriggerType::Severe {
        RiskLevel::Moderate
    } else {
        RiskLevel::Safe
    };

    RebalancingOption {
        id: OptionKind::AcceptContinue,
        name: "Accept and continue".to_owned(),
        description: "Log it, learn from it, and carry on with the plan unchanged.".to_owned(),
        impact: OptionImpact {
            new_daily_target: event.daily_target,
            effort_level: EffortLevel::Minimal,
            risk_level,
        },
        pros: vec![
            "Zero restriction and zero schedule changes".to_owned(),
            "Often the right call for one-off occasions".to_owned(),
        ],
        cons: Some(vec!["The excess stays on the books uncorrected".to_owned()]),
        recommendation: Recommendation::Neutral,
    }
}

/// Tag exactly one option `Recommended`; aggressive options are discouraged
///
/// The redistribution option wins when present at minimal or moderate
/// effort; otherwise the timeline extension is the default suggestion.
fn apply_recommendations(options: &mut [RebalancingOption]) {
    for option in &mut *options {
        if option.impact.risk_level == RiskLevel::Aggressive {
            option.recommendation = Recommendation::NotRecommended;
        }
    }

    let redistribute_wins = options.iter().position(|option| {
        option.id == OptionKind::RedistributeWeek
            && option.impact.effort_level != EffortLevel::Challenging
            && option.recommendation != Recommendation::NotRecommended
    });
    let fallback = options
        .iter()
        .position(|option| option.id == OptionKind::ExtendTimeline);

    if let Some(index) = redistribute_wins.or(fallback) {
        options[index].recommendation = Recommendation::Recommended;
    }
}
