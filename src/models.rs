// ABOUTME: Core data models for overeating detection and recovery planning
// ABOUTME: Defines OvereatingEvent, RecoveryPlan, RebalancingOption and supporting types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! # Data Models
//!
//! Domain types shared by the classifier, impact analyzer, option generator,
//! and reconciler. Everything that crosses the engine boundary derives serde
//! so the UI and persistence layers receive stable JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};

/// Severity tier of an overeating event
///
/// Tiers are ordered: `Mild < Moderate < Severe`, so severity comparisons
/// read naturally (`new_tier > old_tier`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Excess below the moderate breakpoint
    Mild,
    /// Excess at or above the moderate breakpoint, below the severe breakpoint
    Moderate,
    /// Excess at or above the severe breakpoint
    Severe,
}

impl TriggerType {
    /// Stable lowercase identifier used in logs and JSON
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected overeating day
///
/// Created, amended, and resolved exclusively by the reconciler. The `id` is
/// stable for the lifetime of the event: edits to the day's meal log amend
/// the event in place rather than replacing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvereatingEvent {
    /// Stable identifier, preserved across amendments
    pub id: Uuid,
    /// Calendar day the event belongs to
    pub date: NaiveDate,
    /// Rounded `consumed - target` for the day, in kcal
    pub excess_calories: i32,
    /// The day's calorie target captured at classification time, in kcal
    pub daily_target: f64,
    /// Severity tier derived from the excess
    pub trigger_type: TriggerType,
    /// Whether the user has seen this event (viewed, dismissed, or selected
    /// a recovery option); reset when the severity tier changes
    pub acknowledged: bool,
}

impl OvereatingEvent {
    /// Create a fresh, unacknowledged event with a new id
    #[must_use]
    pub fn new(
        date: NaiveDate,
        excess_calories: i32,
        daily_target: f64,
        trigger_type: TriggerType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            excess_calories,
            daily_target,
            trigger_type,
            acknowledged: false,
        }
    }
}

/// Snapshot of the user's goal configuration
///
/// Supplied by the caller on every planning call; the engine never reads the
/// goal store itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalContext {
    /// Planned weekly calorie deficit, in kcal per week
    pub weekly_deficit_target: f64,
    /// Total length of the program, in weeks
    pub total_program_weeks: u32,
    /// Days already elapsed in the program
    pub days_elapsed: u32,
    /// Calories burned by one typical workout, in kcal
    pub workout_equivalent_calories: f64,
    /// Floor below which a rebalanced daily target is never pushed, in kcal
    pub safe_minimum_calories: f64,
}

impl GoalContext {
    /// Validate the snapshot before it drives any arithmetic
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when a field is non-finite,
    /// non-positive where a positive value is required, or the program
    /// length is zero.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.weekly_deficit_target.is_finite() || self.weekly_deficit_target <= 0.0 {
            return Err(EngineError::validation(
                "weekly_deficit_target",
                format!("must be a positive number, got {}", self.weekly_deficit_target),
            ));
        }
        if self.total_program_weeks == 0 {
            return Err(EngineError::validation(
                "total_program_weeks",
                "must be at least 1",
            ));
        }
        if !self.workout_equivalent_calories.is_finite() || self.workout_equivalent_calories <= 0.0
        {
            return Err(EngineError::validation(
                "workout_equivalent_calories",
                format!(
                    "must be a positive number, got {}",
                    self.workout_equivalent_calories
                ),
            ));
        }
        if !self.safe_minimum_calories.is_finite() || self.safe_minimum_calories <= 0.0 {
            return Err(EngineError::validation(
                "safe_minimum_calories",
                format!("must be a positive number, got {}", self.safe_minimum_calories),
            ));
        }
        Ok(())
    }
}

/// One day's consumed calories against its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    /// Calendar day the totals describe
    pub date: NaiveDate,
    /// Sum of logged calories for the day, in kcal
    pub consumed: f64,
    /// The day's calorie target, in kcal
    pub target: f64,
}

/// A single logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    /// Unique identifier for the entry
    pub id: Uuid,
    /// Calendar day the meal counts toward
    pub date: NaiveDate,
    /// User-facing label ("breakfast", "late snack", ...)
    pub name: String,
    /// Energy content, in kcal
    pub calories: f64,
    /// When the entry was recorded
    pub logged_at: DateTime<Utc>,
}

impl MealEntry {
    /// Create a new entry timestamped now
    #[must_use]
    pub fn new(date: NaiveDate, name: impl Into<String>, calories: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            name: name.into(),
            calories,
            logged_at: Utc::now(),
        }
    }
}

/// Supportive framing shown before the numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reframe {
    /// Non-judgmental summary of what happened
    pub message: String,
    /// The single thing to focus on next
    pub focus_point: String,
    /// Present only when the user has a qualifying on-target streak
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_reminder: Option<String>,
}

/// The honest cost of the event against the goal timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealImpact {
    /// Whole days the goal date slips if nothing is adjusted
    pub timeline_delay_days: u32,
    /// Share of one week's deficit consumed by the excess, in percent
    /// (intentionally unclamped; a large excess reads above 100)
    pub weekly_goal_impact_percent: i32,
}

/// The same excess expressed in relatable units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    /// Typical workouts that burn the excess
    pub equivalent_workouts: u32,
    /// Excess as a share of the whole program's planned deficit, in percent
    pub percent_of_total_journey: i32,
    /// Days of normal adherence that absorb the excess
    pub days_to_nullify: u32,
}

/// Full impact breakdown for one overeating event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    /// Supportive framing
    pub reframe: Reframe,
    /// Timeline and weekly-budget cost
    pub real_impact: RealImpact,
    /// Relatable equivalents
    pub perspective: Perspective,
}

/// Subjective difficulty of following an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    /// Barely noticeable day to day
    Minimal,
    /// Noticeable but sustainable
    Moderate,
    /// Hard to sustain; close to the compensation territory we avoid
    Challenging,
}

/// Physiological / behavioral risk of following an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No meaningful downside
    Safe,
    /// Worth a second look before committing
    Moderate,
    /// Actively discouraged
    Aggressive,
}

/// How the engine ranks an option for this user right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    /// The single option the engine suggests first
    Recommended,
    /// Valid choice, not the default suggestion
    Neutral,
    /// Discouraged (reserved for aggressive-risk options)
    NotRecommended,
}

/// Identity of a canonical rebalancing option
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    /// Spread the excess across the remaining days of the week
    RedistributeWeek,
    /// Push the goal date out and keep daily targets unchanged
    ExtendTimeline,
    /// Change nothing and move on
    AcceptContinue,
}

impl OptionKind {
    /// Stable kebab-case id used in the UI contract
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RedistributeWeek => "redistribute-week",
            Self::ExtendTimeline => "extend-timeline",
            Self::AcceptContinue => "accept-continue",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redistribute-week" => Ok(Self::RedistributeWeek),
            "extend-timeline" => Ok(Self::ExtendTimeline),
            "accept-continue" => Ok(Self::AcceptContinue),
            other => Err(EngineError::UnknownOption {
                option_id: other.to_owned(),
            }),
        }
    }
}

/// Concrete numbers behind a rebalancing option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionImpact {
    /// Daily target while the option is in effect, in kcal
    /// (unchanged from the event's target for non-redistributing options)
    pub new_daily_target: f64,
    /// Difficulty of sticking to the option
    pub effort_level: EffortLevel,
    /// Risk tier of the option
    pub risk_level: RiskLevel,
}

/// One concrete way to absorb an overeating event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingOption {
    /// Stable option identity (serialized as its kebab-case id)
    pub id: OptionKind,
    /// Short display name
    pub name: String,
    /// One-sentence description with the computed numbers filled in
    pub description: String,
    /// The numbers and tiers behind the option
    pub impact: OptionImpact,
    /// Fixed upsides of this option kind
    pub pros: Vec<String>,
    /// Fixed downsides, when the option kind has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cons: Option<Vec<String>>,
    /// Engine ranking; exactly one option per set is `Recommended`
    pub recommendation: Recommendation,
}

/// Impact analysis plus the ranked option set for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPlan {
    /// Full impact breakdown
    pub impact: ImpactAnalysis,
    /// Canonical options in generation order; never empty
    pub rebalancing_options: Vec<RebalancingOption>,
}

/// The goal-configuration change a selected option translates to
///
/// Returned by `select_option`; the caller applies it to the goal store.
/// The engine itself never mutates goal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetMutation {
    /// Lower the daily target for the remaining days of this week
    AdjustDailyTarget {
        /// Target to apply, in kcal
        new_daily_target: f64,
        /// Days the adjusted target stays in effect
        days_remaining: u32,
    },
    /// Push the projected goal date out
    ExtendTimeline {
        /// Days added to the projected finish
        additional_days: u32,
    },
    /// Leave targets and timeline untouched
    NoChange,
}

/// Days strictly after `date` in the week it belongs to
///
/// `week_start` selects the calendar convention (`Weekday::Mon` for ISO
/// weeks). A date falling on the last day of its week returns 0.
#[must_use]
pub fn remaining_days_in_week(date: NaiveDate, week_start: Weekday) -> u32 {
    let day_index = (7 + date.weekday().num_days_from_monday()
        - week_start.num_days_from_monday())
        % 7;
    6 - day_index
}
