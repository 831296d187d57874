// ABOUTME: Recovery engine facade exposing detection, planning, and selection operations
// ABOUTME: Owns the configuration and reconciler; composes analyzer and option generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Recovery Engine
//!
//! The single entry point the app shell talks to. The engine owns the
//! validated configuration and the reconciler; the meal log and goal
//! configuration stay outside and are passed in as snapshots. Every
//! operation is synchronous: a log mutation is followed by one blocking
//! reconciliation pass, so callers never observe a half-updated day.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::impact;
use crate::meal_log::DailyTotalsSource;
use crate::models::{
    GoalContext, OptionKind, OvereatingEvent, RecoveryPlan, TargetMutation,
};
use crate::rebalancing;
use crate::reconciler::{EventSink, NoopSink, ReconcileOutcome, Reconciler};

/// Overeating detection and recovery planning engine
#[derive(Debug)]
pub struct RecoveryEngine<K: EventSink = NoopSink> {
    config: EngineConfig,
    reconciler: Reconciler<K>,
}

impl RecoveryEngine<NoopSink> {
    /// Engine with the given configuration and no persistence callback
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sink(config, NoopSink)
    }
}

impl Default for RecoveryEngine<NoopSink> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<K: EventSink> RecoveryEngine<K> {
    /// Engine that notifies `sink` on every event transition
    #[must_use]
    pub fn with_sink(config: EngineConfig, sink: K) -> Self {
        Self {
            config,
            reconciler: Reconciler::with_sink(sink),
        }
    }

    /// The configuration the engine was built with
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reconcile one day after a meal was added, edited, or removed
    ///
    /// Call once per affected date; an edit that moved a meal across days
    /// touches two dates and needs two calls.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the totals source and invariant
    /// violations from the store.
    pub fn on_meal_log_changed(
        &mut self,
        date: NaiveDate,
        source: &impl DailyTotalsSource,
    ) -> EngineResult<ReconcileOutcome> {
        self.reconciler
            .on_meal_log_changed(date, source, &self.config.classifier)
    }

    /// The day's active overeating event, if any
    #[must_use]
    pub fn active_event(&self, date: NaiveDate) -> Option<&OvereatingEvent> {
        self.reconciler.store().active_event(date)
    }

    /// All active events in date order
    pub fn active_events(&self) -> impl Iterator<Item = &OvereatingEvent> {
        self.reconciler.store().events()
    }

    /// Build the full recovery plan for one event
    ///
    /// Pure with respect to engine state: the plan is a function of the
    /// event, the goal snapshot, and the remaining-week inputs, so the
    /// same inputs always produce the same plan.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when the goal snapshot or event
    /// fails validation.
    pub fn recovery_plan(
        &self,
        event: &OvereatingEvent,
        goal: &GoalContext,
        remaining_days_in_week: u32,
        on_target_streak_days: u32,
    ) -> EngineResult<RecoveryPlan> {
        let analysis = impact::analyze(event, goal, on_target_streak_days, &self.config.impact)?;
        let rebalancing_options =
            rebalancing::generate(event, goal, remaining_days_in_week, &self.config.rebalancing)?;
        debug!(
            date = %event.date,
            options = rebalancing_options.len(),
            "recovery plan generated"
        );
        Ok(RecoveryPlan {
            impact: analysis,
            rebalancing_options,
        })
    }

    /// Resolve a selected option into the goal change it stands for
    ///
    /// Regenerates the option set for the event, so an option that is not
    /// currently offered (an excluded redistribution, a mistyped id) fails
    /// with [`EngineError::UnknownOption`]. A successful selection marks
    /// the stored event acknowledged. The engine does not apply the
    /// returned mutation; the caller owns the goal configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownOption`] for ids outside the current
    /// set and [`EngineError::EventNotFound`] when the event reference is
    /// stale.
    pub fn select_option(
        &mut self,
        event: &OvereatingEvent,
        option_id: &str,
        goal: &GoalContext,
        remaining_days_in_week: u32,
    ) -> EngineResult<TargetMutation> {
        let kind: OptionKind = option_id.parse()?;
        let options =
            rebalancing::generate(event, goal, remaining_days_in_week, &self.config.rebalancing)?;
        let selected = options
            .into_iter()
            .find(|option| option.id == kind)
            .ok_or_else(|| EngineError::UnknownOption {
                option_id: option_id.to_owned(),
            })?;

        let mutation = match selected.id {
            OptionKind::RedistributeWeek => TargetMutation::AdjustDailyTarget {
                new_daily_target: selected.impact.new_daily_target,
                days_remaining: remaining_days_in_week,
            },
            OptionKind::ExtendTimeline => TargetMutation::ExtendTimeline {
                additional_days: impact::timeline_delay_days(
                    event.excess_calories,
                    goal.weekly_deficit_target,
                ),
            },
            OptionKind::AcceptContinue => TargetMutation::NoChange,
        };

        // Selecting an option is an acknowledgement; stale references fail
        // here before the caller applies anything.
        self.reconciler.mark_acknowledged(event.date, event.id)?;
        info!(date = %event.date, option = %kind, "rebalancing option selected");
        Ok(mutation)
    }

    /// Mark an event as seen without selecting an option
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventNotFound`] when the reference is stale.
    pub fn acknowledge(&mut self, event: &OvereatingEvent) -> EngineResult<()> {
        self.reconciler.acknowledge(event)
    }
}
