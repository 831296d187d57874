// ABOUTME: End-to-end tests driving the recovery engine through a live meal log
// ABOUTME: Covers detection, planning, option selection, and meal edit reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Weekday;
use common::{goal_context, init_test_logging, june, meal, RecordingSink};
use setpoint_engine::config::EngineConfig;
use setpoint_engine::engine::RecoveryEngine;
use setpoint_engine::errors::EngineError;
use setpoint_engine::meal_log::MealLog;
use setpoint_engine::models::{remaining_days_in_week, OptionKind, TargetMutation, TriggerType};
use setpoint_engine::reconciler::ReconcileOutcome;

/// Two quiet days, then a heavy Wednesday (2025-06-04)
fn week_so_far() -> MealLog {
    let mut log = MealLog::new(2000.0).unwrap();
    log.add_meal(meal(june(2), "meal prep", 1900.0)).unwrap();
    log.add_meal(meal(june(3), "meal prep", 1850.0)).unwrap();
    log.add_meal(meal(june(4), "breakfast", 500.0)).unwrap();
    log.add_meal(meal(june(4), "lunch", 700.0)).unwrap();
    log.add_meal(meal(june(4), "birthday dinner", 1400.0)).unwrap();
    log
}

// Full flow: detect, plan, select, apply

#[test]
fn test_full_recovery_flow_with_redistribution() {
    init_test_logging();
    let mut log = week_so_far();
    let mut engine = RecoveryEngine::default();

    let outcome = engine.on_meal_log_changed(june(4), &log).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Created);
    let event = engine.active_event(june(4)).unwrap().clone();
    assert_eq!(event.excess_calories, 600);
    assert_eq!(event.trigger_type, TriggerType::Moderate);

    // Wednesday leaves four days in an ISO week
    let remaining = remaining_days_in_week(june(4), Weekday::Mon);
    assert_eq!(remaining, 4);
    let streak = log.on_target_streak(june(4));
    assert_eq!(streak, 2);

    let plan = engine
        .recovery_plan(&event, &goal_context(), remaining, streak)
        .unwrap();
    // ceil(600 / 4) = 150 kcal trimmed per day
    let redistribute = &plan.rebalancing_options[0];
    assert_eq!(redistribute.id, OptionKind::RedistributeWeek);
    assert!((redistribute.impact.new_daily_target - 1850.0).abs() < f64::EPSILON);

    let mutation = engine
        .select_option(&event, "redistribute-week", &goal_context(), remaining)
        .unwrap();
    let TargetMutation::AdjustDailyTarget {
        new_daily_target,
        days_remaining,
    } = mutation
    else {
        panic!("expected a daily target adjustment, got {mutation:?}");
    };
    assert!((new_daily_target - 1850.0).abs() < f64::EPSILON);
    assert_eq!(days_remaining, 4);
    assert!(engine.active_event(june(4)).unwrap().acknowledged);

    // The caller owns the goal state; applying the mutation is a log edit
    for day in 5..=8 {
        log.set_daily_target(june(day), new_daily_target).unwrap();
    }
    assert!((log.target_for(june(5)) - 1850.0).abs() < f64::EPSILON);
    assert!((log.target_for(june(9)) - 2000.0).abs() < f64::EPSILON);
}

#[test]
fn test_selecting_extension_quotes_the_analysis_delay() {
    let log = week_so_far();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    let event = engine.active_event(june(4)).unwrap().clone();

    let plan = engine
        .recovery_plan(&event, &goal_context(), 4, 0)
        .unwrap();
    let mutation = engine
        .select_option(&event, "extend-timeline", &goal_context(), 4)
        .unwrap();

    // The mutation carries the same figure the impact analysis showed
    assert_eq!(
        mutation,
        TargetMutation::ExtendTimeline {
            additional_days: plan.impact.real_impact.timeline_delay_days,
        }
    );
}

#[test]
fn test_accepting_changes_nothing_but_acknowledges() {
    let log = week_so_far();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    let event = engine.active_event(june(4)).unwrap().clone();

    let mutation = engine
        .select_option(&event, "accept-continue", &goal_context(), 4)
        .unwrap();
    assert_eq!(mutation, TargetMutation::NoChange);
    assert!(engine.active_event(june(4)).unwrap().acknowledged);
}

// Option availability

#[test]
fn test_excluded_option_cannot_be_selected() {
    let mut log = MealLog::new(2000.0).unwrap();
    // Sunday 2025-06-08 closes the ISO week: no days left to redistribute
    log.add_meal(meal(june(8), "sunday roast", 2600.0)).unwrap();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(8), &log).unwrap();
    let event = engine.active_event(june(8)).unwrap().clone();

    let remaining = remaining_days_in_week(june(8), Weekday::Mon);
    assert_eq!(remaining, 0);

    let err = engine
        .select_option(&event, "redistribute-week", &goal_context(), remaining)
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownOption { .. }));
    // The failed selection must not acknowledge anything
    assert!(!engine.active_event(june(8)).unwrap().acknowledged);
}

#[test]
fn test_unknown_option_id_is_rejected() {
    let log = week_so_far();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    let event = engine.active_event(june(4)).unwrap().clone();

    let err = engine
        .select_option(&event, "crash-diet", &goal_context(), 4)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnknownOption { option_id } if option_id == "crash-diet"
    ));
}

#[test]
fn test_selection_against_a_stale_event_fails() {
    let mut log = week_so_far();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    let stale = engine.active_event(june(4)).unwrap().clone();

    // The day empties out before the user picks an option
    let ids: Vec<_> = log.meals_on(june(4)).iter().map(|m| m.id).collect();
    for id in ids {
        log.remove_meal(id).unwrap();
    }
    let outcome = engine.on_meal_log_changed(june(4), &log).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Resolved);

    let err = engine
        .select_option(&stale, "accept-continue", &goal_context(), 4)
        .unwrap_err();
    assert!(matches!(err, EngineError::EventNotFound { .. }));
}

// Meal edits and reconciliation

#[test]
fn test_meal_moved_across_days_reconciles_both() {
    let mut log = MealLog::new(2000.0).unwrap();
    let dinner = meal(june(4), "team dinner", 2700.0);
    let dinner_id = dinner.id;
    log.add_meal(dinner).unwrap();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    assert!(engine.active_event(june(4)).is_some());

    // The dinner was logged on the wrong day
    let mut corrected = meal(june(5), "team dinner", 2700.0);
    corrected.id = dinner_id;
    let (old_date, new_date) = log.update_meal(corrected).unwrap();

    let outcome = engine.on_meal_log_changed(old_date, &log).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Resolved);
    let outcome = engine.on_meal_log_changed(new_date, &log).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Created);

    let dates: Vec<_> = engine.active_events().map(|e| e.date).collect();
    assert_eq!(dates, vec![june(5)]);
}

#[test]
fn test_streak_before_the_event_feeds_the_reminder() {
    let mut log = MealLog::new(2000.0).unwrap();
    for day in 1..=3 {
        log.add_meal(meal(june(day), "on plan", 1800.0)).unwrap();
    }
    log.add_meal(meal(june(4), "celebration", 2600.0)).unwrap();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    let event = engine.active_event(june(4)).unwrap().clone();

    // Three on-target days meet the default reminder threshold
    let streak = log.on_target_streak(june(4));
    assert_eq!(streak, 3);
    let plan = engine
        .recovery_plan(&event, &goal_context(), 4, streak)
        .unwrap();
    let reminder = plan.impact.reframe.success_reminder.unwrap();
    assert!(reminder.contains("3 days"));
}

// Tight tolerance profiles

#[test]
fn test_zero_tolerance_profile_plans_every_event_it_stores() {
    let mut config = EngineConfig::default();
    config.classifier.min_excess_threshold = 0.0;
    config.validate().unwrap();

    let mut log = MealLog::new(2000.0).unwrap();
    log.add_meal(meal(june(4), "dinner", 2000.3)).unwrap();
    let mut engine = RecoveryEngine::new(config);

    // A 0.3 kcal overshoot rounds to zero whole kcal: nothing to track
    let outcome = engine.on_meal_log_changed(june(4), &log).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Unchanged);
    assert!(engine.active_event(june(4)).is_none());

    // One more bite tips the day past a whole kilocalorie
    log.add_meal(meal(june(4), "mint", 0.7)).unwrap();
    let outcome = engine.on_meal_log_changed(june(4), &log).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Created);
    let event = engine.active_event(june(4)).unwrap().clone();
    assert_eq!(event.excess_calories, 1);

    // Whatever the engine stores, it can plan
    let plan = engine
        .recovery_plan(&event, &goal_context(), 4, 0)
        .unwrap();
    let redistribute = &plan.rebalancing_options[0];
    assert_eq!(redistribute.id, OptionKind::RedistributeWeek);
    assert!((redistribute.impact.new_daily_target - 1999.0).abs() < f64::EPSILON);
}

// Sink notifications across the flow

#[test]
fn test_sink_sees_creation_and_acknowledgement() {
    let log = week_so_far();
    let sink = RecordingSink::new();
    let mut engine = RecoveryEngine::with_sink(EngineConfig::default(), sink.clone());

    engine.on_meal_log_changed(june(4), &log).unwrap();
    assert_eq!(sink.count(), 1);
    let (_, created) = sink.last().unwrap();
    assert!(!created.unwrap().acknowledged);

    let event = engine.active_event(june(4)).unwrap().clone();
    engine
        .select_option(&event, "accept-continue", &goal_context(), 4)
        .unwrap();
    assert_eq!(sink.count(), 2);
    let (date, acknowledged) = sink.last().unwrap();
    assert_eq!(date, june(4));
    assert!(acknowledged.unwrap().acknowledged);
}

#[test]
fn test_quiet_days_never_notify_the_sink() {
    let mut log = MealLog::new(2000.0).unwrap();
    log.add_meal(meal(june(2), "lunch", 1200.0)).unwrap();
    let sink = RecordingSink::new();
    let mut engine = RecoveryEngine::with_sink(EngineConfig::default(), sink.clone());

    engine.on_meal_log_changed(june(2), &log).unwrap();
    engine.on_meal_log_changed(june(3), &log).unwrap();
    assert_eq!(sink.count(), 0);
}

// Multi-day state

#[test]
fn test_active_events_come_back_in_date_order() {
    let mut log = MealLog::new(2000.0).unwrap();
    log.add_meal(meal(june(7), "feast", 2700.0)).unwrap();
    log.add_meal(meal(june(4), "feast", 2600.0)).unwrap();
    let mut engine = RecoveryEngine::default();

    // Reconciled out of order; reads stay date-ordered
    engine.on_meal_log_changed(june(7), &log).unwrap();
    engine.on_meal_log_changed(june(4), &log).unwrap();

    let dates: Vec<_> = engine.active_events().map(|e| e.date).collect();
    assert_eq!(dates, vec![june(4), june(7)]);
}

#[test]
fn test_acknowledge_without_selection() {
    let log = week_so_far();
    let mut engine = RecoveryEngine::default();
    engine.on_meal_log_changed(june(4), &log).unwrap();
    let event = engine.active_event(june(4)).unwrap().clone();

    // Dismissing the banner counts as seen, with no goal change
    engine.acknowledge(&event).unwrap();
    assert!(engine.active_event(june(4)).unwrap().acknowledged);
}
