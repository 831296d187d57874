// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides logging setup, goal snapshots, meal builders, and a recording sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs
#![allow(
    dead_code,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::must_use_candidate,
    clippy::missing_panics_doc
)]
//! Shared test utilities for `setpoint_engine`
//!
//! Common fixtures to reduce duplication across integration tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use chrono::NaiveDate;
use setpoint_engine::models::{GoalContext, MealEntry, OvereatingEvent};
use setpoint_engine::reconciler::EventSink;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; default keeps test output quiet
        let log_level = match std::env::var("TEST_LOG") {
            Ok(level) => match level.as_str() {
                "TRACE" => tracing::Level::TRACE,
                "DEBUG" => tracing::Level::DEBUG,
                "INFO" => tracing::Level::INFO,
                _ => tracing::Level::WARN,
            },
            Err(_) => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Date helper for the fixed test month (June 2025; the 1st is a Sunday)
pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

/// Standard goal snapshot: 3500 kcal/week over 16 weeks, 400 kcal workouts
pub fn goal_context() -> GoalContext {
    GoalContext {
        weekly_deficit_target: 3500.0,
        total_program_weeks: 16,
        days_elapsed: 28,
        workout_equivalent_calories: 400.0,
        safe_minimum_calories: 1500.0,
    }
}

/// Meal entry builder
pub fn meal(date: NaiveDate, name: &str, calories: f64) -> MealEntry {
    MealEntry::new(date, name, calories)
}

/// One sink notification: the day and the event's post-transition state
pub type Notification = (NaiveDate, Option<OvereatingEvent>);

/// Event sink that records every notification for later assertions
///
/// Clones share the same backing store, so tests keep one handle and move
/// the other into the engine.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    changes: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(date, event)` notification seen so far, in order
    pub fn changes(&self) -> Vec<Notification> {
        self.changes.borrow().clone()
    }

    /// Number of notifications seen
    pub fn count(&self) -> usize {
        self.changes.borrow().len()
    }

    /// The most recent notification, if any
    pub fn last(&self) -> Option<Notification> {
        self.changes.borrow().last().cloned()
    }
}

impl EventSink for RecordingSink {
    fn on_event_changed(&mut self, date: NaiveDate, event: Option<&OvereatingEvent>) {
        self.changes.borrow_mut().push((date, event.cloned()));
    }
}
