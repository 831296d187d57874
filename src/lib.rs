// ABOUTME: Main library entry point for the Setpoint recovery engine
// ABOUTME: Detects overeating events and plans guilt-free recovery from meal log data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

// Crate-level attributes:
// - deny(unsafe_code): the engine is pure computation over owned data and
//   has no reason to ever reach for unsafe
#![deny(unsafe_code)]

//! # Setpoint Recovery Engine
//!
//! Overeating detection and recovery planning for the Setpoint calorie
//! tracker. When a day's logged calories exceed its target, the engine
//! classifies the day, quantifies the honest impact on the user's goal, and
//! offers a small ranked set of recovery options. The framing is
//! deliberately non-punitive: perspective first, then a plan.
//!
//! ## Architecture
//!
//! The engine is a pure, synchronous library behind a narrow facade:
//!
//! - **Classifier**: turns one day's totals into an overeating event tier
//! - **Impact**: timeline delay, weekly impact, and relatable equivalents
//! - **Rebalancing**: the canonical redistribute / extend / accept options
//! - **Reconciler**: keeps per-day events consistent with meal log edits
//! - **Engine**: the facade the app shell calls
//!
//! The meal log and goal configuration live outside the engine; totals are
//! pulled through [`meal_log::DailyTotalsSource`] and goal state arrives as
//! [`models::GoalContext`] snapshots.
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use setpoint_engine::config::EngineConfig;
//! use setpoint_engine::engine::RecoveryEngine;
//! use setpoint_engine::errors::EngineResult;
//! use setpoint_engine::meal_log::MealLog;
//! use setpoint_engine::models::MealEntry;
//!
//! fn main() -> EngineResult<()> {
//!     let mut log = MealLog::new(2000.0)?;
//!     let mut engine = RecoveryEngine::new(EngineConfig::load()?);
//!
//!     let day = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
//!     let date = log.add_meal(MealEntry::new(day, "birthday dinner", 2600.0))?;
//!     engine.on_meal_log_changed(date, &log)?;
//!
//!     if let Some(event) = engine.active_event(day) {
//!         println!("excess: {} kcal ({})", event.excess_calories, event.trigger_type);
//!     }
//!     Ok(())
//! }
//! ```

/// Trigger classifier turning daily totals into overeating events
pub mod classifier;

/// Engine configuration with environment overrides and validation
pub mod config;

/// Recovery engine facade exposed to the app shell
pub mod engine;

/// Error types for recovery engine operations
pub mod errors;

/// Impact analyzer for honest, non-judgmental event costing
pub mod impact;

/// Production logging and structured output
pub mod logging;

/// Calorie log access trait and in-memory meal log
pub mod meal_log;

/// Common data models for events, plans, and options
pub mod models;

/// Rebalancing option generator with effort and risk tagging
pub mod rebalancing;

/// Recovery state reconciler keeping events consistent with the log
pub mod reconciler;
