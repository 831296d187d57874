// ABOUTME: Calorie log access trait and an in-memory meal log implementation
// ABOUTME: Aggregates meal entries into daily totals and tracks on-target streaks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Meal Log
//!
//! The engine never owns the user's food diary; it pulls one day's totals at
//! a time through [`DailyTotalsSource`]. [`MealLog`] is the bundled
//! in-memory implementation used by the app shell and the test suites:
//! plain CRUD over meal entries, per-day target overrides, and the
//! on-target streak that feeds the impact analyzer's success reminder.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::models::{DailyTotals, MealEntry};

/// Read access to one day's consumed calories and target
///
/// Implementations must answer for any date: a day with nothing logged
/// reports zero consumed against that day's target.
pub trait DailyTotalsSource {
    /// Totals for the given day
    ///
    /// # Errors
    ///
    /// Implementations return an error when the underlying log cannot
    /// produce well-formed totals for the day.
    fn daily_totals(&self, date: NaiveDate) -> EngineResult<DailyTotals>;
}

/// In-memory meal log with per-day calorie targets
#[derive(Debug, Clone)]
pub struct MealLog {
    default_target: f64,
    targets: BTreeMap<NaiveDate, f64>,
    meals_by_day: BTreeMap<NaiveDate, Vec<MealEntry>>,
}

impl MealLog {
    /// Create an empty log with the given default daily target
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when the target is not a
    /// positive finite number.
    pub fn new(default_daily_target: f64) -> EngineResult<Self> {
        validate_target(default_daily_target)?;
        Ok(Self {
            default_target: default_daily_target,
            targets: BTreeMap::new(),
            meals_by_day: BTreeMap::new(),
        })
    }

    /// Override the calorie target for one day
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when the target is not a
    /// positive finite number.
    pub fn set_daily_target(&mut self, date: NaiveDate, target: f64) -> EngineResult<()> {
        validate_target(target)?;
        self.targets.insert(date, target);
        Ok(())
    }

    /// The calorie target in effect for one day
    #[must_use]
    pub fn target_for(&self, date: NaiveDate) -> f64 {
        self.targets.get(&date).copied().unwrap_or(self.default_target)
    }

    /// Add a meal entry; returns the day it counts toward
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for non-finite or negative
    /// calories or an empty name, and [`EngineError::InvariantViolation`]
    /// when an entry with the same id is already logged.
    pub fn add_meal(&mut self, meal: MealEntry) -> EngineResult<NaiveDate> {
        validate_meal(&meal)?;
        if self.find_meal(meal.id).is_some() {
            return Err(EngineError::InvariantViolation {
                detail: format!("meal entry {} is already logged", meal.id),
            });
        }
        let date = meal.date;
        self.meals_by_day.entry(date).or_default().push(meal);
        Ok(date)
    }

    /// Replace a logged entry with an updated version carrying the same id
    ///
    /// Returns the days touched by the edit: `(old_date, new_date)`. The
    /// two differ when the edit moved the meal to another day, and both
    /// need reconciling.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MealNotFound`] when no entry carries the id,
    /// or [`EngineError::Validation`] when the updated entry is malformed.
    pub fn update_meal(&mut self, updated: MealEntry) -> EngineResult<(NaiveDate, NaiveDate)> {
        validate_meal(&updated)?;
        let old_date = self
            .find_meal(updated.id)
            .ok_or(EngineError::MealNotFound { id: updated.id })?;
        let new_date = updated.date;

        self.take_meal(old_date, updated.id);
        self.meals_by_day.entry(new_date).or_default().push(updated);
        Ok((old_date, new_date))
    }

    /// Delete a logged entry; returns the day it was removed from
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MealNotFound`] when no entry carries the id.
    pub fn remove_meal(&mut self, id: Uuid) -> EngineResult<NaiveDate> {
        let date = self
            .find_meal(id)
            .ok_or(EngineError::MealNotFound { id })?;
        self.take_meal(date, id);
        Ok(date)
    }

    /// Meals logged on one day, in insertion order
    #[must_use]
    pub fn meals_on(&self, date: NaiveDate) -> &[MealEntry] {
        self.meals_by_day.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Total number of logged entries
    #[must_use]
    pub fn meal_count(&self) -> usize {
        self.meals_by_day.values().map(Vec::len).sum()
    }

    /// Consecutive on-target days immediately before `date`
    ///
    /// A day counts when it has at least one logged meal and its consumed
    /// total does not exceed its target. The walk stops at the first gap
    /// or over-target day.
    #[must_use]
    pub fn on_target_streak(&self, date: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = date.pred_opt();
        while let Some(d) = day {
            let consumed = match self.meals_by_day.get(&d) {
                Some(meals) if !meals.is_empty() => {
                    meals.iter().map(|meal| meal.calories).sum::<f64>()
                }
                _ => break,
            };
            if consumed > self.target_for(d) {
                break;
            }
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }

    /// Day a meal id is currently logged under
    fn find_meal(&self, id: Uuid) -> Option<NaiveDate> {
        self.meals_by_day
            .iter()
            .find(|(_, meals)| meals.iter().any(|meal| meal.id == id))
            .map(|(date, _)| *date)
    }

    /// Remove an entry from a day, dropping the day once empty
    fn take_meal(&mut self, date: NaiveDate, id: Uuid) {
        if let Some(meals) = self.meals_by_day.get_mut(&date) {
            meals.retain(|meal| meal.id != id);
            if meals.is_empty() {
                self.meals_by_day.remove(&date);
            }
        }
    }
}

impl DailyTotalsSource for MealLog {
    fn daily_totals(&self, date: NaiveDate) -> EngineResult<DailyTotals> {
        let consumed = self
            .meals_on(date)
            .iter()
            .map(|meal| meal.calories)
            .sum::<f64>();
        Ok(DailyTotals {
            date,
            consumed,
            target: self.target_for(date),
        })
    }
}

fn validate_target(target: f64) -> EngineResult<()> {
    if !target.is_finite() || target <= 0.0 {
        return Err(EngineError::validation(
            "daily_target",
            format!("must be a positive number, got {target}"),
        ));
    }
    Ok(())
}

fn validate_meal(meal: &MealEntry) -> EngineResult<()> {
    if !meal.calories.is_finite() || meal.calories < 0.0 {
        return Err(EngineError::validation(
            "calories",
            format!("must be a non-negative number, got {}", meal.calories),
        ));
    }
    if meal.name.trim().is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    Ok(())
}
