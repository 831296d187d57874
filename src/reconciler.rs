// ABOUTME: Recovery state reconciler keeping per-day events consistent with the meal log
// ABOUTME: Owns the event store, applies create/amend/resolve transitions, and notifies sinks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Setpoint Labs

//! Recovery State Reconciler
//!
//! Meal logs are living documents: entries get added hours later, edited,
//! and deleted. The reconciler is the sole writer of the per-day event
//! store and re-runs classification after every log mutation, so an event
//! always reflects the day's current totals. The surrounding app observes
//! lifecycle transitions through an [`EventSink`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::classify;
use crate::config::ClassifierConfig;
use crate::errors::{EngineError, EngineResult};
use crate::meal_log::DailyTotalsSource;
use crate::models::OvereatingEvent;

/// Persistence callback for event lifecycle transitions
///
/// Invoked exactly once per transition with the event's post-transition
/// state, or `None` when the day's event was resolved. Reconciliation
/// passes that change nothing do not invoke the sink.
pub trait EventSink {
    /// Observe one event transition for `date`
    fn on_event_changed(&mut self, date: NaiveDate, event: Option<&OvereatingEvent>);
}

/// Sink that drops every notification; the default for callers that poll
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_event_changed(&mut self, _date: NaiveDate, _event: Option<&OvereatingEvent>) {}
}

/// What a reconciliation pass did for the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No event existed and the day now qualifies
    Created,
    /// The day's event was recomputed in place
    Amended {
        /// Whether the severity tier moved, resetting acknowledgement
        tier_changed: bool,
    },
    /// The day no longer qualifies and its event was removed
    Resolved,
    /// Nothing to do; the store already matches the log
    Unchanged,
}

/// Per-day overeating events, keyed by date
///
/// Keying by date makes "at most one active event per day" structural.
/// Reads are public; writes stay inside the reconciler.
#[derive(Debug, Default)]
pub struct EventStore {
    events: BTreeMap<NaiveDate, OvereatingEvent>,
}

impl EventStore {
    /// The day's active event, if any
    #[must_use]
    pub fn active_event(&self, date: NaiveDate) -> Option<&OvereatingEvent> {
        self.events.get(&date)
    }

    /// All active events in date order
    pub fn events(&self) -> impl Iterator<Item = &OvereatingEvent> {
        self.events.values()
    }

    /// Number of active events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no day currently has an active event
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Insert an event for a day that must not already have one
    pub(crate) fn insert_new(&mut self, event: OvereatingEvent) -> EngineResult<()> {
        let date = event.date;
        match self.events.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(event);
                Ok(())
            }
            Entry::Occupied(_) => {
                debug_assert!(false, "second active event for {date}");
                Err(EngineError::InvariantViolation {
                    detail: format!("an active overeating event already exists for {date}"),
                })
            }
        }
    }

    pub(crate) fn get_mut(&mut self, date: NaiveDate) -> Option<&mut OvereatingEvent> {
        self.events.get_mut(&date)
    }

    pub(crate) fn remove(&mut self, date: NaiveDate) -> Option<OvereatingEvent> {
        self.events.remove(&date)
    }
}

/// Sole writer of the event store
///
/// Generic over the sink so embedders plug in their persistence layer;
/// [`NoopSink`] serves callers that only poll the store.
#[derive(Debug)]
pub struct Reconciler<K: EventSink = NoopSink> {
    store: EventStore,
    sink: K,
}

impl Reconciler<NoopSink> {
    /// Reconciler with an empty store and no persistence callback
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(NoopSink)
    }
}

impl Default for Reconciler<NoopSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventSink> Reconciler<K> {
    /// Reconciler with an empty store, notifying the given sink
    #[must_use]
    pub fn with_sink(sink: K) -> Self {
        Self {
            store: EventStore::default(),
            sink,
        }
    }

    /// Read access to the event store
    #[must_use]
    pub const fn store(&self) -> &EventStore {
        &self.store
    }

    /// Re-run classification for one day after a meal log mutation
    ///
    /// Pulls the day's totals, classifies them, and applies the single
    /// transition that brings the store in line: create, amend, resolve,
    /// or nothing. Validation failures abort before any store mutation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when the source reports
    /// malformed totals, or [`EngineError::InvariantViolation`] if the
    /// store already holds a conflicting event (a bug, loud by design).
    pub fn on_meal_log_changed(
        &mut self,
        date: NaiveDate,
        source: &impl DailyTotalsSource,
        thresholds: &ClassifierConfig,
    ) -> EngineResult<ReconcileOutcome> {
        let totals = source.daily_totals(date)?;
        let classified = classify(date, totals.consumed, totals.target, thresholds)?;

        match classified {
            None => {
                if self.store.remove(date).is_some() {
                    self.sink.on_event_changed(date, None);
                    info!(date = %date, "overeating event resolved");
                    Ok(ReconcileOutcome::Resolved)
                } else {
                    debug!(date = %date, "no event and no qualifying excess");
                    Ok(ReconcileOutcome::Unchanged)
                }
            }
            Some(fresh) => {
                if let Some(current) = self.store.get_mut(date) {
                    if current.excess_calories == fresh.excess_calories
                        && current.trigger_type == fresh.trigger_type
                        && (current.daily_target - fresh.daily_target).abs() < f64::EPSILON
                    {
                        debug!(date = %date, "event already matches the log");
                        return Ok(ReconcileOutcome::Unchanged);
                    }

                    let tier_changed = current.trigger_type != fresh.trigger_type;
                    current.excess_calories = fresh.excess_calories;
                    current.daily_target = fresh.daily_target;
                    current.trigger_type = fresh.trigger_type;
                    if tier_changed {
                        // The user acknowledged a differently-sized problem
                        current.acknowledged = false;
                    }
                    let snapshot = current.clone();
                    self.sink.on_event_changed(date, Some(&snapshot));
                    info!(
                        date = %date,
                        excess = snapshot.excess_calories,
                        tier = %snapshot.trigger_type,
                        tier_changed,
                        "overeating event amended"
                    );
                    Ok(ReconcileOutcome::Amended { tier_changed })
                } else {
                    let snapshot = fresh.clone();
                    self.store.insert_new(fresh)?;
                    self.sink.on_event_changed(date, Some(&snapshot));
                    info!(
                        date = %date,
                        excess = snapshot.excess_calories,
                        tier = %snapshot.trigger_type,
                        "overeating event created"
                    );
                    Ok(ReconcileOutcome::Created)
                }
            }
        }
    }

    /// Mark the referenced event as seen by the user
    ///
    /// Numeric fields are untouched. Acknowledging an already-acknowledged
    /// event is a no-op and does not notify the sink.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventNotFound`] when no event exists for the
    /// date or the reference's id no longer matches the stored event.
    pub fn acknowledge(&mut self, event: &OvereatingEvent) -> EngineResult<()> {
        self.mark_acknowledged(event.date, event.id)
    }

    pub(crate) fn mark_acknowledged(&mut self, date: NaiveDate, id: Uuid) -> EngineResult<()> {
        let Some(current) = self.store.get_mut(date) else {
            return Err(EngineError::EventNotFound { date });
        };
        if current.id != id {
            return Err(EngineError::EventNotFound { date });
        }
        if !current.acknowledged {
            current.acknowledged = true;
            let snapshot = current.clone();
            self.sink.on_event_changed(date, Some(&snapshot));
            debug!(date = %date, "overeating event acknowledged");
        }
        Ok(())
    }
}
