//! Automation timeline for a single parameter
//!
//! Holds the scheduled events sorted by effective time and applies the
//! insertion, cancellation and compaction rules. Value queries live in
//! [`crate::resolve`].

use crate::curve::{self, time_ge, time_gt};
use crate::error::{check_time, check_value, AutomationError, Result};
use crate::event::AutomationEvent;
use serde::{Deserialize, Serialize};

/// Ordered automation events for one parameter.
///
/// Before the first event, or when empty, the timeline reads as its
/// default value.
///
/// Deserializing rebuilds the timeline event by event, so a stored schedule
/// goes through the same checks as [`Self::add`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TimelineRecord")]
pub struct AutomationTimeline {
    pub(crate) events: Vec<AutomationEvent>,
    pub(crate) default_value: f32,
    /// Stamped onto ramps as their insert time. Advanced by [`Self::flush`].
    pub(crate) current_time: f64,
}

/// Unchecked serialized form of an [`AutomationTimeline`].
#[derive(Deserialize)]
struct TimelineRecord {
    events: Vec<AutomationEvent>,
    default_value: f32,
    #[serde(default)]
    current_time: f64,
}

impl TryFrom<TimelineRecord> for AutomationTimeline {
    type Error = AutomationError;

    fn try_from(record: TimelineRecord) -> Result<Self> {
        let mut timeline = Self::new(check_value("default_value", record.default_value)?);
        let current_time = check_time("current_time", record.current_time)?;

        for event in record.events {
            if event.is_transient() {
                return Err(AutomationError::MalformedState(
                    "stored schedule contains a cancel event",
                ));
            }
            // keep the ramp's original scheduling time
            timeline.current_time = event.insert_time().unwrap_or(0.0);
            if !timeline.add(event)? {
                return Err(AutomationError::MalformedState(
                    "stored schedule contains overlapping events",
                ));
            }
        }

        timeline.current_time = current_time;
        Ok(timeline)
    }
}

/// Something that accepts automation events, e.g. a renderer re-applying a
/// schedule on its own timeline.
pub trait AutomationSink {
    /// Returns `Ok(false)` if the event was rejected as overlapping.
    fn schedule(&mut self, event: AutomationEvent) -> Result<bool>;
}

impl AutomationSink for AutomationTimeline {
    fn schedule(&mut self, event: AutomationEvent) -> Result<bool> {
        self.add(event)
    }
}

impl AutomationTimeline {
    /// Create an empty timeline reading `default_value`
    pub fn new(default_value: f32) -> Self {
        Self {
            events: Vec::new(),
            default_value,
            current_time: 0.0,
        }
    }

    /// Value read before the first event
    #[must_use]
    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Time stamped onto newly scheduled ramps
    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Get number of stored events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if nothing is scheduled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stored events in schedule order.
    pub fn iter(&self) -> std::slice::Iter<'_, AutomationEvent> {
        self.events.iter()
    }

    /// Stored events as a slice
    #[must_use]
    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    /// Re-issue every stored event, in order, against `sink`.
    ///
    /// Returns how many events the sink accepted.
    pub fn replay_onto<S: AutomationSink + ?Sized>(&self, sink: &mut S) -> Result<usize> {
        let mut accepted = 0;
        for event in &self.events {
            if sink.schedule(event.clone())? {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Schedule an event.
    ///
    /// Cancel events are applied and then dropped. Any other event is
    /// inserted in order; `Ok(false)` means it would overlap a value curve
    /// and the timeline was left untouched.
    pub fn add(&mut self, event: AutomationEvent) -> Result<bool> {
        event.validate()?;

        match event {
            AutomationEvent::CancelScheduledValues { cancel_time } => {
                self.cancel_scheduled_values(cancel_time)?;
                Ok(true)
            }
            AutomationEvent::CancelAndHold { cancel_time } => {
                self.cancel_and_hold_at_time(cancel_time)?;
                Ok(true)
            }
            event => Ok(self.insert(event)),
        }
    }

    fn insert(&mut self, mut event: AutomationEvent) -> bool {
        let time = event.effective_time();
        let index = self.first_after(time);

        if let Some(end) = index
            .checked_sub(1)
            .and_then(|previous| self.events[previous].curve_end())
        {
            if time_gt(end, time) {
                log::debug!("rejecting {event}: inside value curve ending at {end}");
                return false;
            }
        }

        if let (Some(end), Some(next)) = (event.curve_end(), self.events.get(index)) {
            if time_gt(end, next.effective_time()) {
                log::debug!("rejecting {event}: curve runs past {next}");
                return false;
            }
        }

        if let AutomationEvent::LinearRamp { insert_time, .. }
        | AutomationEvent::ExponentialRamp { insert_time, .. } = &mut event
        {
            *insert_time = self.current_time;
        }

        log::trace!("scheduling {event} at index {index}");
        self.events.insert(index, event);
        true
    }

    /// Remove every event whose effective time is at or after `cancel_time`.
    pub fn cancel_scheduled_values(&mut self, cancel_time: f64) -> Result<()> {
        check_time("cancel_time", cancel_time)?;

        let index = self.first_at_or_after(cancel_time);
        if index < self.events.len() {
            log::debug!(
                "cancelling {} event(s) from {cancel_time}",
                self.events.len() - index
            );
            self.events.truncate(index);
        }
        Ok(())
    }

    /// Cancel like [`Self::cancel_scheduled_values`], then freeze the value
    /// the timeline had at `cancel_time` so later reads do not jump.
    pub fn cancel_and_hold_at_time(&mut self, cancel_time: f64) -> Result<()> {
        self.check_hold(cancel_time)?;

        let index = self.first_at_or_after(cancel_time);
        let victim = self.events.drain(index..).next();
        let last_index = self.events.len().checked_sub(1);

        let held = match last_index.map(|last| &self.events[last]) {
            Some(AutomationEvent::SetValueCurve {
                values,
                start_time,
                duration,
            }) if time_gt(start_time + duration, cancel_time) => {
                let shortened = shorten_curve(values, *start_time, *duration, cancel_time);
                if let Some(last) = self.events.last_mut() {
                    *last = shortened;
                }
                log::debug!("held value curve at {cancel_time}");
                return Ok(());
            }
            Some(AutomationEvent::SetTarget { .. }) => {
                AutomationEvent::SetValue {
                    value: self.get_value(cancel_time),
                    start_time: cancel_time,
                }
            }
            _ => match victim {
                Some(ramp) if ramp.is_ramp() => self.hold_ramp(&ramp, last_index, cancel_time),
                _ => return Ok(()),
            },
        };

        log::debug!("holding with synthesized {held}");
        self.events.push(held);
        Ok(())
    }

    /// Fails exactly when [`Self::cancel_and_hold_at_time`] would, without
    /// touching the timeline.
    pub fn check_hold(&self, cancel_time: f64) -> Result<()> {
        check_time("cancel_time", cancel_time)?;

        let index = self.first_at_or_after(cancel_time);
        let victim_is_ramp = self.events.get(index).is_some_and(AutomationEvent::is_ramp);
        let last_is_target = index
            .checked_sub(1)
            .is_some_and(|last| matches!(self.events[last], AutomationEvent::SetTarget { .. }));
        if victim_is_ramp && last_is_target {
            return Err(AutomationError::MalformedState(
                "ramp scheduled directly after a set-target event",
            ));
        }
        Ok(())
    }

    /// A ramp of the same kind as `ramp` that ends at `cancel_time` on the
    /// value `ramp` had reached there.
    fn hold_ramp(
        &self,
        ramp: &AutomationEvent,
        last_index: Option<usize>,
        cancel_time: f64,
    ) -> AutomationEvent {
        let (start_time, start_value) = self.ramp_origin(last_index, ramp);

        match ramp {
            AutomationEvent::ExponentialRamp {
                value, end_time, ..
            } => AutomationEvent::ExponentialRamp {
                value: curve::exponential_ramp(
                    cancel_time,
                    start_time,
                    start_value,
                    *end_time,
                    *value,
                ),
                end_time: cancel_time,
                insert_time: self.current_time,
            },
            AutomationEvent::LinearRamp {
                value, end_time, ..
            } => AutomationEvent::LinearRamp {
                value: curve::linear_ramp(cancel_time, start_time, start_value, *end_time, *value),
                end_time: cancel_time,
                insert_time: self.current_time,
            },
            other => other.clone(),
        }
    }

    /// Drop events that can no longer affect values at or after `time`.
    ///
    /// Reads at any `t >= time` are unchanged. Also advances the timeline's
    /// notion of "now" to `time`.
    pub fn flush(&mut self, time: f64) -> Result<()> {
        check_time("time", time)?;

        let index = self.first_after(time);
        if index > 1 {
            let keep_from = index - 1;
            let anchor = match &self.events[keep_from] {
                AutomationEvent::SetTarget { start_time, .. } => Some(AutomationEvent::SetValue {
                    value: self.value_at_index(keep_from.checked_sub(1), *start_time),
                    start_time: *start_time,
                }),
                _ => None,
            };

            self.events.drain(..keep_from);
            if let Some(anchor) = anchor {
                self.events.insert(0, anchor);
            }
            log::debug!("flushed {keep_from} event(s) before {time}");
        }

        self.current_time = self.current_time.max(time);
        Ok(())
    }

    /// Index of the first event whose effective time is later than `time`.
    pub(crate) fn first_after(&self, time: f64) -> usize {
        self.events
            .partition_point(|event| !time_gt(event.effective_time(), time))
    }

    /// Index of the first event whose effective time is at or after `time`.
    pub(crate) fn first_at_or_after(&self, time: f64) -> usize {
        self.events
            .partition_point(|event| !time_ge(event.effective_time(), time))
    }
}

impl<'a> IntoIterator for &'a AutomationTimeline {
    type Item = &'a AutomationEvent;
    type IntoIter = std::slice::Iter<'a, AutomationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Resample a value curve so it ends at `cancel_time`, reproducing the
/// original curve's values at the new sample positions.
fn shorten_curve(values: &[f32], start_time: f64, duration: f64, cancel_time: f64) -> AutomationEvent {
    let new_duration = cancel_time - start_time;
    let ratio = (values.len() - 1) as f64 / duration;
    let length = (1 + (new_duration * ratio).ceil() as usize).max(2);
    let step = new_duration / (length - 1) as f64;

    let resampled = (0..length)
        .map(|i| {
            let time = if i == length - 1 {
                cancel_time
            } else {
                start_time + step * i as f64
            };
            curve::value_curve(time, start_time, duration, values)
        })
        .collect();

    AutomationEvent::SetValueCurve {
        values: resampled,
        start_time,
        duration: new_duration,
    }
}
