//! Value resolution
//!
//! Answers "what is the parameter's value at time `t`" from the events on an
//! [`AutomationTimeline`].

use crate::curve::{self, time_gt};
use crate::event::AutomationEvent;
use crate::timeline::AutomationTimeline;

impl AutomationTimeline {
    /// Value of the parameter at `time`.
    #[must_use]
    pub fn get_value(&self, time: f64) -> f32 {
        if self.events.is_empty() {
            return self.default_value;
        }

        let next_index = self.first_after(time);
        let next = self.events.get(next_index);
        let current_index = next_index.checked_sub(1);
        let current = current_index.map(|index| &self.events[index]);
        let next_is_ramp = next.is_some_and(AutomationEvent::is_ramp);

        match current {
            Some(AutomationEvent::SetTarget {
                target,
                start_time,
                time_constant,
            }) if !next_is_ramp
                || next
                    .and_then(AutomationEvent::insert_time)
                    .is_some_and(|inserted| time_gt(inserted, time)) =>
            {
                let start_value =
                    self.value_at_index(current_index.and_then(|i| i.checked_sub(1)), *start_time);
                return curve::set_target(time, *start_time, start_value, *target, *time_constant);
            }
            Some(AutomationEvent::SetValue { value, .. }) if !next_is_ramp => return *value,
            Some(AutomationEvent::SetValueCurve {
                values,
                start_time,
                duration,
            }) if !next_is_ramp || start_time + duration > time => {
                return curve::value_curve(time, *start_time, *duration, values);
            }
            Some(
                AutomationEvent::LinearRamp { value, .. }
                | AutomationEvent::ExponentialRamp { value, .. },
            ) if !next_is_ramp => return *value,
            _ => {}
        }

        let Some(ramp) = next.filter(|event| event.is_ramp()) else {
            return self.default_value;
        };

        let (start_time, start_value) = self.ramp_origin(current_index, ramp);
        if time <= start_time {
            return start_value;
        }

        match ramp {
            AutomationEvent::LinearRamp {
                value, end_time, ..
            } => curve::linear_ramp(time, start_time, start_value, *end_time, *value),
            AutomationEvent::ExponentialRamp {
                value, end_time, ..
            } => curve::exponential_ramp(time, start_time, start_value, *end_time, *value),
            _ => self.default_value,
        }
    }

    /// Settled value of the event at `index`, evaluated at `time` for events
    /// that never settle (set-target). `None` reads as the default value.
    pub(crate) fn value_at_index(&self, index: Option<usize>, time: f64) -> f32 {
        let Some((index, event)) = index.and_then(|i| self.events.get(i).map(|e| (i, e))) else {
            return self.default_value;
        };

        match event {
            AutomationEvent::SetValue { value, .. }
            | AutomationEvent::LinearRamp { value, .. }
            | AutomationEvent::ExponentialRamp { value, .. } => *value,
            AutomationEvent::SetValueCurve { values, .. } => {
                values.last().copied().unwrap_or(self.default_value)
            }
            AutomationEvent::SetTarget {
                target,
                start_time,
                time_constant,
            } => {
                let start_value = self.value_at_index(index.checked_sub(1), *start_time);
                curve::set_target(time, *start_time, start_value, *target, *time_constant)
            }
            // never stored
            AutomationEvent::CancelScheduledValues { .. } | AutomationEvent::CancelAndHold { .. } => {
                self.default_value
            }
        }
    }

    /// Where a ramp that follows the event at `index` starts from.
    ///
    /// A ramp with nothing before it starts at its own insert time from the
    /// default value.
    pub(crate) fn ramp_origin(&self, index: Option<usize>, ramp: &AutomationEvent) -> (f64, f32) {
        let Some((index, event)) = index.and_then(|i| self.events.get(i).map(|e| (i, e))) else {
            return (ramp.insert_time().unwrap_or(0.0), self.default_value);
        };

        match event {
            AutomationEvent::LinearRamp {
                value, end_time, ..
            }
            | AutomationEvent::ExponentialRamp {
                value, end_time, ..
            } => (*end_time, *value),
            AutomationEvent::SetValue { value, start_time } => (*start_time, *value),
            AutomationEvent::SetValueCurve {
                values,
                start_time,
                duration,
            } => (
                start_time + duration,
                values.last().copied().unwrap_or(self.default_value),
            ),
            AutomationEvent::SetTarget { start_time, .. } => (
                *start_time,
                self.value_at_index(index.checked_sub(1), *start_time),
            ),
            AutomationEvent::CancelScheduledValues { cancel_time }
            | AutomationEvent::CancelAndHold { cancel_time } => (*cancel_time, self.default_value),
        }
    }

    /// Sample the timeline at `sample_rate`, starting at `start_time`.
    pub fn iter_values(&self, start_time: f64, sample_rate: f64, count: usize) -> SampleIterator<'_> {
        SampleIterator {
            timeline: self,
            start_time,
            sample_rate,
            current_sample: 0,
            total_samples: count,
        }
    }

    /// Write one value per sample frame into `buffer`.
    pub fn fill_buffer(&self, buffer: &mut [f32], start_time: f64, sample_rate: f64) {
        for (frame, slot) in buffer.iter_mut().enumerate() {
            *slot = self.get_value(start_time + frame as f64 / sample_rate);
        }
    }
}

/// Iterator over sampled timeline values
#[derive(Debug, Clone)]
pub struct SampleIterator<'a> {
    timeline: &'a AutomationTimeline,
    start_time: f64,
    sample_rate: f64,
    current_sample: usize,
    total_samples: usize,
}

impl<'a> Iterator for SampleIterator<'a> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_sample >= self.total_samples {
            return None;
        }

        let time = self.start_time + self.current_sample as f64 / self.sample_rate;
        self.current_sample += 1;

        Some(self.timeline.get_value(time))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_samples - self.current_sample;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for SampleIterator<'a> {}
