//! Scheduling entry points for a single automated parameter
//!
//! [`ScheduledParam`] pairs a [`ParamDescriptor`] with its
//! [`AutomationTimeline`] and exposes "ramp to X by time Y" style calls that
//! validate their arguments before touching the schedule.

use crate::error::{AutomationError, Result};
use crate::event::AutomationEvent;
use crate::timeline::{AutomationSink, AutomationTimeline};
use serde::{Deserialize, Serialize};

/// Static description of an automatable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamDescriptor {
    /// Identifier, also the key inside a clip
    pub name: String,
    /// Value before any automation
    pub default_value: f32,
    /// Lower clamp bound for reads
    pub min_value: f32,
    /// Upper clamp bound for reads
    pub max_value: f32,
}

impl Default for ParamDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_value: 0.0,
            min_value: f32::MIN,
            max_value: f32::MAX,
        }
    }
}

impl ParamDescriptor {
    /// Unbounded parameter
    pub fn new(name: impl Into<String>, default_value: f32) -> Self {
        Self {
            name: name.into(),
            default_value,
            ..Self::default()
        }
    }

    /// Set value range constraint
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }
}

/// A parameter together with its automation schedule.
#[derive(Debug, Clone)]
pub struct ScheduledParam {
    descriptor: ParamDescriptor,
    timeline: AutomationTimeline,
}

impl ScheduledParam {
    /// Create a new parameter with an empty schedule
    pub fn new(descriptor: ParamDescriptor) -> Self {
        let timeline = AutomationTimeline::new(descriptor.default_value);
        Self {
            descriptor,
            timeline,
        }
    }

    /// Get the parameter's descriptor
    #[must_use]
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }

    /// Get the underlying timeline
    #[must_use]
    pub fn timeline(&self) -> &AutomationTimeline {
        &self.timeline
    }

    /// Get the parameter name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Jump to `value` at `start_time`
    pub fn set_value_at_time(&mut self, value: f32, start_time: f64) -> Result<&mut Self> {
        self.push(AutomationEvent::set_value(value, start_time)?)
    }

    /// Ramp linearly to `value`, reaching it at `end_time`
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) -> Result<&mut Self> {
        self.push(AutomationEvent::linear_ramp(value, end_time)?)
    }

    /// Ramp exponentially to `value`, reaching it at `end_time`
    pub fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        end_time: f64,
    ) -> Result<&mut Self> {
        self.push(AutomationEvent::exponential_ramp(value, end_time)?)
    }

    /// Approach `target` from `start_time` with the given time constant
    pub fn set_target_at_time(
        &mut self,
        target: f32,
        start_time: f64,
        time_constant: f64,
    ) -> Result<&mut Self> {
        self.push(AutomationEvent::set_target(target, start_time, time_constant)?)
    }

    /// Follow `values` spread evenly over `duration` from `start_time`
    pub fn set_value_curve_at_time(
        &mut self,
        values: &[f32],
        start_time: f64,
        duration: f64,
    ) -> Result<&mut Self> {
        self.push(AutomationEvent::set_value_curve(values, start_time, duration)?)
    }

    /// See [`AutomationTimeline::cancel_scheduled_values`]
    pub fn cancel_scheduled_values(&mut self, cancel_time: f64) -> Result<&mut Self> {
        self.timeline.cancel_scheduled_values(cancel_time)?;
        Ok(self)
    }

    /// See [`AutomationTimeline::cancel_and_hold_at_time`]
    pub fn cancel_and_hold_at_time(&mut self, cancel_time: f64) -> Result<&mut Self> {
        self.timeline.cancel_and_hold_at_time(cancel_time)?;
        Ok(self)
    }

    /// See [`AutomationTimeline::flush`]
    pub fn flush(&mut self, time: f64) -> Result<&mut Self> {
        self.timeline.flush(time)?;
        Ok(self)
    }

    /// Scheduled value at `time`, clamped to the descriptor's range.
    #[must_use]
    pub fn value_at(&self, time: f64) -> f32 {
        self.timeline
            .get_value(time)
            .clamp(self.descriptor.min_value, self.descriptor.max_value)
    }

    /// The stored schedule, in order, for replay elsewhere.
    pub fn events(&self) -> std::slice::Iter<'_, AutomationEvent> {
        self.timeline.iter()
    }

    fn push(&mut self, event: AutomationEvent) -> Result<&mut Self> {
        let time = event.effective_time();
        if self.timeline.add(event)? {
            Ok(self)
        } else {
            Err(AutomationError::OverlapRejected { time })
        }
    }
}

impl AutomationSink for ScheduledParam {
    fn schedule(&mut self, event: AutomationEvent) -> Result<bool> {
        self.timeline.add(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn gain() -> ScheduledParam {
        ScheduledParam::new(ParamDescriptor::new("gain", 1.0).with_range(0.0, 2.0))
    }

    #[test]
    fn test_default_value() {
        let param = gain();
        assert_eq!(param.name(), "gain");
        assert_eq!(param.value_at(0.0), 1.0);
        assert!(param.timeline().is_empty());
    }

    #[test]
    fn test_chained_scheduling() {
        let mut param = gain();
        param
            .set_value_at_time(0.0, 0.0)
            .unwrap()
            .linear_ramp_to_value_at_time(1.0, 1.0)
            .unwrap()
            .set_target_at_time(0.5, 2.0, 0.1)
            .unwrap();

        assert_eq!(param.timeline().len(), 3);
        assert!(approx_eq!(f32, param.value_at(0.5), 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, param.value_at(10.0), 0.5, epsilon = 1e-6));
    }

    #[test]
    fn test_value_is_clamped() {
        let mut param = gain();
        param.set_value_at_time(5.0, 0.0).unwrap();
        param.set_value_at_time(-3.0, 1.0).unwrap();

        assert_eq!(param.value_at(0.5), 2.0);
        assert_eq!(param.value_at(1.5), 0.0);
        assert_eq!(param.timeline().get_value(0.5), 5.0);
    }

    #[test]
    fn test_invalid_arguments_leave_schedule_untouched() {
        let mut param = gain();
        assert!(matches!(
            param.set_value_at_time(f32::INFINITY, 0.0),
            Err(AutomationError::InvalidValue { .. })
        ));
        assert!(matches!(
            param.linear_ramp_to_value_at_time(1.0, -2.0),
            Err(AutomationError::InvalidTime { .. })
        ));
        assert!(matches!(
            param.set_value_curve_at_time(&[1.0], 0.0, 1.0),
            Err(AutomationError::CurveTooShort(1))
        ));
        assert!(param.timeline().is_empty());
    }

    #[test]
    fn test_overlap_is_reported() {
        let mut param = gain();
        param.set_value_curve_at_time(&[0.0, 1.0], 1.0, 2.0).unwrap();

        assert_eq!(
            param.set_value_at_time(0.5, 2.0).unwrap_err(),
            AutomationError::OverlapRejected { time: 2.0 }
        );
        assert_eq!(param.timeline().len(), 1);
    }

    #[test]
    fn test_cancel_and_hold() {
        let mut param = gain();
        param
            .set_value_at_time(0.0, 0.0)
            .unwrap()
            .linear_ramp_to_value_at_time(2.0, 2.0)
            .unwrap()
            .cancel_and_hold_at_time(1.0)
            .unwrap();

        assert_eq!(param.value_at(1.0), 1.0);
        assert_eq!(param.value_at(1.5), 1.0);
    }

    #[test]
    fn test_replay_into_param() {
        let mut live = gain();
        live.set_value_at_time(0.2, 0.0)
            .unwrap()
            .exponential_ramp_to_value_at_time(1.6, 3.0)
            .unwrap();

        let mut offline = gain();
        assert_eq!(live.timeline().replay_onto(&mut offline).unwrap(), 2);
        assert_eq!(offline.events().count(), 2);
        assert_eq!(offline.value_at(1.0), live.value_at(1.0));
    }

    #[test]
    fn test_descriptor_config() {
        let descriptor: ParamDescriptor =
            serde_json::from_str(r#"{"name":"cutoff","default_value":440.0}"#).unwrap();
        assert_eq!(descriptor.name, "cutoff");
        assert_eq!(descriptor.default_value, 440.0);
        assert_eq!(descriptor.min_value, f32::MIN);
        assert_eq!(descriptor.max_value, f32::MAX);

        let json = serde_json::to_string(&ParamDescriptor::new("pan", 0.0).with_range(-1.0, 1.0))
            .unwrap();
        let parsed: ParamDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.min_value, -1.0);
    }
}
