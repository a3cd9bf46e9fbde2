//! Automation clip - a named set of scheduled parameters
//!
//! Each parameter keeps its own timeline; the clip only forwards bulk
//! operations to all of them.

use crate::error::{check_time, Result};
use crate::param::{ParamDescriptor, ScheduledParam};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Container for the automation of several independent parameters
#[derive(Debug, Clone, Default)]
pub struct AutomationClip {
    /// Name of this clip
    pub name: String,
    params: HashMap<String, ScheduledParam>,
}

impl AutomationClip {
    /// Create a new empty clip
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    /// Register a parameter under its descriptor's name, replacing any
    /// parameter already registered under that name.
    pub fn add_param(&mut self, descriptor: ParamDescriptor) -> &mut ScheduledParam {
        let param = ScheduledParam::new(descriptor);
        match self.params.entry(param.name().to_owned()) {
            Entry::Occupied(mut entry) => {
                entry.insert(param);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(param),
        }
    }

    /// Get a parameter by name
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ScheduledParam> {
        self.params.get(name)
    }

    /// Get a mutable parameter by name
    pub fn param_mut(&mut self, name: &str) -> Option<&mut ScheduledParam> {
        self.params.get_mut(name)
    }

    /// Remove a parameter, returning it if it was registered
    pub fn remove_param(&mut self, name: &str) -> Option<ScheduledParam> {
        self.params.remove(name)
    }

    /// Parameter names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.params.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the clip has no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Value of every parameter at `time`
    #[must_use]
    pub fn values_at(&self, time: f64) -> HashMap<String, f32> {
        self.params
            .iter()
            .map(|(name, param)| (name.clone(), param.value_at(time)))
            .collect()
    }

    /// Compact every parameter's history up to `time`
    pub fn flush_all(&mut self, time: f64) -> Result<()> {
        check_time("time", time)?;
        for param in self.params.values_mut() {
            param.flush(time)?;
        }
        Ok(())
    }

    /// Freeze every parameter at its value at `time`.
    ///
    /// Either every parameter is held or, on error, none is touched.
    pub fn cancel_and_hold_all(&mut self, time: f64) -> Result<()> {
        for param in self.params.values() {
            param.timeline().check_hold(time)?;
        }
        for param in self.params.values_mut() {
            param.cancel_and_hold_at_time(time)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomationError;
    use float_cmp::approx_eq;

    fn mixer_clip() -> AutomationClip {
        let mut clip = AutomationClip::new("mixer");
        clip.add_param(ParamDescriptor::new("volume", 1.0).with_range(0.0, 1.0))
            .set_value_at_time(0.0, 0.0)
            .unwrap()
            .linear_ramp_to_value_at_time(1.0, 4.0)
            .unwrap();
        clip.add_param(ParamDescriptor::new("pan", 0.0).with_range(-1.0, 1.0))
            .set_value_at_time(-1.0, 2.0)
            .unwrap();
        clip
    }

    #[test]
    fn test_add_and_lookup() {
        let clip = mixer_clip();
        assert_eq!(clip.len(), 2);
        assert_eq!(clip.names(), vec!["pan".to_string(), "volume".to_string()]);
        assert_eq!(clip.param("volume").unwrap().timeline().len(), 2);
        assert!(clip.param("cutoff").is_none());
    }

    #[test]
    fn test_add_param_replaces_existing() {
        let mut clip = mixer_clip();
        clip.add_param(ParamDescriptor::new("volume", 0.5));
        assert_eq!(clip.len(), 2);
        assert!(clip.param("volume").unwrap().timeline().is_empty());
    }

    #[test]
    fn test_values_at() {
        let clip = mixer_clip();
        let values = clip.values_at(3.0);
        assert!(approx_eq!(f32, values["volume"], 0.75, epsilon = 1e-6));
        assert_eq!(values["pan"], -1.0);

        let values = clip.values_at(1.0);
        assert_eq!(values["pan"], 0.0);
    }

    #[test]
    fn test_cancel_and_hold_all() {
        let mut clip = mixer_clip();
        clip.cancel_and_hold_all(2.0).unwrap();

        let values = clip.values_at(10.0);
        assert!(approx_eq!(f32, values["volume"], 0.5, epsilon = 1e-6));
        assert_eq!(values["pan"], 0.0);
    }

    #[test]
    fn test_cancel_and_hold_all_is_all_or_nothing() {
        let mut clip = AutomationClip::new("synth");
        clip.add_param(ParamDescriptor::new("a", 0.0).with_range(0.0, 10.0))
            .set_value_at_time(0.0, 0.0)
            .unwrap()
            .linear_ramp_to_value_at_time(10.0, 2.0)
            .unwrap();
        clip.add_param(ParamDescriptor::new("b", 0.0).with_range(0.0, 10.0))
            .set_target_at_time(1.0, 0.0, 1.0)
            .unwrap()
            .linear_ramp_to_value_at_time(5.0, 4.0)
            .unwrap();

        assert!(matches!(
            clip.cancel_and_hold_all(1.0),
            Err(AutomationError::MalformedState(_))
        ));
        assert_eq!(clip.param("a").unwrap().timeline().len(), 2);
        assert_eq!(clip.param("b").unwrap().timeline().len(), 2);
        assert_eq!(clip.param("a").unwrap().value_at(1.5), 7.5);

        assert!(clip.cancel_and_hold_all(-1.0).is_err());
        assert!(clip.flush_all(f64::NAN).is_err());
        assert_eq!(clip.param("a").unwrap().value_at(1.5), 7.5);
    }

    #[test]
    fn test_flush_all_keeps_values() {
        let mut clip = mixer_clip();
        let before = clip.values_at(3.5);
        clip.flush_all(3.0).unwrap();
        assert_eq!(clip.values_at(3.5), before);
    }

    #[test]
    fn test_remove_param() {
        let mut clip = mixer_clip();
        assert!(clip.remove_param("pan").is_some());
        assert!(clip.remove_param("pan").is_none());
        assert_eq!(clip.len(), 1);
        assert!(!clip.is_empty());

        clip.param_mut("volume").unwrap().cancel_scheduled_values(0.0).unwrap();
        assert_eq!(clip.values_at(2.0)["volume"], 1.0);
    }
}
