//! Automation events
//!
//! The event shapes double as the wire format handed to a renderer that
//! replays a schedule on its own timeline.

use crate::error::{check_time, check_value, AutomationError, Result};
use serde::{Deserialize, Serialize};

/// A scheduled change to a parameter's value.
///
/// The two cancel variants are transient: adding one to a timeline truncates
/// it and the cancel event itself is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AutomationEvent {
    /// Hold `value` from `start_time` until superseded.
    SetValue { value: f32, start_time: f64 },
    /// Reach `value` at `end_time`, linearly from the value in effect before.
    LinearRamp {
        value: f32,
        end_time: f64,
        /// When the ramp was scheduled. Stamped by the timeline on insertion.
        #[serde(default)]
        insert_time: f64,
    },
    /// Reach `value` at `end_time`, exponentially from the value in effect before.
    ExponentialRamp {
        value: f32,
        end_time: f64,
        #[serde(default)]
        insert_time: f64,
    },
    /// Approach `target` exponentially from `start_time` on.
    SetTarget {
        target: f32,
        start_time: f64,
        time_constant: f64,
    },
    /// Sampled curve stretched over `[start_time, start_time + duration]`.
    SetValueCurve {
        values: Vec<f32>,
        start_time: f64,
        duration: f64,
    },
    CancelScheduledValues { cancel_time: f64 },
    CancelAndHold { cancel_time: f64 },
}

impl AutomationEvent {
    /// Create a new set-value event
    pub fn set_value(value: f32, start_time: f64) -> Result<Self> {
        Ok(Self::SetValue {
            value: check_value("value", value)?,
            start_time: check_time("start_time", start_time)?,
        })
    }

    /// Create a new linear ramp ending at `end_time`
    pub fn linear_ramp(value: f32, end_time: f64) -> Result<Self> {
        Ok(Self::LinearRamp {
            value: check_value("value", value)?,
            end_time: check_time("end_time", end_time)?,
            insert_time: 0.0,
        })
    }

    /// Create a new exponential ramp ending at `end_time`
    pub fn exponential_ramp(value: f32, end_time: f64) -> Result<Self> {
        Ok(Self::ExponentialRamp {
            value: check_value("value", value)?,
            end_time: check_time("end_time", end_time)?,
            insert_time: 0.0,
        })
    }

    /// Create a new set-target event. A zero `time_constant` jumps to `target`.
    pub fn set_target(target: f32, start_time: f64, time_constant: f64) -> Result<Self> {
        let event = Self::SetTarget {
            target,
            start_time,
            time_constant,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a new value curve. Needs at least two values.
    pub fn set_value_curve(values: impl Into<Vec<f32>>, start_time: f64, duration: f64) -> Result<Self> {
        let event = Self::SetValueCurve {
            values: values.into(),
            start_time,
            duration,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a new cancel event
    pub fn cancel_scheduled_values(cancel_time: f64) -> Result<Self> {
        Ok(Self::CancelScheduledValues {
            cancel_time: check_time("cancel_time", cancel_time)?,
        })
    }

    /// Create a new cancel-and-hold event
    pub fn cancel_and_hold(cancel_time: f64) -> Result<Self> {
        Ok(Self::CancelAndHold {
            cancel_time: check_time("cancel_time", cancel_time)?,
        })
    }

    /// Check every time and value carried by the event.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::SetValue { value, start_time } => {
                check_value("value", *value)?;
                check_time("start_time", *start_time)?;
            }
            Self::LinearRamp {
                value,
                end_time,
                insert_time,
            }
            | Self::ExponentialRamp {
                value,
                end_time,
                insert_time,
            } => {
                check_value("value", *value)?;
                check_time("end_time", *end_time)?;
                check_time("insert_time", *insert_time)?;
            }
            Self::SetTarget {
                target,
                start_time,
                time_constant,
            } => {
                check_value("target", *target)?;
                check_time("start_time", *start_time)?;
                if !time_constant.is_finite() || *time_constant < 0.0 {
                    return Err(AutomationError::InvalidTimeConstant(*time_constant));
                }
            }
            Self::SetValueCurve {
                values,
                start_time,
                duration,
            } => {
                if values.len() < 2 {
                    return Err(AutomationError::CurveTooShort(values.len()));
                }
                for value in values {
                    check_value("values", *value)?;
                }
                check_time("start_time", *start_time)?;
                if !duration.is_finite() || *duration <= 0.0 {
                    return Err(AutomationError::InvalidDuration(*duration));
                }
            }
            Self::CancelScheduledValues { cancel_time } | Self::CancelAndHold { cancel_time } => {
                check_time("cancel_time", *cancel_time)?;
            }
        }
        Ok(())
    }

    /// The time used to order events and compare them against cancel times.
    #[must_use]
    #[inline]
    pub fn effective_time(&self) -> f64 {
        match self {
            Self::LinearRamp { end_time, .. } | Self::ExponentialRamp { end_time, .. } => *end_time,
            Self::CancelScheduledValues { cancel_time } | Self::CancelAndHold { cancel_time } => {
                *cancel_time
            }
            Self::SetValue { start_time, .. }
            | Self::SetTarget { start_time, .. }
            | Self::SetValueCurve { start_time, .. } => *start_time,
        }
    }

    /// Check if this is a linear or exponential ramp
    #[must_use]
    #[inline]
    pub fn is_ramp(&self) -> bool {
        matches!(self, Self::LinearRamp { .. } | Self::ExponentialRamp { .. })
    }

    /// Check if this is a cancel event, which is never stored
    #[must_use]
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::CancelScheduledValues { .. } | Self::CancelAndHold { .. }
        )
    }

    /// Time at which a value curve stops, if this is one.
    #[must_use]
    pub fn curve_end(&self) -> Option<f64> {
        match self {
            Self::SetValueCurve {
                start_time,
                duration,
                ..
            } => Some(start_time + duration),
            _ => None,
        }
    }

    /// Scheduling time of a ramp.
    #[must_use]
    pub fn insert_time(&self) -> Option<f64> {
        match self {
            Self::LinearRamp { insert_time, .. } | Self::ExponentialRamp { insert_time, .. } => {
                Some(*insert_time)
            }
            _ => None,
        }
    }

    /// Variant name, as used in `Display`
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetValue { .. } => "SetValue",
            Self::LinearRamp { .. } => "LinearRamp",
            Self::ExponentialRamp { .. } => "ExponentialRamp",
            Self::SetTarget { .. } => "SetTarget",
            Self::SetValueCurve { .. } => "SetValueCurve",
            Self::CancelScheduledValues { .. } => "CancelScheduledValues",
            Self::CancelAndHold { .. } => "CancelAndHold",
        }
    }
}

impl std::fmt::Display for AutomationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name(), self.effective_time())
    }
}
