//! Error types for automation scheduling

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomationError {
    #[error("{name} ({value}) must be a finite, non-negative time")]
    InvalidTime { name: &'static str, value: f64 },
    #[error("{name} ({value}) must be finite")]
    InvalidValue { name: &'static str, value: f32 },
    #[error("duration ({0}) must be finite and strictly positive")]
    InvalidDuration(f64),
    #[error("time constant ({0}) must be finite and non-negative")]
    InvalidTimeConstant(f64),
    #[error("value curve needs at least 2 samples, got {0}")]
    CurveTooShort(usize),
    /// The event would overlap a value curve already on the timeline.
    #[error("event at {time} overlaps a scheduled value curve")]
    OverlapRejected { time: f64 },
    /// Internal invariant violation; indicates a bug in the mutation logic.
    #[error("automation timeline is malformed: {0}")]
    MalformedState(&'static str),
}

pub type Result<T> = std::result::Result<T, AutomationError>;

pub(crate) fn check_time(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AutomationError::InvalidTime { name, value })
    }
}

pub(crate) fn check_value(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AutomationError::InvalidValue { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_time() {
        assert_eq!(check_time("start_time", 0.0), Ok(0.0));
        assert_eq!(check_time("start_time", 3.5), Ok(3.5));
        assert!(matches!(
            check_time("start_time", -0.1),
            Err(AutomationError::InvalidTime { name: "start_time", .. })
        ));
        assert!(check_time("end_time", f64::NAN).is_err());
        assert!(check_time("end_time", f64::INFINITY).is_err());
    }

    #[test]
    fn test_check_value() {
        assert_eq!(check_value("value", -2.0), Ok(-2.0));
        assert!(check_value("value", f32::NAN).is_err());
        assert!(check_value("value", f32::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        let err = AutomationError::CurveTooShort(1);
        assert_eq!(err.to_string(), "value curve needs at least 2 samples, got 1");
    }
}
