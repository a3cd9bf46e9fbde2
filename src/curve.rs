//! Interpolation formulas for automation events
//!
//! Pure functions, one per event shape. Times are `f64` seconds, values are
//! `f32`; intermediate math runs in `f64`.

/// Two times closer than this are treated as the same instant.
pub const TIME_EPSILON: f64 = 1e-6;

/// `a` is later than `b` by more than [`TIME_EPSILON`].
#[must_use]
#[inline]
pub fn time_gt(a: f64, b: f64) -> bool {
    a - b > TIME_EPSILON
}

/// `a` is later than, or within [`TIME_EPSILON`] of, `b`.
#[must_use]
#[inline]
pub fn time_ge(a: f64, b: f64) -> bool {
    !time_gt(b, a)
}

// v(t) = v0 + (t - t0) / (t1 - t0) * (v1 - v0)
#[must_use]
#[inline]
pub fn linear_ramp(time: f64, start_time: f64, start_value: f32, end_time: f64, end_value: f32) -> f32 {
    let span = end_time - start_time;
    if span <= 0.0 {
        return end_value;
    }

    let phase = (time - start_time) / span;
    let start = f64::from(start_value);
    (start + phase * (f64::from(end_value) - start)) as f32
}

// v(t) = v0 * (v1 / v0)^((t - t0) / (t1 - t0))
//
// Endpoints of opposite sign (or a zero start) have no exponential path
// between them; the value is 0 in that case.
#[must_use]
#[inline]
pub fn exponential_ramp(
    time: f64,
    start_time: f64,
    start_value: f32,
    end_time: f64,
    end_value: f32,
) -> f32 {
    if start_value == end_value {
        return end_value;
    }

    let same_sign =
        (start_value > 0.0 && end_value > 0.0) || (start_value < 0.0 && end_value < 0.0);
    if !same_sign {
        return 0.0;
    }

    let span = end_time - start_time;
    if span <= 0.0 {
        return end_value;
    }

    let phase = (time - start_time) / span;
    let start = f64::from(start_value);
    (start * (f64::from(end_value) / start).powf(phase)) as f32
}

// v(t) = target + (v0 - target) * e^(-(t - t0) / tau)
#[must_use]
#[inline]
pub fn set_target(
    time: f64,
    start_time: f64,
    start_value: f32,
    target: f32,
    time_constant: f64,
) -> f32 {
    if time_constant == 0.0 {
        return if time >= start_time { target } else { start_value };
    }

    let target_f = f64::from(target);
    let decay = (-(time - start_time) / time_constant).exp();
    (target_f + (f64::from(start_value) - target_f) * decay) as f32
}

/// Sample a value curve stretched over `[start_time, start_time + duration]`.
///
/// The fractional index `(t - t0) / duration * (N - 1)` is linearly
/// interpolated between its bracketing samples. At or past the end of the
/// span the last sample holds.
#[must_use]
#[inline]
pub fn value_curve(time: f64, start_time: f64, duration: f64, values: &[f32]) -> f32 {
    let Some(&last) = values.last() else {
        return 0.0;
    };

    if time - start_time >= duration {
        return last;
    }
    if time <= start_time {
        return values[0];
    }

    let position = (time - start_time) / duration * (values.len() - 1) as f64;
    let lower = (position.floor() as usize).min(values.len() - 1);
    let upper = (position.ceil() as usize).min(values.len() - 1);
    if lower == upper {
        return values[lower];
    }

    let fraction = position - lower as f64;
    ((1.0 - fraction) * f64::from(values[lower]) + fraction * f64::from(values[upper])) as f32
}
