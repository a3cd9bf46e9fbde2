//! # param-automation
//!
//! Automation timeline for a single continuously-sampled audio parameter.
//!
//! This crate provides:
//! - **Automation events** - set-value, linear and exponential ramps,
//!   set-target approaches and sampled value curves
//! - **Automation timeline** - an ordered event store per parameter with
//!   cancel, cancel-and-hold and history compaction
//! - **Value resolution** - the parameter's value at any point in time
//! - **Scheduled parameters** - validated "ramp to X by time Y" entry points
//!   with value range clamping
//! - **Replay** - re-issue a schedule onto another timeline, e.g. for an
//!   offline render pass
//!
//! ## Quick Start
//!
//! ```rust
//! use param_automation::{AutomationEvent, AutomationTimeline};
//!
//! let mut timeline = AutomationTimeline::new(0.0);
//! timeline.add(AutomationEvent::set_value(0.0, 0.0).unwrap()).unwrap();
//! timeline.add(AutomationEvent::linear_ramp(10.0, 2.0).unwrap()).unwrap();
//!
//! assert_eq!(timeline.get_value(1.0), 5.0);
//!
//! // freeze the ramp half way
//! timeline.cancel_and_hold_at_time(1.0).unwrap();
//! assert_eq!(timeline.get_value(1.5), 5.0);
//! ```
//!
//! ## Event Types
//!
//! - **SetValue** - jump to a value and hold it
//! - **LinearRamp** - straight line to a value, reached at the end time
//! - **ExponentialRamp** - geometric curve to a value; endpoints of opposite
//!   sign read as `0`
//! - **SetTarget** - exponential approach toward a target, never ending
//! - **SetValueCurve** - explicit samples stretched over a duration
//!
//! ## Example: Filter Sweep
//!
//! ```rust
//! use param_automation::prelude::*;
//!
//! let mut cutoff = ScheduledParam::new(
//!     ParamDescriptor::new("cutoff", 440.0).with_range(20.0, 20_000.0),
//! );
//!
//! cutoff
//!     .set_value_at_time(220.0, 0.0)?
//!     .exponential_ramp_to_value_at_time(1760.0, 3.0)?
//!     .set_target_at_time(440.0, 4.0, 0.5)?;
//!
//! assert!((cutoff.value_at(1.0) - 440.0).abs() < 0.01);
//! assert_eq!(cutoff.value_at(3.5), 1760.0);
//! # Ok::<(), param_automation::AutomationError>(())
//! ```

pub mod clip;
pub mod curve;
pub mod error;
pub mod event;
pub mod param;
pub mod resolve;
pub mod timeline;

pub use clip::AutomationClip;
pub use curve::TIME_EPSILON;
pub use error::AutomationError;
pub use event::AutomationEvent;
pub use param::{ParamDescriptor, ScheduledParam};
pub use resolve::SampleIterator;
pub use timeline::{AutomationSink, AutomationTimeline};

/// Prelude for common imports
pub mod prelude {
    pub use crate::clip::AutomationClip;
    pub use crate::error::AutomationError;
    pub use crate::event::AutomationEvent;
    pub use crate::param::{ParamDescriptor, ScheduledParam};
    pub use crate::resolve::SampleIterator;
    pub use crate::timeline::{AutomationSink, AutomationTimeline};
}
