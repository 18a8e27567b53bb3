//! Frame timing.
//!
//! [`Clock`] turns the host's real frame delta into a [`FrameTime`] carrying
//! both the scaled and unscaled delta. The scale lives in a [`TimeScale`]
//! handle that tickers can hold on to and change.

use std::cell::Cell;
use std::rc::Rc;

/// Shared, mutable time scale. Clones share the same value.
#[derive(Debug, Clone)]
pub struct TimeScale(Rc<Cell<f32>>);

impl TimeScale {
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self(Rc::new(Cell::new(scale)))
    }

    #[must_use]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    /// Set the scale. Negative values are clamped to zero.
    pub fn set(&self, scale: f32) {
        self.0.set(scale.max(0.0));
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Elapsed time of one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Frame delta multiplied by the time scale.
    pub delta: f32,
    /// Real frame delta.
    pub unscaled_delta: f32,
}

impl FrameTime {
    #[must_use]
    pub fn new(unscaled_delta: f32, time_scale: f32) -> Self {
        Self {
            delta: unscaled_delta * time_scale,
            unscaled_delta,
        }
    }

    /// A frame with time scale 1.
    #[must_use]
    pub fn unscaled(delta: f32) -> Self {
        Self::new(delta, 1.0)
    }
}

/// Frame clock with a fixed physics step.
#[derive(Debug, Clone)]
pub struct Clock {
    time_scale: TimeScale,
    fixed_delta: f32,
    frame_count: u64,
    time: f64,
    unscaled_time: f64,
}

impl Clock {
    /// Create a clock with time scale 1.
    #[must_use]
    pub fn new(fixed_delta: f32) -> Self {
        Self::with_time_scale(fixed_delta, TimeScale::default())
    }

    /// Create a clock driven by an existing time scale handle.
    #[must_use]
    pub fn with_time_scale(fixed_delta: f32, time_scale: TimeScale) -> Self {
        Self {
            time_scale,
            fixed_delta,
            frame_count: 0,
            time: 0.0,
            unscaled_time: 0.0,
        }
    }

    /// The time scale handle; clone it to let tickers change the scale.
    #[must_use]
    pub fn time_scale(&self) -> &TimeScale {
        &self.time_scale
    }

    /// Fixed physics step, in seconds.
    #[must_use]
    pub fn fixed_delta(&self) -> f32 {
        self.fixed_delta
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Scaled time since the clock started.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Real time since the clock started.
    #[must_use]
    pub fn unscaled_time(&self) -> f64 {
        self.unscaled_time
    }

    /// Advance by one frame of `unscaled_delta` real seconds.
    pub fn advance(&mut self, unscaled_delta: f32) -> FrameTime {
        let frame = FrameTime::new(unscaled_delta, self.time_scale.get());
        self.frame_count += 1;
        self.time += f64::from(frame.delta);
        self.unscaled_time += f64::from(frame.unscaled_delta);
        frame
    }
}
