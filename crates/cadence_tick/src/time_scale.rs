//! Time-scale animation.
//!
//! [`ModifyTimeScale`] is an unscaled ticker that eases the shared
//! [`TimeScale`] from a start value to an end value over a duration of real
//! time, for hit-stop and slow-motion effects. It fires every frame while
//! registered, removes itself when the duration has passed, and restores the
//! scale it found when it started.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::clock::TimeScale;
use crate::manager::TickManager;
use crate::ticker::{TickContext, UnscaledTick};

/// Easing applied to the normalised progress `0..=1`.
pub type Curve = Box<dyn Fn(f32) -> f32>;

pub struct ModifyTimeScale {
    time_scale: TimeScale,
    start_scale: f32,
    end_scale: f32,
    duration: f32,
    curve: Option<Curve>,
    timer: f32,
    /// Scale to restore on removal.
    original: f32,
    running: bool,
}

impl ModifyTimeScale {
    /// Animate `time_scale` from `start_scale` to `end_scale` over `duration`
    /// real seconds. Nothing happens until the ticker is added.
    #[must_use]
    pub fn new(time_scale: TimeScale, start_scale: f32, end_scale: f32, duration: f32) -> Self {
        Self {
            original: time_scale.get(),
            time_scale,
            start_scale,
            end_scale,
            duration,
            curve: None,
            timer: 0.0,
            running: false,
        }
    }

    /// Shape the interpolation with an easing curve.
    #[must_use]
    pub fn with_curve(mut self, curve: impl Fn(f32) -> f32 + 'static) -> Self {
        self.curve = Some(Box::new(curve));
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Real time elapsed since the effect started.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    fn scale_at(&self, progress: f32) -> f32 {
        let t = self.curve.as_ref().map_or(progress, |curve| curve(progress));
        self.start_scale + (self.end_scale - self.start_scale) * t
    }
}

impl UnscaledTick for ModifyTimeScale {
    fn unscaled_tick(&mut self, ctx: &mut TickContext<'_>) {
        self.timer += ctx.elapsed();
        if self.timer > self.duration {
            self.remove_unscaled_ticker(ctx.ticks());
            return;
        }
        let progress = if self.duration > 0.0 {
            self.timer / self.duration
        } else {
            1.0
        };
        self.time_scale.set(self.scale_at(progress));
    }

    /// Every frame.
    fn unscaled_tick_duration(&self) -> f32 {
        0.0
    }

    /// Start the effect. Only one run per instance at a time.
    fn add_unscaled_ticker(this: &Rc<RefCell<Self>>, ticks: &mut TickManager) -> bool
    where
        Self: Sized + 'static,
    {
        {
            let mut me = this.borrow_mut();
            if me.running {
                return false;
            }
            me.timer = 0.0;
            me.running = true;
            me.original = me.time_scale.get();
            let start = me.start_scale;
            me.time_scale.set(start);
        }
        ticks.add_unscaled_ticker(this)
    }

    fn remove_unscaled_ticker(&mut self, ticks: &mut TickManager) {
        if !self.running {
            return;
        }
        self.time_scale.set(self.original);
        self.running = false;
        ticks.remove_unscaled_ticker(self);
    }
}

impl fmt::Debug for ModifyTimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifyTimeScale")
            .field("start_scale", &self.start_scale)
            .field("end_scale", &self.end_scale)
            .field("duration", &self.duration)
            .field("curve", &self.curve.is_some())
            .field("timer", &self.timer)
            .field("running", &self.running)
            .finish()
    }
}
