//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::manager::TickManager;
use crate::ticker::{PhysicsTick, ScaledTick, TickContext, UnscaledTick};

pub(crate) const EPS: f32 = 1e-5;

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

/// Ticker that records every callback it receives.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub interval: f32,
    pub fired: u32,
    pub unscaled_fired: u32,
    pub physics_fired: u32,
    pub removed: u32,
    pub unscaled_removed: u32,
    pub physics_removed: u32,
    /// `ctx.elapsed()` of every scaled fire.
    pub elapsed: Vec<f32>,
    /// Deregister from the scaled list on the first scaled fire.
    pub remove_on_fire: bool,
    /// Deregister these scaled tickers when fired or removed.
    pub also_remove: Vec<Rc<RefCell<Recorder>>>,
    /// Register these scaled tickers on the first scaled fire.
    pub also_add: Vec<Rc<RefCell<Recorder>>>,
    /// Ignore remove requests (do not deregister).
    pub keep_on_remove: bool,
}

impl Recorder {
    pub fn shared(interval: f32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            interval,
            ..Self::default()
        }))
    }

    fn drop_others(&mut self, ticks: &mut TickManager) {
        for other in self.also_remove.drain(..) {
            ticks.remove_ticker(&*other.borrow());
        }
    }
}

impl ScaledTick for Recorder {
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.fired += 1;
        self.elapsed.push(ctx.elapsed());
        self.drop_others(ctx.ticks());
        for other in self.also_add.drain(..) {
            ctx.ticks().add_ticker(&other);
        }
        if self.remove_on_fire {
            ctx.ticks().remove_ticker(self);
        }
    }

    fn tick_duration(&self) -> f32 {
        self.interval
    }

    fn remove_ticker(&mut self, ticks: &mut TickManager) {
        self.removed += 1;
        self.drop_others(ticks);
        if !self.keep_on_remove {
            ticks.remove_ticker(self);
        }
    }
}

impl UnscaledTick for Recorder {
    fn unscaled_tick(&mut self, _ctx: &mut TickContext<'_>) {
        self.unscaled_fired += 1;
    }

    fn unscaled_tick_duration(&self) -> f32 {
        self.interval
    }

    fn remove_unscaled_ticker(&mut self, ticks: &mut TickManager) {
        self.unscaled_removed += 1;
        ticks.remove_unscaled_ticker(self);
    }
}

impl PhysicsTick for Recorder {
    fn physics_tick(&mut self, _ctx: &mut TickContext<'_>) {
        self.physics_fired += 1;
    }

    fn physics_tick_duration(&self) -> f32 {
        self.interval
    }

    fn remove_physics_ticker(&mut self, ticks: &mut TickManager) {
        self.physics_removed += 1;
        ticks.remove_physics_ticker(self);
    }
}
