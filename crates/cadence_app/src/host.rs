//! Host frame loop.
//!
//! Plays the engine's role for the tick registry and the pool. Each frame:
//!
//! 1. Activate a pending tick runner.
//! 2. Run physics steps for the scaled time that accumulated, capped per
//!    frame.
//! 3. Advance the clock and sweep unscaled then scaled tickers.
//! 4. Count down pooled-instance lifetimes by the scaled delta.
//!
//! After the last frame the registry is shut down.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use cadence_pool::SimplePool;
use cadence_tick::{Clock, FrameTime, TickManager, TimeScale};

use crate::config::LoopConfig;

/// Totals reported by [`Host::run`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub fixed_steps: u64,
    pub returned: usize,
    pub time: f64,
    pub unscaled_time: f64,
}

/// Owns the clock and the tick registry and drives both, plus a pool.
#[derive(Debug)]
pub struct Host<T> {
    config: LoopConfig,
    clock: Clock,
    ticks: TickManager,
    pool: Rc<RefCell<SimplePool<T>>>,
    /// Scaled time not yet consumed by physics steps.
    fixed_backlog: f32,
    fixed_steps: u64,
    returned: usize,
}

impl<T> Host<T> {
    #[must_use]
    pub fn new(config: LoopConfig, ticks: TickManager, pool: Rc<RefCell<SimplePool<T>>>) -> Self {
        let time_scale = TimeScale::new(config.time_scale);
        Self {
            clock: Clock::with_time_scale(config.fixed_step, time_scale),
            config,
            ticks,
            pool,
            fixed_backlog: 0.0,
            fixed_steps: 0,
            returned: 0,
        }
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub fn ticks(&self) -> &TickManager {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut TickManager {
        &mut self.ticks
    }

    #[must_use]
    pub fn pool(&self) -> &Rc<RefCell<SimplePool<T>>> {
        &self.pool
    }

    /// Run one frame of `unscaled_delta` real seconds.
    pub fn frame(&mut self, unscaled_delta: f32) -> FrameTime {
        self.ticks.start();
        self.physics_steps(unscaled_delta * self.clock.time_scale().get());

        let frame = self.clock.advance(unscaled_delta);
        self.ticks.update(frame);

        match self.pool.try_borrow_mut() {
            Ok(mut pool) => self.returned += pool.update(frame.delta),
            Err(_) => warn!(frame = self.clock.frame_count(), "pool busy; lifetimes not advanced"),
        }
        frame
    }

    fn physics_steps(&mut self, scaled_delta: f32) {
        let step = self.clock.fixed_delta();
        if step <= 0.0 {
            return;
        }
        self.fixed_backlog += scaled_delta;

        let mut steps = 0;
        while self.fixed_backlog >= step && steps < self.config.max_fixed_steps_per_frame {
            self.ticks.fixed_update(step);
            self.fixed_backlog -= step;
            steps += 1;
        }
        self.fixed_steps += u64::from(steps);

        if self.fixed_backlog >= step {
            let dropped = (self.fixed_backlog / step) as u32;
            warn!(
                frame = self.clock.frame_count(),
                dropped,
                max = self.config.max_fixed_steps_per_frame,
                "physics fell behind; dropping steps"
            );
            self.fixed_backlog %= step;
        }
    }

    /// Run frames until the configured limit, then shut the registry down.
    ///
    /// With `realtime` set, sleeps to hold the frame rate and warns when a
    /// frame overran its budget. Otherwise every frame advances by exactly
    /// one frame period.
    pub fn run(&mut self) -> RunSummary {
        let frame_budget = Duration::from_secs_f64(1.0 / self.config.frame_rate);
        let frame_delta = self.config.frame_delta();

        info!(
            frame_rate = self.config.frame_rate,
            fixed_step = self.config.fixed_step,
            max_frames = self.config.max_frames,
            realtime = self.config.realtime,
            "starting frame loop"
        );

        let mut frames = 0u64;
        let mut last = Instant::now();
        loop {
            let start = Instant::now();
            let delta = if self.config.realtime {
                let real = start.duration_since(last).as_secs_f32();
                last = start;
                if frames == 0 { frame_delta } else { real }
            } else {
                frame_delta
            };

            let frame = self.frame(delta);
            debug!(frame = frames, delta = frame.delta, unscaled = frame.unscaled_delta, "frame");

            frames += 1;
            if self.config.max_frames > 0 && frames >= self.config.max_frames {
                break;
            }

            if self.config.realtime {
                let elapsed = start.elapsed();
                if elapsed < frame_budget {
                    std::thread::sleep(frame_budget - elapsed);
                } else {
                    warn!(
                        frame = frames,
                        elapsed_ms = elapsed.as_millis() as u64,
                        budget_ms = frame_budget.as_millis() as u64,
                        "frame exceeded time budget"
                    );
                }
            }
        }

        self.ticks.shutdown();
        let summary = RunSummary {
            frames,
            fixed_steps: self.fixed_steps,
            returned: self.returned,
            time: self.clock.time(),
            unscaled_time: self.clock.unscaled_time(),
        };
        info!(?summary, "frame loop complete");
        summary
    }
}
