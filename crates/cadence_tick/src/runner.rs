//! Tick driver.
//!
//! The host calls into the registry once per frame ([`TickManager::update`])
//! and once per fixed physics step ([`TickManager::fixed_update`]). Each call
//! walks the relevant lists from the back, adds the elapsed time to every
//! accumulator, and fires the tickers whose accumulator reached their
//! interval. The sweep walks a snapshot of the keys taken when it began, so a
//! callback may add or remove any entry: every entry present at the start is
//! visited at most once, and entries added mid-sweep wait for the next one.
//!
//! Nothing fires while the registry is frozen, before the runner has been
//! started, or after it has been shut down.

use tracing::{info, trace, warn};

use crate::clock::FrameTime;
use crate::manager::TickManager;
use crate::ticker::TickContext;
use crate::variant::{Physics, Scaled, TickVariant, Unscaled};

/// Lifecycle of the tick runner. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Created by a registration, waiting for the host's start call.
    Uninitialized,
    /// Sweeps run.
    Active,
    /// Shut down; sweeps are rejected until the registry is reset.
    Destroyed,
}

/// The tick runner owned by a [`TickManager`].
#[derive(Debug)]
pub struct TickRunner {
    state: RunnerState,
}

impl TickRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RunnerState::Uninitialized,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunnerState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == RunnerState::Active
    }

    /// `Uninitialized → Active`. Returns `false` in any other state.
    pub fn start(&mut self) -> bool {
        if self.state != RunnerState::Uninitialized {
            return false;
        }
        self.state = RunnerState::Active;
        true
    }

    /// Move to the terminal state.
    pub fn destroy(&mut self) {
        self.state = RunnerState::Destroyed;
    }
}

impl Default for TickRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TickManager {
    /// Host start callback: activate a pending runner.
    ///
    /// Safe to call every frame; only an `Uninitialized` runner changes.
    /// Returns `true` if the runner was activated by this call.
    pub fn start(&mut self) -> bool {
        let started = self.runner.as_mut().is_some_and(TickRunner::start);
        if started {
            info!("tick runner started");
        }
        started
    }

    /// Host frame callback: sweep unscaled tickers, then scaled tickers.
    pub fn update(&mut self, frame: FrameTime) {
        if !self.can_tick() {
            return;
        }
        self.sweep::<Unscaled>(frame.unscaled_delta);
        self.sweep::<Scaled>(frame.delta);
    }

    /// Host physics-step callback: sweep physics tickers.
    pub fn fixed_update(&mut self, fixed_delta: f32) {
        if !self.can_tick() {
            return;
        }
        self.sweep::<Physics>(fixed_delta);
    }

    /// Host teardown callback: destroy the runner and clear the registry.
    pub fn shutdown(&mut self) {
        if let Some(runner) = self.runner.as_mut() {
            runner.destroy();
        }
        self.clear();
        info!("tick runner shut down");
    }

    fn can_tick(&self) -> bool {
        !self.is_frozen() && self.runner.as_ref().is_some_and(TickRunner::is_active)
    }

    fn sweep<V: TickVariant>(&mut self, delta: f32) {
        let debug = self.config.debug;
        // Visit the entries present when the sweep began, newest first. Each
        // is looked up by key, so callbacks may add or remove anything.
        let keys = V::list(self).keys_rev();
        let mut expected = keys.len();
        for key in keys {
            let list = V::list_mut(self);
            expected = expected.saturating_sub(1);
            let index = match list.get(expected) {
                Some(entry) if entry.key == key => expected,
                _ => match list.position(key) {
                    Some(index) => index,
                    None => continue,
                },
            };
            expected = index;

            let Some(entry) = list.get_mut(index) else {
                continue;
            };
            let name = entry.type_name;
            let Some(owner) = entry.owner.upgrade() else {
                list.remove(key);
                warn!(
                    variant = %V::VARIANT,
                    ticker = name,
                    "pruned ticker dropped without deregistering"
                );
                continue;
            };
            if debug {
                trace!(
                    variant = %V::VARIANT,
                    ticker = name,
                    accumulated = entry.accumulated,
                    "sweep"
                );
            }

            entry.accumulated += delta;
            if entry.accumulated < entry.interval {
                continue;
            }
            let elapsed = entry.accumulated;
            entry.accumulated = V::VARIANT.overflow().apply(entry.accumulated, entry.interval);

            let Ok(mut ticker) = owner.try_borrow_mut() else {
                warn!(variant = %V::VARIANT, ticker = name, "ticker busy; fire skipped");
                continue;
            };
            let mut ctx = TickContext::new(self, elapsed);
            V::fire(&mut *ticker, &mut ctx);
        }
    }
}
