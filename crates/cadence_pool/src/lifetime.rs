//! Lifetime countdown for auto-return instances.

/// Countdown attached to an instance spawned with auto-return.
///
/// Attached once, on the first auto-return spawn, and restarted on every
/// later one. Stopped when the instance is despawned by any path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnToPool {
    lifetime: f32,
    remaining: f32,
    running: bool,
}

impl ReturnToPool {
    /// Lifetime used by the last [`start_timer`](Self::start_timer).
    #[must_use]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// (Re)start the countdown from `lifetime` seconds.
    pub fn start_timer(&mut self, lifetime: f32) {
        self.lifetime = lifetime;
        self.remaining = lifetime;
        self.running = true;
    }

    pub fn stop_timer(&mut self) {
        self.running = false;
    }

    /// Count down by `delta`. Returns `true` once, when the time runs out;
    /// the timer stops itself at that point.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.running = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_once() {
        let mut timer = ReturnToPool::default();
        timer.start_timer(1.0);
        assert!(!timer.advance(0.6));
        assert!(timer.advance(0.6));
        assert!(!timer.is_running());
        assert!(!timer.advance(0.6));
    }

    #[test]
    fn test_stopped_timer_does_not_count() {
        let mut timer = ReturnToPool::default();
        timer.start_timer(1.0);
        timer.stop_timer();
        assert!(!timer.advance(5.0));
        assert_eq!(timer.remaining(), 1.0);
    }

    #[test]
    fn test_restart_resets_remaining() {
        let mut timer = ReturnToPool::default();
        timer.start_timer(1.0);
        timer.advance(0.9);
        timer.start_timer(2.0);
        assert_eq!(timer.remaining(), 2.0);
        assert_eq!(timer.lifetime(), 2.0);
    }
}
