//! Timestamp-driven throttle and debounce.
//!
//! Both take the caller's clock (`FrameClock::elapsed_ms` in practice) so no
//! host timers are ever registered; dropping the owner cancels them.

/// Lets an event through at most once per `interval_ms`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// Returns true, and restarts the interval, when more than `interval_ms`
    /// has passed since the last accepted call. The first call always passes.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last {
            Some(last) if now_ms - last <= self.interval_ms => false,
            _ => {
                self.last = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Fires once after a burst of triggers has been quiet for `delay_ms`.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Register a trigger; pushes the deadline out.
    pub fn trigger(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_first_call_passes() {
        let mut t = Throttle::new(100.0);
        assert!(t.ready(0.0));
    }

    #[test]
    fn throttle_blocks_within_interval() {
        let mut t = Throttle::new(100.0);
        assert!(t.ready(0.0));
        assert!(!t.ready(50.0));
        assert!(!t.ready(100.0)); // strictly greater than the interval
        assert!(t.ready(100.5));
        assert!(!t.ready(150.0));
    }

    #[test]
    fn debounce_waits_for_quiet() {
        let mut d = Debounce::new(200.0);
        d.trigger(0.0);
        d.trigger(150.0);
        assert!(!d.fire(199.0));
        assert!(!d.fire(349.0));
        assert!(d.fire(350.0));
        // Fires only once.
        assert!(!d.fire(400.0));
        assert!(!d.is_pending());
    }

    #[test]
    fn debounce_cancel() {
        let mut d = Debounce::new(200.0);
        d.trigger(0.0);
        d.cancel();
        assert!(!d.fire(1000.0));
    }
}
