// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rate limiter for high-frequency move events.
//!
//! A [`MoveThrottle`] admits at most `rate` events per second, measured on
//! event timestamps. The first event always passes. Rejected events are
//! dropped, not queued.
//!
//! ```
//! use understory_event_state::throttle::MoveThrottle;
//!
//! // 50 Hz: one move per 20ms.
//! let mut throttle = MoveThrottle::new(Some(50.0));
//! assert!(throttle.admit(0));
//! assert!(!throttle.admit(10));
//! assert!(throttle.admit(20));
//!
//! let mut unthrottled = MoveThrottle::new(None);
//! assert!(unthrottled.admit(0) && unthrottled.admit(0));
//! ```

/// Minimum-interval gate keyed on event time in milliseconds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MoveThrottle {
    interval_ms: Option<f64>,
    last: Option<u64>,
}

impl MoveThrottle {
    /// Admit at most `rate_hz` events per second; `None` admits everything.
    ///
    /// A non-positive or non-finite rate disables throttling. Callers that
    /// want to reject such rates validate them before getting here.
    pub fn new(rate_hz: Option<f64>) -> Self {
        let interval_ms = rate_hz
            .filter(|r| r.is_finite() && *r > 0.0)
            .map(|r| 1000.0 / r);
        Self {
            interval_ms,
            last: None,
        }
    }

    /// Minimum spacing between admitted events, if throttled.
    pub fn interval_ms(&self) -> Option<f64> {
        self.interval_ms
    }

    /// Decide whether an event at `now` may pass, recording it if so.
    pub fn admit(&mut self, now: u64) -> bool {
        let Some(interval) = self.interval_ms else {
            self.last = Some(now);
            return true;
        };
        if let Some(last) = self.last {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Event time deltas are far below 2^52 ms."
            )]
            let elapsed = now.saturating_sub(last) as f64;
            if elapsed < interval {
                tracing::trace!(now, last, "move throttled");
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    /// Forget the last admitted event so the next one passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_inclusive() {
        let mut t = MoveThrottle::new(Some(80.0));
        assert_eq!(t.interval_ms(), Some(12.5));
        assert!(t.admit(100));
        assert!(!t.admit(112));
        assert!(t.admit(113));
        assert!(!t.admit(120));
        assert!(t.admit(126));
    }

    #[test]
    fn rejected_events_do_not_push_the_window() {
        let mut t = MoveThrottle::new(Some(10.0));
        assert!(t.admit(0));
        for now in (10..100).step_by(10) {
            assert!(!t.admit(now));
        }
        assert!(t.admit(100));
    }

    #[test]
    fn reset_admits_next_event() {
        let mut t = MoveThrottle::new(Some(1.0));
        assert!(t.admit(0));
        assert!(!t.admit(5));
        t.reset();
        assert!(t.admit(5));
    }

    #[test]
    fn invalid_rates_disable_throttling() {
        for rate in [None, Some(0.0), Some(-3.0), Some(f64::NAN)] {
            let mut t = MoveThrottle::new(rate);
            assert!(t.admit(0) && t.admit(0) && t.admit(1));
        }
    }
}
