//! Debounce state machine
//!
//! Collapses a burst of triggers into one trailing call, `wait` ms after the
//! last trigger. Time is passed in by the caller (milliseconds, any
//! monotonic origin); the browser layer arms a timer for [`Debouncer::wait_ms`]
//! on every trigger and calls [`Debouncer::fire`] when it expires.

use crate::constants::DEFAULT_DEBOUNCE_MS;

#[derive(Clone, Debug, PartialEq)]
pub struct Debouncer {
    wait_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    /// A missing or non-positive wait uses the default delay.
    pub fn new(wait_ms: Option<f64>) -> Self {
        let wait_ms = match wait_ms {
            Some(ms) if ms > 0.0 => ms,
            _ => DEFAULT_DEBOUNCE_MS,
        };
        Self {
            wait_ms,
            deadline: None,
        }
    }

    #[inline]
    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    /// Record a trigger at `now`, pushing the deadline back
    pub fn trigger(&mut self, now: f64) {
        self.deadline = Some(now + self.wait_ms);
    }

    /// The timer expired. Returns `true` when the trailing call must run.
    pub fn fire(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wait() {
        assert_eq!(Debouncer::new(None).wait_ms(), 500.0);
        assert_eq!(Debouncer::new(Some(0.0)).wait_ms(), 500.0);
        assert_eq!(Debouncer::new(Some(-1.0)).wait_ms(), 500.0);
        assert_eq!(Debouncer::new(Some(250.0)).wait_ms(), 250.0);
    }

    #[test]
    fn test_burst_extends_deadline_and_fires_once() {
        let mut d = Debouncer::new(Some(100.0));
        d.trigger(0.0);
        assert_eq!(d.deadline, Some(100.0));
        d.trigger(50.0);
        d.trigger(120.0);
        assert_eq!(d.deadline, Some(220.0));
        assert!(d.fire());
        assert!(!d.fire());
        assert_eq!(d.deadline, None);
    }

    #[test]
    fn test_fire_without_trigger() {
        let mut d = Debouncer::default();
        assert!(!d.fire());
        d.trigger(0.0);
        assert!(d.deadline.is_some());
        assert!(d.fire());
    }
}
